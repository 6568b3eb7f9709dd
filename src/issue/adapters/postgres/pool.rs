//! Connection pool shared by the workflow adapters.

use diesel::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};

/// `PostgreSQL` connection pool used by the issue workflow adapters.
pub type WorkflowPgPool = Pool<ConnectionManager<PgConnection>>;
