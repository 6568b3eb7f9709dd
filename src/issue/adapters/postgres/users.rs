//! `PostgreSQL` read-only user directory.

use super::{conversion::row_to_user, models::UserRow, pool::WorkflowPgPool, schema::users};
use crate::issue::ports::{UserDirectory, UserDirectoryError, UserDirectoryResult};
use crate::tenancy::domain::{User, UserId};
use async_trait::async_trait;
use diesel::prelude::*;

/// `PostgreSQL`-backed [`UserDirectory`].
#[derive(Debug, Clone)]
pub struct PostgresUserDirectory {
    pool: WorkflowPgPool,
}

impl PostgresUserDirectory {
    /// Creates a new directory from a connection pool.
    #[must_use]
    pub const fn new(pool: WorkflowPgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserDirectory for PostgresUserDirectory {
    async fn find_user(&self, id: UserId) -> UserDirectoryResult<Option<User>> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(UserDirectoryError::persistence)?;
            let row = users::table
                .filter(users::id.eq(id.into_inner()))
                .select(UserRow::as_select())
                .first::<UserRow>(&mut connection)
                .optional()
                .map_err(UserDirectoryError::persistence)?;
            row.map(|found| row_to_user(found).map_err(UserDirectoryError::invalid_persisted_data))
                .transpose()
        })
        .await
        .map_err(UserDirectoryError::persistence)?
    }
}
