//! `PostgreSQL` repository for the status log.

use super::{
    conversion::{entry_to_row, row_to_entry},
    models::StatusLogRow,
    pool::WorkflowPgPool,
    schema::issue_status_logs,
};
use crate::issue::{
    domain::{IssueId, StatusLogEntry},
    ports::{StatusLogRepository, StatusLogRepositoryError, StatusLogRepositoryResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL`-backed status log repository.
///
/// Entries are ordered by the database-assigned `seq` column, so entries
/// sharing a timestamp keep their append order.
#[derive(Debug, Clone)]
pub struct PostgresStatusLogRepository {
    pool: WorkflowPgPool,
}

impl PostgresStatusLogRepository {
    /// Creates a new repository from a connection pool.
    #[must_use]
    pub const fn new(pool: WorkflowPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> StatusLogRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> StatusLogRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(StatusLogRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(StatusLogRepositoryError::persistence)?
    }
}

fn rows_to_entries(rows: Vec<StatusLogRow>) -> StatusLogRepositoryResult<Vec<StatusLogEntry>> {
    rows.into_iter()
        .map(|row| row_to_entry(row).map_err(StatusLogRepositoryError::invalid_persisted_data))
        .collect()
}

#[async_trait]
impl StatusLogRepository for PostgresStatusLogRepository {
    async fn append(&self, entry: &StatusLogEntry) -> StatusLogRepositoryResult<()> {
        let entry_id = entry.id();
        let row = entry_to_row(entry);
        self.run_blocking(move |connection| {
            diesel::insert_into(issue_status_logs::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        StatusLogRepositoryError::DuplicateEntry(entry_id)
                    }
                    _ => StatusLogRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn history_for(
        &self,
        issue_id: IssueId,
    ) -> StatusLogRepositoryResult<Vec<StatusLogEntry>> {
        self.run_blocking(move |connection| {
            let rows = issue_status_logs::table
                .filter(issue_status_logs::issue_id.eq(issue_id.into_inner()))
                .order(issue_status_logs::seq.desc())
                .select(StatusLogRow::as_select())
                .load(connection)
                .map_err(StatusLogRepositoryError::persistence)?;
            rows_to_entries(rows)
        })
        .await
    }

    async fn recent(&self, limit: usize) -> StatusLogRepositoryResult<Vec<StatusLogEntry>> {
        let row_limit = i64::try_from(limit).map_err(StatusLogRepositoryError::persistence)?;
        self.run_blocking(move |connection| {
            let rows = issue_status_logs::table
                .order(issue_status_logs::seq.desc())
                .limit(row_limit)
                .select(StatusLogRow::as_select())
                .load(connection)
                .map_err(StatusLogRepositoryError::persistence)?;
            rows_to_entries(rows)
        })
        .await
    }
}
