//! `PostgreSQL` repository for issues.

use super::{
    conversion::{entry_to_row, issue_to_row, row_to_issue, version_to_column},
    models::{IssueRow, NewStatusLogRow},
    pool::WorkflowPgPool,
    schema::{issue_status_logs, issues},
};
use crate::issue::{
    domain::{Issue, IssueId, IssueStatus, IssueVersion, StatusLogEntry},
    ports::{IssueRepository, IssueRepositoryError, IssueRepositoryResult, PageRequest},
};
use crate::tenancy::domain::{ChannelId, ProjectId};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL`-backed issue repository.
#[derive(Debug, Clone)]
pub struct PostgresIssueRepository {
    pool: WorkflowPgPool,
}

impl PostgresIssueRepository {
    /// Creates a new repository from a connection pool.
    #[must_use]
    pub const fn new(pool: WorkflowPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> IssueRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> IssueRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(IssueRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(IssueRepositoryError::persistence)?
    }

    async fn load_where<F>(&self, query: F) -> IssueRepositoryResult<Vec<Issue>>
    where
        F: FnOnce(&mut PgConnection) -> QueryResult<Vec<IssueRow>> + Send + 'static,
    {
        self.run_blocking(move |connection| {
            let rows = query(connection)?;
            rows.into_iter()
                .map(|row| row_to_issue(row).map_err(IssueRepositoryError::invalid_persisted_data))
                .collect()
        })
        .await
    }
}

impl From<DieselError> for IssueRepositoryError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

#[async_trait]
impl IssueRepository for PostgresIssueRepository {
    async fn store(&self, issue: &Issue, opening: &StatusLogEntry) -> IssueRepositoryResult<()> {
        let issue_id = issue.id();
        let row = issue_to_row(issue).map_err(IssueRepositoryError::invalid_persisted_data)?;
        let log_row = entry_to_row(opening);

        self.run_blocking(move |connection| {
            connection.transaction::<_, IssueRepositoryError, _>(|tx| {
                diesel::insert_into(issues::table)
                    .values(&row)
                    .execute(tx)
                    .map_err(|err| match err {
                        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                            IssueRepositoryError::DuplicateIssue(issue_id)
                        }
                        _ => IssueRepositoryError::persistence(err),
                    })?;
                diesel::insert_into(issue_status_logs::table)
                    .values(&log_row)
                    .execute(tx)?;
                Ok(())
            })
        })
        .await
    }

    async fn update(
        &self,
        issue: &Issue,
        expected_version: IssueVersion,
    ) -> IssueRepositoryResult<()> {
        self.commit_transition(issue, expected_version, &[]).await
    }

    async fn commit_transition(
        &self,
        issue: &Issue,
        expected_version: IssueVersion,
        entries: &[StatusLogEntry],
    ) -> IssueRepositoryResult<()> {
        let issue_id = issue.id();
        let row = issue_to_row(issue).map_err(IssueRepositoryError::invalid_persisted_data)?;
        let expected = version_to_column(expected_version)
            .map_err(IssueRepositoryError::invalid_persisted_data)?;
        let log_rows: Vec<NewStatusLogRow> = entries.iter().map(entry_to_row).collect();

        self.run_blocking(move |connection| {
            connection.transaction::<_, IssueRepositoryError, _>(|tx| {
                let updated = diesel::update(
                    issues::table
                        .filter(issues::id.eq(row.id))
                        .filter(issues::version.eq(expected)),
                )
                .set(&row)
                .execute(tx)?;

                if updated == 0 {
                    return Err(version_conflict(tx, issue_id, expected_version));
                }

                if !log_rows.is_empty() {
                    diesel::insert_into(issue_status_logs::table)
                        .values(&log_rows)
                        .execute(tx)?;
                }
                Ok(())
            })
        })
        .await
    }

    async fn find_by_id(&self, id: IssueId) -> IssueRepositoryResult<Option<Issue>> {
        self.run_blocking(move |connection| {
            let row = issues::table
                .filter(issues::id.eq(id.into_inner()))
                .select(IssueRow::as_select())
                .first::<IssueRow>(connection)
                .optional()?;
            row.map(|found| {
                row_to_issue(found).map_err(IssueRepositoryError::invalid_persisted_data)
            })
            .transpose()
        })
        .await
    }

    async fn find_by_status(&self, status: IssueStatus) -> IssueRepositoryResult<Vec<Issue>> {
        self.load_where(move |connection| {
            issues::table
                .filter(issues::status.eq(status.as_str()))
                .order(issues::created_at.desc())
                .select(IssueRow::as_select())
                .load(connection)
        })
        .await
    }

    async fn find_by_channel(&self, channel_id: ChannelId) -> IssueRepositoryResult<Vec<Issue>> {
        self.load_where(move |connection| {
            issues::table
                .filter(issues::channel_id.eq(channel_id.into_inner()))
                .order(issues::created_at.desc())
                .select(IssueRow::as_select())
                .load(connection)
        })
        .await
    }

    async fn find_by_project(&self, project_id: ProjectId) -> IssueRepositoryResult<Vec<Issue>> {
        self.load_where(move |connection| {
            issues::table
                .filter(issues::project_id.eq(project_id.into_inner()))
                .order(issues::created_at.desc())
                .select(IssueRow::as_select())
                .load(connection)
        })
        .await
    }

    async fn list(&self, page: PageRequest) -> IssueRepositoryResult<Vec<Issue>> {
        let offset = i64::try_from(page.offset).map_err(IssueRepositoryError::persistence)?;
        let limit = i64::try_from(page.limit).map_err(IssueRepositoryError::persistence)?;
        self.load_where(move |connection| {
            issues::table
                .order(issues::created_at.desc())
                .offset(offset)
                .limit(limit)
                .select(IssueRow::as_select())
                .load(connection)
        })
        .await
    }
}

/// Explains why a versioned update touched no rows.
fn version_conflict(
    connection: &mut PgConnection,
    issue_id: IssueId,
    expected_version: IssueVersion,
) -> IssueRepositoryError {
    let stored = issues::table
        .filter(issues::id.eq(issue_id.into_inner()))
        .select(issues::version)
        .first::<i64>(connection)
        .optional();

    match stored {
        Ok(None) => IssueRepositoryError::NotFound(issue_id),
        Ok(Some(stored_version)) => match u64::try_from(stored_version) {
            Ok(actual) => IssueRepositoryError::ConcurrentModification {
                issue_id,
                expected_version,
                actual_version: IssueVersion::new(actual),
            },
            Err(err) => IssueRepositoryError::invalid_persisted_data(err),
        },
        Err(err) => IssueRepositoryError::persistence(err),
    }
}
