//! `PostgreSQL` repository for issue assignments.

use super::{
    conversion::{assignment_to_row, row_to_assignment},
    models::AssignmentRow,
    pool::WorkflowPgPool,
    schema::issue_assignees,
};
use crate::issue::{
    domain::{AssigneeRole, AssignmentId, IssueAssignment, IssueId},
    ports::{AssignmentRepository, AssignmentRepositoryError, AssignmentRepositoryResult},
};
use crate::tenancy::domain::UserId;
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};

const TRIPLE_UNIQUE_CONSTRAINT: &str = "idx_issue_assignees_issue_user_role";

/// `PostgreSQL`-backed assignment repository.
#[derive(Debug, Clone)]
pub struct PostgresAssignmentRepository {
    pool: WorkflowPgPool,
}

impl PostgresAssignmentRepository {
    /// Creates a new repository from a connection pool.
    #[must_use]
    pub const fn new(pool: WorkflowPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> AssignmentRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> AssignmentRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(AssignmentRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(AssignmentRepositoryError::persistence)?
    }

    async fn load_where<F>(&self, query: F) -> AssignmentRepositoryResult<Vec<IssueAssignment>>
    where
        F: FnOnce(&mut PgConnection) -> QueryResult<Vec<AssignmentRow>> + Send + 'static,
    {
        self.run_blocking(move |connection| {
            let rows = query(connection).map_err(AssignmentRepositoryError::persistence)?;
            rows.into_iter()
                .map(|row| {
                    row_to_assignment(row)
                        .map_err(AssignmentRepositoryError::invalid_persisted_data)
                })
                .collect()
        })
        .await
    }
}

fn is_triple_unique_violation(info: &dyn DatabaseErrorInformation) -> bool {
    info.constraint_name()
        .is_some_and(|name| name == TRIPLE_UNIQUE_CONSTRAINT)
}

#[async_trait]
impl AssignmentRepository for PostgresAssignmentRepository {
    async fn create(&self, assignment: &IssueAssignment) -> AssignmentRepositoryResult<()> {
        let row = assignment_to_row(assignment);
        let issue_id = assignment.issue_id();
        let user_id = assignment.user_id();
        let role = assignment.role();

        self.run_blocking(move |connection| {
            diesel::insert_into(issue_assignees::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
                        if is_triple_unique_violation(info.as_ref()) =>
                    {
                        AssignmentRepositoryError::DuplicateAssignment {
                            issue_id,
                            user_id,
                            role,
                        }
                    }
                    _ => AssignmentRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn delete(&self, id: AssignmentId) -> AssignmentRepositoryResult<()> {
        self.run_blocking(move |connection| {
            let deleted = diesel::delete(
                issue_assignees::table.filter(issue_assignees::id.eq(id.into_inner())),
            )
            .execute(connection)
            .map_err(AssignmentRepositoryError::persistence)?;
            if deleted == 0 {
                return Err(AssignmentRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn delete_all_for_issue(&self, issue_id: IssueId) -> AssignmentRepositoryResult<usize> {
        self.run_blocking(move |connection| {
            diesel::delete(
                issue_assignees::table.filter(issue_assignees::issue_id.eq(issue_id.into_inner())),
            )
            .execute(connection)
            .map_err(AssignmentRepositoryError::persistence)
        })
        .await
    }

    async fn find_by_triple(
        &self,
        issue_id: IssueId,
        user_id: UserId,
        role: AssigneeRole,
    ) -> AssignmentRepositoryResult<Option<IssueAssignment>> {
        let mut found = self
            .load_where(move |connection| {
                issue_assignees::table
                    .filter(issue_assignees::issue_id.eq(issue_id.into_inner()))
                    .filter(issue_assignees::user_id.eq(user_id.into_inner()))
                    .filter(issue_assignees::role.eq(role.as_str()))
                    .limit(1)
                    .select(AssignmentRow::as_select())
                    .load(connection)
            })
            .await?;
        Ok(found.pop())
    }

    async fn list_for_issue(
        &self,
        issue_id: IssueId,
    ) -> AssignmentRepositoryResult<Vec<IssueAssignment>> {
        self.load_where(move |connection| {
            issue_assignees::table
                .filter(issue_assignees::issue_id.eq(issue_id.into_inner()))
                .order(issue_assignees::assigned_at.asc())
                .select(AssignmentRow::as_select())
                .load(connection)
        })
        .await
    }

    async fn list_for_user(
        &self,
        user_id: UserId,
    ) -> AssignmentRepositoryResult<Vec<IssueAssignment>> {
        self.load_where(move |connection| {
            issue_assignees::table
                .filter(issue_assignees::user_id.eq(user_id.into_inner()))
                .order(issue_assignees::assigned_at.desc())
                .select(AssignmentRow::as_select())
                .load(connection)
        })
        .await
    }

    async fn list_for_issue_and_role(
        &self,
        issue_id: IssueId,
        role: AssigneeRole,
    ) -> AssignmentRepositoryResult<Vec<IssueAssignment>> {
        self.load_where(move |connection| {
            issue_assignees::table
                .filter(issue_assignees::issue_id.eq(issue_id.into_inner()))
                .filter(issue_assignees::role.eq(role.as_str()))
                .order(issue_assignees::assigned_at.asc())
                .select(AssignmentRow::as_select())
                .load(connection)
        })
        .await
    }
}
