//! Diesel schema for issue workflow persistence.

diesel::table! {
    /// Issue records.
    issues (id) {
        /// Issue identifier.
        id -> Uuid,
        /// Owning project.
        project_id -> Uuid,
        /// Registered channel the issue came from.
        channel_id -> Nullable<Uuid>,
        /// Reporting user.
        reporter_id -> Uuid,
        /// Deprecated single assignee.
        legacy_assignee_id -> Nullable<Uuid>,
        /// Issue title.
        #[max_length = 255]
        title -> Varchar,
        /// Issue description.
        description -> Text,
        /// Image reference.
        image_url -> Nullable<Text>,
        /// Priority.
        #[max_length = 20]
        priority -> Varchar,
        /// Workflow status.
        #[max_length = 50]
        status -> Varchar,
        /// Intake source.
        #[max_length = 20]
        source -> Varchar,
        /// Linked chat thread.
        #[max_length = 255]
        thread_id -> Nullable<Varchar>,
        /// Message that opened the linked thread.
        #[max_length = 255]
        message_id -> Nullable<Varchar>,
        /// Public link hash.
        #[max_length = 64]
        public_hash -> Nullable<Varchar>,
        /// Recorded resolution cause.
        resolution_cause -> Nullable<Text>,
        /// Recorded resolution action.
        resolution_action -> Nullable<Text>,
        /// Report timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
        /// Close timestamp.
        closed_at -> Nullable<Timestamptz>,
        /// Optimistic concurrency version.
        version -> Int8,
    }
}

diesel::table! {
    /// Append-only status history.
    issue_status_logs (id) {
        /// Entry identifier.
        id -> Uuid,
        /// Insertion sequence used for ordering.
        seq -> Int8,
        /// Issue the entry belongs to.
        issue_id -> Uuid,
        /// Status before the change.
        #[max_length = 50]
        old_status -> Nullable<Varchar>,
        /// Status after the change.
        #[max_length = 50]
        new_status -> Varchar,
        /// User who triggered the change.
        actor_id -> Nullable<Uuid>,
        /// Optional free-text note.
        note -> Nullable<Text>,
        /// Change timestamp.
        changed_at -> Timestamptz,
    }
}

diesel::table! {
    /// Role-tagged issue assignments.
    issue_assignees (id) {
        /// Assignment identifier.
        id -> Uuid,
        /// Assigned issue.
        issue_id -> Uuid,
        /// Assigned user.
        user_id -> Uuid,
        /// Assignee role.
        #[max_length = 20]
        role -> Varchar,
        /// Assignment timestamp.
        assigned_at -> Timestamptz,
    }
}

diesel::table! {
    /// Known users.
    users (id) {
        /// User identifier.
        id -> Uuid,
        /// Owning customer.
        customer_id -> Nullable<Uuid>,
        /// Display name.
        #[max_length = 255]
        name -> Nullable<Varchar>,
        /// Email address.
        #[max_length = 255]
        email -> Nullable<Varchar>,
        /// Chat platform user identifier.
        #[max_length = 255]
        platform_user_id -> Varchar,
        /// Platform role.
        #[max_length = 20]
        role -> Varchar,
        /// Whether the user belongs to the support organisation.
        is_internal -> Bool,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::allow_tables_to_appear_in_same_query!(issues, issue_status_logs, issue_assignees, users);
