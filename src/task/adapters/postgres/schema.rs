//! Diesel schema for task persistence.

diesel::table! {
    /// Task records read and transitioned by the workflow engine.
    tasks (id) {
        /// Internal task identifier.
        id -> Uuid,
        /// Owning project.
        project_id -> Uuid,
        /// Human-readable task code.
        #[max_length = 50]
        code -> Varchar,
        /// Task title.
        title -> Text,
        /// Workflow status name.
        #[max_length = 50]
        status -> Varchar,
        /// Owning department.
        department_id -> Nullable<Uuid>,
        /// Accountable owner.
        owner_id -> Nullable<Uuid>,
        /// Assigned users.
        assignee_ids -> Array<Uuid>,
        /// Why the task is blocked.
        blocked_reason -> Nullable<Text>,
        /// When the task was blocked.
        blocked_at -> Nullable<Timestamptz>,
        /// Who blocked the task.
        blocked_by -> Nullable<Uuid>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}
