//! Diesel schema for dependency persistence.

diesel::table! {
    /// Directed dependency edges between tasks.
    task_dependencies (id) {
        /// Edge identifier.
        id -> Uuid,
        /// Dependent task.
        task_id -> Uuid,
        /// Prerequisite task.
        depends_on_task_id -> Uuid,
        /// `BLOCKS` or `RELATES_TO`.
        #[max_length = 20]
        dependency_type -> Varchar,
        /// Creating user.
        created_by -> Uuid,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}
