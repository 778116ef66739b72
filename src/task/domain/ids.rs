//! Identifier types shared across the task domain.

uuid_id! {
    /// Unique identifier for a task record.
    TaskId
}

uuid_id! {
    /// Unique identifier for the project owning a task.
    ProjectId
}

uuid_id! {
    /// Unique identifier for an organisational department.
    DepartmentId
}

uuid_id! {
    /// Unique identifier for a user acting on tasks.
    UserId
}
