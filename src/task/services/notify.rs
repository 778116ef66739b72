//! Fire-and-forget delivery of blocked-task notifications.

use std::collections::HashSet;
use std::sync::Arc;

use crate::task::{
    domain::{BlockedReason, Task, UserId},
    ports::{DepartmentDirectory, Notification, NotificationKind, Notifier},
};

/// Spawns delivery of a `TaskBlocked` notification.
///
/// Recipients are the owner, the assignees, and the managers of the task's
/// department, without duplicates. The returned handle is dropped by the
/// caller; failures are only logged.
pub(super) fn spawn_blocked_notification(
    departments: Arc<dyn DepartmentDirectory>,
    notifier: Arc<dyn Notifier>,
    task: &Task,
    reason: &BlockedReason,
    actor: UserId,
) {
    let task_id = task.id();
    let department_id = task.department_id();
    let mut recipients: Vec<UserId> = task
        .owner_id()
        .into_iter()
        .chain(task.assignee_ids().iter().copied())
        .collect();
    let notification = Notification {
        kind: NotificationKind::TaskBlocked,
        task_id,
        title: format!("Task {} is blocked", task.code()),
        message: format!("{} was blocked: {}", task.title(), reason.as_str()),
        actor,
    };

    drop(tokio::spawn(async move {
        if let Some(department) = department_id {
            match departments.find_managers_by_department_id(department).await {
                Ok(managers) => recipients.extend(managers),
                Err(err) => tracing::warn!(
                    task_id = %task_id,
                    department_id = %department,
                    error = %err,
                    "department manager lookup failed"
                ),
            }
        }

        let mut seen = HashSet::new();
        recipients.retain(|user| seen.insert(*user));
        if recipients.is_empty() {
            return;
        }

        match notifier.notify_users(&recipients, &notification).await {
            Ok(delivered) => tracing::debug!(
                task_id = %task_id,
                delivered,
                "blocked notification sent"
            ),
            Err(err) => tracing::warn!(
                task_id = %task_id,
                error = %err,
                "blocked notification failed"
            ),
        }
    }));
}
