//! In-memory collaborator adapters that record calls for inspection.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::task::{
    domain::{DepartmentId, ProjectId, UserId},
    ports::{
        CollaboratorError, CollaboratorResult, DepartmentDirectory, Notification, Notifier,
        ProjectProgress,
    },
};

fn lock_error(err: impl std::fmt::Display) -> CollaboratorError {
    CollaboratorError::Unavailable(err.to_string())
}

/// Project progress collaborator that records every recalculation request.
#[derive(Debug, Clone, Default)]
pub struct RecordingProjectProgress {
    calls: Arc<RwLock<Vec<ProjectId>>>,
}

impl RecordingProjectProgress {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the projects recalculated so far, in call order.
    #[must_use]
    pub fn recalculated(&self) -> Vec<ProjectId> {
        self.calls
            .read()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ProjectProgress for RecordingProjectProgress {
    async fn recalculate_progress(&self, project_id: ProjectId) -> CollaboratorResult<()> {
        self.calls.write().map_err(lock_error)?.push(project_id);
        Ok(())
    }
}

/// Department directory backed by a fixed manager map.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDepartmentDirectory {
    managers: Arc<RwLock<HashMap<DepartmentId, Vec<UserId>>>>,
}

impl InMemoryDepartmentDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the managers of a department, replacing any previous list.
    pub fn set_managers(&self, department_id: DepartmentId, managers: Vec<UserId>) {
        if let Ok(mut map) = self.managers.write() {
            map.insert(department_id, managers);
        }
    }
}

#[async_trait]
impl DepartmentDirectory for InMemoryDepartmentDirectory {
    async fn find_managers_by_department_id(
        &self,
        department_id: DepartmentId,
    ) -> CollaboratorResult<Vec<UserId>> {
        let map = self.managers.read().map_err(lock_error)?;
        Ok(map.get(&department_id).cloned().unwrap_or_default())
    }
}

/// A notification captured by [`RecordingNotifier`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentNotification {
    /// Users the notification was addressed to.
    pub recipients: Vec<UserId>,
    /// Notification payload.
    pub notification: Notification,
}

/// Notifier that records deliveries instead of sending them.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    sent: Arc<RwLock<Vec<SentNotification>>>,
}

impl RecordingNotifier {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the notifications sent so far.
    #[must_use]
    pub fn sent(&self) -> Vec<SentNotification> {
        self.sent.read().map(|sent| sent.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify_users(
        &self,
        recipients: &[UserId],
        notification: &Notification,
    ) -> CollaboratorResult<usize> {
        self.sent.write().map_err(lock_error)?.push(SentNotification {
            recipients: recipients.to_vec(),
            notification: notification.clone(),
        });
        Ok(recipients.len())
    }
}
