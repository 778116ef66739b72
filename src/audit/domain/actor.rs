//! Acting user captured in audit entries.

use crate::task::domain::UserId;
use serde::{Deserialize, Serialize};

/// User performing an audited action, with the display name at the time of
/// the action.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Actor {
    /// Acting user.
    pub id: UserId,
    /// Display name snapshot.
    pub name: String,
}

impl Actor {
    /// Creates an actor.
    #[must_use]
    pub fn new(id: UserId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}
