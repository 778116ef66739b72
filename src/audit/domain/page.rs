//! Offset pagination for history queries.

use serde::{Deserialize, Serialize};

/// Offset/limit window over a history query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    offset: usize,
    limit: usize,
}

impl Page {
    /// Largest page size served.
    pub const MAX_LIMIT: usize = 200;
    /// Page size used when none is given.
    pub const DEFAULT_LIMIT: usize = 50;

    /// Creates a page, clamping `limit` to `1..=MAX_LIMIT`.
    #[must_use]
    pub fn new(offset: usize, limit: usize) -> Self {
        Self {
            offset,
            limit: limit.clamp(1, Self::MAX_LIMIT),
        }
    }

    /// Returns the number of entries skipped.
    #[must_use]
    pub const fn offset(self) -> usize {
        self.offset
    }

    /// Returns the maximum number of entries returned.
    #[must_use]
    pub const fn limit(self) -> usize {
        self.limit
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(0, Self::DEFAULT_LIMIT)
    }
}
