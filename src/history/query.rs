use std::sync::Arc;

use super::{AttemptRecord, HistoryRepository};

/// Read side of the request history.
pub struct RequestHistory {
    repository: Arc<dyn HistoryRepository + Send + Sync>,
    default_limit: usize,
}

impl RequestHistory {
    pub fn new(repository: Arc<dyn HistoryRepository + Send + Sync>, default_limit: usize) -> Self {
        Self {
            repository,
            default_limit,
        }
    }

    pub fn list(&self, limit: Option<usize>) -> Vec<AttemptRecord> {
        self.repository
            .list_recent(limit.unwrap_or(self.default_limit))
    }
}
