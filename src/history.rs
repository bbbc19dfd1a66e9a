mod memory;
mod query;

pub use memory::MemoryHistory;
pub use query::RequestHistory;

use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AttemptStatus {
    Success,
    Error,
}

/// Audit entry for a single balance lookup, successful or not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptRecord {
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balance: Option<String>,
    #[serde(rename = "block")]
    pub block_tag: String,
    pub requested_at: DateTime<Utc>,
    pub status: AttemptStatus,
    #[serde(rename = "error", skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl AttemptRecord {
    pub fn success(address: String, block_tag: String, balance: String) -> Self {
        Self {
            address,
            balance: Some(balance),
            block_tag,
            requested_at: Utc::now(),
            status: AttemptStatus::Success,
            error_message: None,
        }
    }

    pub fn error(address: String, block_tag: String, error_message: String) -> Self {
        Self {
            address,
            balance: None,
            block_tag,
            requested_at: Utc::now(),
            status: AttemptStatus::Error,
            error_message: Some(error_message),
        }
    }
}

/// Newest first log of balance lookups. Writes are infallible so recording an attempt can never
/// fail the lookup it describes.
pub trait HistoryRepository {
    fn append(&self, record: AttemptRecord);

    /// Up to `limit` records, most recent first. The returned records are a snapshot.
    fn list_recent(&self, limit: usize) -> Vec<AttemptRecord>;
}

/// Used when a deployment keeps no history, appended records are dropped.
pub struct NoHistory;

impl HistoryRepository for NoHistory {
    fn append(&self, _record: AttemptRecord) {}

    fn list_recent(&self, _limit: usize) -> Vec<AttemptRecord> {
        Vec::new()
    }
}
