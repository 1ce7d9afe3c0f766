//! Per-item upload status board.

use picsync_core::UploadOutcome;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Where one photo's upload stands.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum UploadStatus {
    /// A worker has claimed the item
    #[display("uploading")]
    Uploading,
    /// The server stored it
    #[display("uploaded")]
    Uploaded,
    /// The last attempt failed
    #[display("failed: {}", _0)]
    Failed(String),
}

/// Shared map of photo id to [`UploadStatus`], updated as workers finish.
///
/// Cloning shares the same board.
#[derive(Debug, Clone, Default)]
pub struct UploadProgress {
    statuses: Arc<Mutex<HashMap<String, UploadStatus>>>,
}

impl UploadProgress {
    /// Empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `id` as claimed by a worker.
    pub fn mark_uploading(&self, id: &str) {
        self.set(id, UploadStatus::Uploading);
    }

    /// Record the outcome of `id`.
    pub fn record(&self, id: &str, outcome: &UploadOutcome) {
        let status = match outcome {
            UploadOutcome::Success { .. } => UploadStatus::Uploaded,
            UploadOutcome::Error { message, .. } => UploadStatus::Failed(message.clone()),
        };
        self.set(id, status);
    }

    /// Status of `id`, if it has been touched.
    pub fn status(&self, id: &str) -> Option<UploadStatus> {
        self.statuses.lock().ok()?.get(id).cloned()
    }

    /// Ids whose last attempt failed, sorted.
    pub fn failed_ids(&self) -> Vec<String> {
        let Ok(statuses) = self.statuses.lock() else {
            return Vec::new();
        };
        let mut ids: Vec<String> = statuses
            .iter()
            .filter(|(_, status)| matches!(status, UploadStatus::Failed(_)))
            .map(|(id, _)| id.clone())
            .collect();
        ids.sort();
        ids
    }

    /// Number of items currently being uploaded.
    pub fn in_flight(&self) -> usize {
        self.statuses
            .lock()
            .map(|statuses| {
                statuses
                    .values()
                    .filter(|status| **status == UploadStatus::Uploading)
                    .count()
            })
            .unwrap_or(0)
    }

    fn set(&self, id: &str, status: UploadStatus) {
        if let Ok(mut statuses) = self.statuses.lock() {
            statuses.insert(id.to_string(), status);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_items_are_listed_until_they_succeed() {
        let progress = UploadProgress::new();
        progress.mark_uploading("a");
        progress.record("a", &UploadOutcome::failure("boom", 500));
        progress.mark_uploading("b");
        assert_eq!(progress.failed_ids(), vec!["a".to_string()]);
        assert_eq!(progress.in_flight(), 1);

        progress.mark_uploading("a");
        assert!(progress.failed_ids().is_empty());
        assert_eq!(progress.status("a"), Some(UploadStatus::Uploading));
    }
}
