//! Per-item and per-batch outcomes.

use crate::{DeletedMedia, UploadedMediaRecord};
use serde::{Deserialize, Serialize};

/// Discriminant of an item outcome, as reported to progress callbacks.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
pub enum OutcomeKind {
    /// The item was processed successfully
    #[display("success")]
    Success,
    /// The item failed
    #[display("error")]
    Error,
}

/// Result of uploading one file.
///
/// Every upload attempt yields one of these; failures are values, not
/// errors, so a batch can keep going past them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum UploadOutcome {
    /// The server stored the file
    Success {
        /// The record the server created
        record: UploadedMediaRecord,
    },
    /// The upload failed
    Error {
        /// Human-readable reason
        message: String,
        /// 0 for network failures, otherwise an HTTP-style status code
        code: u16,
    },
}

impl UploadOutcome {
    /// Build a failure outcome.
    pub fn failure(message: impl Into<String>, code: u16) -> Self {
        Self::Error {
            message: message.into(),
            code,
        }
    }

    /// The outcome discriminant.
    pub fn kind(&self) -> OutcomeKind {
        match self {
            Self::Success { .. } => OutcomeKind::Success,
            Self::Error { .. } => OutcomeKind::Error,
        }
    }

    /// Whether the server rejected the session while uploading.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::Error { code: 401, .. })
    }
}

/// Result of deleting one server record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DeleteOutcome {
    /// The record was deleted
    Success {
        /// Server confirmation
        deleted: DeletedMedia,
    },
    /// The delete failed
    Error {
        /// Human-readable reason
        message: String,
        /// 0 for network failures, otherwise an HTTP-style status code
        code: u16,
    },
}

impl DeleteOutcome {
    /// Build a failure outcome.
    pub fn failure(message: impl Into<String>, code: u16) -> Self {
        Self::Error {
            message: message.into(),
            code,
        }
    }

    /// The outcome discriminant.
    pub fn kind(&self) -> OutcomeKind {
        match self {
            Self::Success { .. } => OutcomeKind::Success,
            Self::Error { .. } => OutcomeKind::Error,
        }
    }
}

/// Aggregate counts for a bulk upload or delete.
///
/// # Examples
///
/// ```
/// use picsync_core::BatchSummary;
///
/// let summary = BatchSummary { success_count: 4, fail_count: 1 };
/// assert_eq!(summary.status_message("uploaded"), "4 uploaded, 1 failed");
/// assert!(summary.is_partial_failure());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Items that succeeded
    pub success_count: usize,
    /// Items that failed
    pub fail_count: usize,
}

impl BatchSummary {
    /// Record one item outcome.
    pub fn record(&mut self, kind: OutcomeKind) {
        match kind {
            OutcomeKind::Success => self.success_count += 1,
            OutcomeKind::Error => self.fail_count += 1,
        }
    }

    /// Number of items processed.
    pub fn total(&self) -> usize {
        self.success_count + self.fail_count
    }

    /// Some items succeeded and some failed.
    pub fn is_partial_failure(&self) -> bool {
        self.success_count > 0 && self.fail_count > 0
    }

    /// Banner text: `"N <verb>"` or `"N <verb>, M failed"`.
    pub fn status_message(&self, verb: &str) -> String {
        if self.fail_count == 0 {
            format!("{} {}", self.success_count, verb)
        } else {
            format!("{} {}, {} failed", self.success_count, verb, self.fail_count)
        }
    }
}
