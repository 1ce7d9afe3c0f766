//! Transient status banners.

use crate::BatchSummary;
use serde::{Deserialize, Serialize};

/// Tone of a status banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusKind {
    /// Everything worked
    Success,
    /// Something failed
    Error,
    /// Neutral information
    Info,
}

/// A short message summarising the last user-visible action.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
#[display("{}", text)]
pub struct StatusMessage {
    /// Tone of the message
    pub kind: StatusKind,
    /// Rendered text; error texts start with `Error: `
    pub text: String,
}

impl StatusMessage {
    /// A success banner.
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Success,
            text: text.into(),
        }
    }

    /// An error banner.
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Error,
            text: format!("Error: {}", text.into()),
        }
    }

    /// An informational banner.
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Info,
            text: text.into(),
        }
    }

    /// Summary banner for a finished batch; any failure makes it an error.
    pub fn for_batch(summary: &BatchSummary, verb: &str) -> Self {
        let text = summary.status_message(verb);
        if summary.fail_count > 0 {
            Self {
                kind: StatusKind::Error,
                text,
            }
        } else {
            Self::success(text)
        }
    }
}
