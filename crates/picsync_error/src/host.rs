//! Host capability error types.

/// Kinds of failures reported by host-provided capabilities.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum HostErrorKind {
    /// Photo bytes could not be read
    #[display("Image data not found: {}", _0)]
    DataUnavailable(String),
    /// The device photo store could not be enumerated
    #[display("Failed to enumerate photos: {}", _0)]
    Enumeration(String),
    /// Key-value storage failed
    #[display("Storage failure: {}", _0)]
    Storage(String),
}

/// Host error with location tracking.
///
/// # Examples
///
/// ```
/// use picsync_error::{HostError, HostErrorKind};
///
/// let err = HostError::new(HostErrorKind::DataUnavailable("/sdcard/a.jpg".into()));
/// assert!(format!("{}", err).contains("Image data not found"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Host Error: {} at line {} in {}", kind, line, file)]
pub struct HostError {
    /// The kind of error that occurred
    pub kind: HostErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl HostError {
    /// Create a new host error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: HostErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
