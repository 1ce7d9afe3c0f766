//! Top-level error wrapper types.

use crate::{ConfigError, HostError, HttpError, JsonError, StateError};

/// Every error the picsync crates can surface.
///
/// # Examples
///
/// ```
/// use picsync_error::{PicsyncError, ConfigError};
///
/// let err: PicsyncError = ConfigError::new("bad url").into();
/// assert!(format!("{}", err).contains("Configuration Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum PicsyncErrorKind {
    /// Media server / transport error
    #[from(HttpError)]
    Http(HttpError),
    /// Host capability error
    #[from(HostError)]
    Host(HostError),
    /// JSON serialization/deserialization error
    #[from(JsonError)]
    Json(JsonError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Gallery state machine error
    #[from(StateError)]
    State(StateError),
}

/// picsync error with kind discrimination.
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("picsync Error: {}", _0)]
pub struct PicsyncError(Box<PicsyncErrorKind>);

impl PicsyncError {
    /// Create a new error from a kind.
    pub fn new(kind: PicsyncErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &PicsyncErrorKind {
        &self.0
    }

    /// Whether this error means the session token was rejected.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self.kind(), PicsyncErrorKind::Http(e) if e.is_unauthorized())
    }
}

// Generic From implementation for any type that converts to PicsyncErrorKind
impl<T> From<T> for PicsyncError
where
    T: Into<PicsyncErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for picsync operations.
pub type PicsyncResult<T> = std::result::Result<T, PicsyncError>;
