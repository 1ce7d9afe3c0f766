//! HTTP transport error types.

/// Kinds of failures talking to the media server.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum HttpErrorKind {
    /// The server could not be reached at all
    #[display("Network Error: {}", _0)]
    Network(String),
    /// The server answered with a non-success status
    #[display("HTTP {}: {}", status, message)]
    Status {
        /// HTTP status code
        status: u16,
        /// Message from the response body, or the status text
        message: String,
    },
    /// The server rejected the bearer token (401); the session is over
    #[display("Session expired: {}", _0)]
    Unauthorized(String),
    /// The response body could not be decoded
    #[display("Failed to decode response: {}", _0)]
    Decode(String),
    /// A request header would contain bytes that are not valid ASCII text
    #[display("Invalid header value: {}", _0)]
    InvalidHeader(String),
    /// The server base URL cannot carry request paths
    #[display("Invalid server URL: {}", _0)]
    InvalidUrl(String),
}

impl HttpErrorKind {
    /// Numeric code reported to callers: 0 for network failures, the HTTP
    /// status for server responses, 400 for requests rejected locally.
    pub fn code(&self) -> u16 {
        match self {
            HttpErrorKind::Network(_) => 0,
            HttpErrorKind::Status { status, .. } => *status,
            HttpErrorKind::Unauthorized(_) => 401,
            HttpErrorKind::Decode(_) => 502,
            HttpErrorKind::InvalidHeader(_) | HttpErrorKind::InvalidUrl(_) => 400,
        }
    }

    /// Short message suitable for a status banner.
    pub fn message(&self) -> String {
        match self {
            HttpErrorKind::Network(_) => "Network Error".to_string(),
            HttpErrorKind::Status { message, .. } => message.clone(),
            HttpErrorKind::Unauthorized(msg)
            | HttpErrorKind::Decode(msg)
            | HttpErrorKind::InvalidHeader(msg)
            | HttpErrorKind::InvalidUrl(msg) => msg.clone(),
        }
    }
}

/// HTTP error with source location.
///
/// # Examples
///
/// ```
/// use picsync_error::{HttpError, HttpErrorKind};
///
/// let err = HttpError::new(HttpErrorKind::Status {
///     status: 404,
///     message: "Not Found".into(),
/// });
/// assert_eq!(err.kind().code(), 404);
/// assert!(!err.is_unauthorized());
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("HTTP Error: {} at line {} in {}", kind, line, file)]
pub struct HttpError {
    kind: HttpErrorKind,
    line: u32,
    file: &'static str,
}

impl HttpError {
    /// Create a new HttpError at the current location.
    #[track_caller]
    pub fn new(kind: HttpErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &HttpErrorKind {
        &self.kind
    }

    /// Whether this error means the session token is no longer valid.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self.kind, HttpErrorKind::Unauthorized(_))
    }
}
