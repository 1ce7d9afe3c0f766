//! Error types for picsync.
//!
//! This crate provides the foundation error types used throughout the picsync workspace.
//!
//! # Error Hierarchy
//!
//! Errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - Constructors use `#[track_caller]` for automatic location capture
//!
//! A partially failed batch (some uploads succeeded, others did not) is not
//! an error at all; it is reported through the batch summary type in
//! `picsync_core`.
//!
//! # Examples
//!
//! ```
//! use picsync_error::{HttpError, HttpErrorKind, PicsyncResult};
//!
//! fn fetch_media() -> PicsyncResult<String> {
//!     Err(HttpError::new(HttpErrorKind::Network("connection refused".into())))?
//! }
//!
//! match fetch_media() {
//!     Ok(body) => println!("Got: {}", body),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod host;
mod http;
mod json;
mod state;

pub use config::ConfigError;
pub use error::{PicsyncError, PicsyncErrorKind, PicsyncResult};
pub use host::{HostError, HostErrorKind};
pub use http::{HttpError, HttpErrorKind};
pub use json::JsonError;
pub use state::{StateError, StateErrorKind};
