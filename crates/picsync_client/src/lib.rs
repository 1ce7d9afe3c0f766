//! Media server client for picsync.
//!
//! [`MediaClient`] speaks the server's HTTP API: multipart uploads, the
//! uploaded-record listing, deletes, login and health checks. It implements
//! [`MediaTransport`], the seam the upload scheduler and gallery screen are
//! written against, so tests can swap in an in-process fake.
//!
//! [`AuthManager`] owns the session token. Any request the server answers
//! with 401 invalidates it before the failure is handed back.
//!
//! # Example
//!
//! ```rust,no_run
//! use picsync_client::{AuthManager, MediaClient};
//! use picsync_host::MemoryStore;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let auth = Arc::new(AuthManager::load(Arc::new(MemoryStore::new())));
//! let client = MediaClient::new("http://192.168.1.20:8000/api", Duration::from_secs(30), auth)?;
//!
//! if client.login("me", "secret").await? {
//!     let records = client.list_media().await?;
//!     println!("{} files on the server", records.len());
//! }
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod auth;
mod client;
mod multipart;
mod transport;

pub use auth::{AuthManager, AuthState, AUTH_TOKEN_KEY};
pub use client::MediaClient;
pub use multipart::{MultipartBody, BOUNDARY_PREFIX};
pub use transport::MediaTransport;
