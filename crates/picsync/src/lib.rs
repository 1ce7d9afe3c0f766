//! picsync - photo gallery upload orchestration
//!
//! picsync pages through a device photo library, works out which photos a
//! media server already holds, and uploads the rest with a bounded worker
//! pool. The same core drives a phone gallery screen and the `picsync` CLI.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use picsync::{AppContext, PicsyncConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let context = AppContext::load(PicsyncConfig::load()?)?;
//!     let mut screen = context.gallery_screen();
//!
//!     screen.load_initial().await;
//!     for item in screen.items() {
//!         println!("{} uploaded={}", item.photo.file_name, item.is_uploaded);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - `picsync_error` - Error types
//! - `picsync_core` - Photo, record and outcome types, telemetry
//! - `picsync_host` - Photo library and key-value store boundary
//! - `picsync_config` - Layered configuration and persisted settings
//! - `picsync_client` - Media server client and session state
//! - `picsync_sync` - Reconciler, upload scheduler, gallery screen
//!
//! This crate re-exports everything and adds [`AppContext`], the explicitly
//! constructed container the application root hands to each screen.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod context;

pub use context::AppContext;

pub use picsync_client::*;
pub use picsync_config::*;
pub use picsync_core::*;
pub use picsync_error::*;
pub use picsync_host::*;
pub use picsync_sync::*;
