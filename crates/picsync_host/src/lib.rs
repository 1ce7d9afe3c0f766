//! Host capability boundary for picsync.
//!
//! On a phone these capabilities are native modules supplied by the host
//! runtime; on the desktop they are backed by a photo directory and a JSON
//! settings file. Everything above this crate talks to the traits only.
//!
//! # Example
//!
//! ```rust,no_run
//! use picsync_host::{DirectoryPhotoLibrary, MediaSourceAdapter};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let library = Arc::new(DirectoryPhotoLibrary::new("/home/me/Pictures")?);
//! let source = MediaSourceAdapter::new(library);
//!
//! let first_page = source.list_photos(20, 0).await;
//! let total = source.count_photos().await;
//! println!("{} of {} photos", first_page.len(), total);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod adapter;
mod directory;
mod kv;
mod library;
mod memory;

pub use adapter::MediaSourceAdapter;
pub use directory::DirectoryPhotoLibrary;
pub use kv::{JsonFileStore, KeyValueStore, MemoryStore};
pub use library::PhotoLibrary;
pub use memory::InMemoryPhotoLibrary;
