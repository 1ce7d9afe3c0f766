//! Upload orchestration for picsync.
//!
//! - [`reconcile`]: local photos vs. server records, by file name
//! - [`UploadScheduler`]: pull-based worker pool with a concurrency cap
//! - [`GalleryScreen`]: paging, selection and batch actions over both
//!
//! # Example
//!
//! ```rust,no_run
//! use picsync_sync::UploadScheduler;
//! # use std::sync::Arc;
//! # async fn example(
//! #     library: Arc<dyn picsync_host::PhotoLibrary>,
//! #     transport: Arc<dyn picsync_client::MediaTransport>,
//! #     photos: Vec<picsync_core::PhotoDescriptor>,
//! # ) {
//! let scheduler = UploadScheduler::new(library, transport);
//! let summary = scheduler
//!     .run_uploads(&photos, 3, |id, kind| println!("{}: {}", id, kind))
//!     .await;
//! println!("{}", summary.status_message("uploaded"));
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod pagination;
mod progress;
mod reconcile;
mod scheduler;
mod screen;
mod selection;

pub use pagination::PaginationState;
pub use progress::{UploadProgress, UploadStatus};
pub use reconcile::{reconcile, reconcile_or_degrade};
pub use scheduler::{UploadReport, UploadScheduler};
pub use screen::{GalleryScreen, ScreenEvent, TapEffect, SESSION_EXPIRED};
pub use selection::{SelectionMode, SelectionSet};
