//! Core data types for picsync.
//!
//! This crate provides the value types shared by every picsync crate: the
//! photo descriptors produced by the device media source, the records the
//! media server keeps about uploaded files, the derived gallery view model,
//! and the per-item and per-batch outcomes of uploads and deletes.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod content_type;
mod gallery;
mod media;
mod outcome;
mod photo;
mod status;
mod telemetry;

pub use content_type::ContentType;
pub use gallery::GalleryItem;
pub use media::{DeletedMedia, UploadedMediaRecord};
pub use outcome::{BatchSummary, DeleteOutcome, OutcomeKind, UploadOutcome};
pub use photo::PhotoDescriptor;
pub use status::{StatusKind, StatusMessage};
pub use telemetry::init_telemetry;
