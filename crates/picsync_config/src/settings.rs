//! Upload settings.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Lowest allowed parallel upload count.
pub const MIN_PARALLEL_UPLOADS: u32 = 1;

/// Highest allowed parallel upload count.
pub const MAX_PARALLEL_UPLOADS_LIMIT: u32 = 10;

/// User-tunable upload behaviour.
///
/// # Example
///
/// ```toml
/// [upload]
/// max_parallel_uploads = 3
/// auto_upload = true
/// auto_upload_concurrency = 2
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Getters,
    derive_setters::Setters,
    derive_builder::Builder,
)]
#[setters(prefix = "with_")]
#[builder(default)]
pub struct UploadSettings {
    /// Worker count for manual uploads (clamped to 1..=10)
    #[serde(default = "default_max_parallel_uploads", alias = "maxParallelUploads")]
    max_parallel_uploads: u32,

    /// Upload new photos in the background while the gallery is idle
    #[serde(default, alias = "autoUpload")]
    auto_upload: bool,

    /// Worker cap for background uploads
    #[serde(default = "default_auto_upload_concurrency", alias = "autoUploadConcurrency")]
    auto_upload_concurrency: u32,
}

fn default_max_parallel_uploads() -> u32 {
    3
}

fn default_auto_upload_concurrency() -> u32 {
    2
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            max_parallel_uploads: default_max_parallel_uploads(),
            auto_upload: false,
            auto_upload_concurrency: default_auto_upload_concurrency(),
        }
    }
}

impl UploadSettings {
    /// Copy with every count forced into its allowed range.
    pub fn clamped(self) -> Self {
        let max_parallel_uploads = self
            .max_parallel_uploads
            .clamp(MIN_PARALLEL_UPLOADS, MAX_PARALLEL_UPLOADS_LIMIT);
        Self {
            max_parallel_uploads,
            auto_upload: self.auto_upload,
            auto_upload_concurrency: self
                .auto_upload_concurrency
                .clamp(MIN_PARALLEL_UPLOADS, MAX_PARALLEL_UPLOADS_LIMIT),
        }
    }

    /// Worker count for background uploads: never more than manual uploads get.
    pub fn effective_auto_upload_concurrency(&self) -> usize {
        self.auto_upload_concurrency
            .min(self.max_parallel_uploads)
            .max(MIN_PARALLEL_UPLOADS) as usize
    }
}
