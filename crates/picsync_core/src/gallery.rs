//! Gallery view model.

use crate::PhotoDescriptor;
use serde::{Deserialize, Serialize};

/// A local photo augmented with its upload status.
///
/// Derived by reconciliation whenever the local page or the server record
/// set changes. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GalleryItem {
    /// The local photo
    pub photo: PhotoDescriptor,
    /// Whether a server record with the same original file name exists
    pub is_uploaded: bool,
    /// Id of the matching server record
    pub uploaded_record_id: Option<String>,
}

impl GalleryItem {
    /// A photo with no matching server record.
    pub fn not_uploaded(photo: PhotoDescriptor) -> Self {
        Self {
            photo,
            is_uploaded: false,
            uploaded_record_id: None,
        }
    }

    /// A photo matched to the server record `record_id`.
    pub fn uploaded(photo: PhotoDescriptor, record_id: impl Into<String>) -> Self {
        Self {
            photo,
            is_uploaded: true,
            uploaded_record_id: Some(record_id.into()),
        }
    }

    /// Identity of the underlying photo.
    pub fn id(&self) -> &str {
        &self.photo.id
    }
}
