//! Matching local photos against the server's uploaded records.

use picsync_core::{GalleryItem, PhotoDescriptor, UploadedMediaRecord};
use picsync_error::PicsyncResult;
use std::collections::HashMap;

/// Mark each local photo uploaded iff its file name exactly matches some
/// record's original file name.
///
/// Builds one `original_file_name -> id` map, so the cost is O(n + m).
/// When several records share a name, the first one's id is used.
///
/// # Examples
///
/// ```
/// use picsync_core::{PhotoDescriptor, UploadedMediaRecord};
/// use picsync_sync::reconcile;
///
/// let local = vec![
///     PhotoDescriptor::new("1", "/p/a.jpg", "a.jpg", 10),
///     PhotoDescriptor::new("2", "/p/b.jpg", "b.jpg", 10),
/// ];
/// let server: Vec<UploadedMediaRecord> = serde_json::from_str(r#"[{
///     "id": "r1", "filename": "x.jpg", "original_filename": "a.jpg",
///     "file_size": 10, "content_type": "image/jpeg",
///     "uploaded_at": "2024-05-01T10:00:00Z"
/// }]"#).unwrap();
///
/// let items = reconcile(&local, &server);
/// assert!(items[0].is_uploaded);
/// assert!(!items[1].is_uploaded);
/// ```
pub fn reconcile(local: &[PhotoDescriptor], server: &[UploadedMediaRecord]) -> Vec<GalleryItem> {
    let mut uploaded: HashMap<&str, &str> = HashMap::with_capacity(server.len());
    for record in server {
        uploaded
            .entry(record.original_file_name.as_str())
            .or_insert(record.id.as_str());
    }

    local
        .iter()
        .map(|photo| match uploaded.get(photo.file_name.as_str()) {
            Some(id) => GalleryItem::uploaded(photo.clone(), *id),
            None => GalleryItem::not_uploaded(photo.clone()),
        })
        .collect()
}

/// Reconcile against a fetch that may have failed.
///
/// A failed fetch degrades to "nothing is uploaded" instead of failing the view.
pub fn reconcile_or_degrade(
    local: &[PhotoDescriptor],
    server: &PicsyncResult<Vec<UploadedMediaRecord>>,
) -> Vec<GalleryItem> {
    match server {
        Ok(records) => reconcile(local, records),
        Err(e) => {
            tracing::debug!(error = %e, "Server records unavailable, showing everything as not uploaded");
            local.iter().cloned().map(GalleryItem::not_uploaded).collect()
        }
    }
}
