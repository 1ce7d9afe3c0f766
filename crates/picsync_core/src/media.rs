//! Records the media server keeps about uploaded files.

use chrono::{DateTime, NaiveDateTime, Utc};
use derive_getters::Getters;
use serde::{Deserialize, Deserializer, Serialize};

/// Server-side record of a previously uploaded file.
///
/// The only key used to match a record against local photos is
/// `original_file_name`.
///
/// # Examples
///
/// ```
/// use picsync_core::UploadedMediaRecord;
///
/// let json = r#"{
///     "id": "42",
///     "filename": "5f1c.jpg",
///     "original_filename": "IMG_0001.jpg",
///     "file_size": 1024,
///     "content_type": "image/jpeg",
///     "uploaded_at": "2024-05-01T10:00:00Z"
/// }"#;
/// let record: UploadedMediaRecord = serde_json::from_str(json).unwrap();
/// assert_eq!(record.original_file_name, "IMG_0001.jpg");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UploadedMediaRecord {
    /// Server-assigned identifier
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    /// Name of the file as uploaded from the device
    #[serde(rename = "original_filename")]
    pub original_file_name: String,
    /// Name the server stored the file under
    #[serde(rename = "filename")]
    pub stored_file_name: String,
    /// Size of the stored file in bytes
    #[serde(rename = "file_size")]
    pub size_bytes: u64,
    /// MIME type recorded by the server
    pub content_type: String,
    /// When the upload completed
    #[serde(deserialize_with = "lenient_timestamp")]
    pub uploaded_at: DateTime<Utc>,
}

/// Confirmation returned by the server after deleting a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct DeletedMedia {
    #[serde(deserialize_with = "string_or_number")]
    id: String,
    #[serde(default)]
    message: String,
    #[serde(default = "Utc::now", deserialize_with = "lenient_timestamp")]
    deleted_at: DateTime<Utc>,
}

impl DeletedMedia {
    /// Create a deletion confirmation.
    pub fn new(id: impl Into<String>, message: impl Into<String>, deleted_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            message: message.into(),
            deleted_at,
        }
    }
}

/// Accept ids sent either as JSON strings or as integers.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(i64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(s) => s,
        Id::Number(n) => n.to_string(),
    })
}

/// Accept RFC 3339 timestamps and naive ISO timestamps (assumed UTC).
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    if let Ok(ts) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(&raw, "%Y-%m-%d %H:%M:%S%.f"))
        .map(|naive| naive.and_utc())
        .map_err(|e| serde::de::Error::custom(format!("invalid timestamp {raw:?}: {e}")))
}
