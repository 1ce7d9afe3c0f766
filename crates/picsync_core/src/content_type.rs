//! Image content types.

use serde::{Deserialize, Serialize};

/// MIME type of an uploaded photo.
///
/// The device store only tells us file names, so the content type sent with
/// an upload is inferred from the extension. Unknown extensions are sent as
/// JPEG, which is what the camera roll produces almost everywhere.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, strum::EnumIter, derive_more::Display,
)]
pub enum ContentType {
    /// image/jpeg
    #[display("image/jpeg")]
    Jpeg,
    /// image/png
    #[display("image/png")]
    Png,
    /// image/gif
    #[display("image/gif")]
    Gif,
    /// image/webp
    #[display("image/webp")]
    Webp,
    /// image/heic
    #[display("image/heic")]
    Heic,
    /// image/bmp
    #[display("image/bmp")]
    Bmp,
}

impl ContentType {
    /// MIME type string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Gif => "image/gif",
            Self::Webp => "image/webp",
            Self::Heic => "image/heic",
            Self::Bmp => "image/bmp",
        }
    }

    /// Map a file extension to its content type, if it is a known image type.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            "gif" => Some(Self::Gif),
            "webp" => Some(Self::Webp),
            "heic" | "heif" => Some(Self::Heic),
            "bmp" => Some(Self::Bmp),
            _ => None,
        }
    }

    /// Content type for a file name, falling back to JPEG.
    pub fn for_file_name(file_name: &str) -> Self {
        file_name
            .rsplit_once('.')
            .and_then(|(_, ext)| Self::from_extension(ext))
            .unwrap_or(Self::Jpeg)
    }
}
