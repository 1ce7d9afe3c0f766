//! Single-file `multipart/form-data` bodies.

use picsync_error::{HttpError, HttpErrorKind};

/// Every boundary starts with this, followed by 16 random hex digits.
pub const BOUNDARY_PREFIX: &str = "----PicsyncFormBoundary";

/// A `multipart/form-data` body carrying one file in the `file` field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipartBody {
    boundary: String,
    body: Vec<u8>,
}

impl MultipartBody {
    /// Encode `bytes` as the `file` part with a fresh random boundary.
    ///
    /// # Errors
    ///
    /// Returns [`HttpErrorKind::InvalidHeader`] if the file name or content
    /// type contains non-ASCII or control characters.
    pub fn single_file(bytes: &[u8], file_name: &str, content_type: &str) -> Result<Self, HttpError> {
        let boundary = format!("{}{:016x}", BOUNDARY_PREFIX, rand::random::<u64>());
        Self::with_boundary(boundary, bytes, file_name, content_type)
    }

    /// Encode with a caller-chosen boundary.
    ///
    /// # Errors
    ///
    /// Same as [`MultipartBody::single_file`].
    pub fn with_boundary(
        boundary: impl Into<String>,
        bytes: &[u8],
        file_name: &str,
        content_type: &str,
    ) -> Result<Self, HttpError> {
        let boundary = boundary.into();
        let file_name = header_text(file_name, "file name")?;
        let content_type = header_text(content_type, "content type")?;

        let head = format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\n\
             Content-Type: {content_type}\r\n\r\n"
        );
        let tail = format!("\r\n--{boundary}--\r\n");

        let mut body = Vec::with_capacity(head.len() + bytes.len() + tail.len());
        body.extend_from_slice(head.as_bytes());
        body.extend_from_slice(bytes);
        body.extend_from_slice(tail.as_bytes());

        Ok(Self { boundary, body })
    }

    /// The boundary string (without leading dashes).
    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// Value for the request's `Content-Type` header.
    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    /// Encoded body bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.body
    }

    /// Consume into the encoded body.
    pub fn into_bytes(self) -> Vec<u8> {
        self.body
    }
}

/// Make `value` safe to embed in a quoted part header.
fn header_text(value: &str, what: &str) -> Result<String, HttpError> {
    if let Some(bad) = value.chars().find(|c| !c.is_ascii() || c.is_ascii_control()) {
        return Err(HttpError::new(HttpErrorKind::InvalidHeader(format!(
            "{} {:?} contains unsupported character {:?}",
            what, value, bad
        ))));
    }
    Ok(value.replace('"', "%22"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_layout() {
        let body = MultipartBody::with_boundary("XYZ", b"abc", "a.jpg", "image/jpeg").unwrap();
        let expected = "--XYZ\r\n\
            Content-Disposition: form-data; name=\"file\"; filename=\"a.jpg\"\r\n\
            Content-Type: image/jpeg\r\n\r\n\
            abc\r\n--XYZ--\r\n";
        assert_eq!(body.as_bytes(), expected.as_bytes());
        assert_eq!(body.content_type(), "multipart/form-data; boundary=XYZ");
    }

    #[test]
    fn random_boundary_shape() {
        let body = MultipartBody::single_file(b"", "a.png", "image/png").unwrap();
        let suffix = body.boundary().strip_prefix(BOUNDARY_PREFIX).unwrap();
        assert_eq!(suffix.len(), 16);
        assert!(suffix.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn quotes_are_escaped() {
        let body = MultipartBody::with_boundary("B", b"", "say \"cheese\".jpg", "image/jpeg").unwrap();
        let text = String::from_utf8(body.into_bytes()).unwrap();
        assert!(text.contains("filename=\"say %22cheese%22.jpg\""));
    }

    #[test]
    fn non_ascii_and_control_rejected() {
        let err = MultipartBody::single_file(b"", "café.jpg", "image/jpeg").unwrap_err();
        assert_eq!(err.kind().code(), 400);
        assert!(MultipartBody::single_file(b"", "a\r\nb.jpg", "image/jpeg").is_err());
        assert!(MultipartBody::single_file(b"", "a.jpg", "image/jpeg\n").is_err());
    }

    #[test]
    fn binary_payload_untouched() {
        let payload = [0u8, 255, 13, 10, 45, 45];
        let body = MultipartBody::with_boundary("B", &payload, "x.bin", "image/jpeg").unwrap();
        let bytes = body.as_bytes();
        assert!(bytes.windows(payload.len()).any(|w| w == payload));
    }
}
