use crate::{AuthManager, MediaTransport, MultipartBody};
use async_trait::async_trait;
use picsync_core::{DeleteOutcome, DeletedMedia, UploadOutcome, UploadedMediaRecord};
use picsync_error::{HttpError, HttpErrorKind, PicsyncResult};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::instrument;

#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: String,
}

/// Client for the picsync media server.
#[derive(Debug, Clone)]
pub struct MediaClient {
    base_url: String,
    base: reqwest::Url,
    client: reqwest::Client,
    auth: Arc<AuthManager>,
}

impl MediaClient {
    /// Create a client for `base_url` (e.g. `http://host:8000/api`).
    ///
    /// # Errors
    ///
    /// Returns error if `base_url` is not an absolute http(s) URL or the
    /// underlying HTTP client cannot be built.
    #[instrument(skip(base_url, auth), fields(base_url = %base_url.as_ref()))]
    pub fn new(
        base_url: impl AsRef<str>,
        timeout: Duration,
        auth: Arc<AuthManager>,
    ) -> PicsyncResult<Self> {
        tracing::debug!("Creating media client");
        let base_url = base_url.as_ref().trim_end_matches('/').to_string();
        let base = reqwest::Url::parse(&base_url)
            .ok()
            .filter(|url| !url.cannot_be_a_base())
            .ok_or_else(|| HttpError::new(HttpErrorKind::InvalidUrl(base_url.clone())))?;

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                HttpError::new(HttpErrorKind::Network(format!(
                    "Failed to build HTTP client: {}",
                    e
                )))
            })?;

        Ok(Self {
            base_url,
            base,
            client,
            auth,
        })
    }

    /// Server base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Shared auth state.
    pub fn auth(&self) -> &Arc<AuthManager> {
        &self.auth
    }

    /// URL the server streams a stored file from.
    pub fn stream_url(&self, id: &str) -> String {
        self.endpoint(&["media", "stream", id]).into()
    }

    /// Base URL with `segments` appended, each percent-encoded as one path segment.
    fn endpoint(&self, segments: &[&str]) -> reqwest::Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Check whether the server answers `GET /healthz` with a 2xx status.
    #[instrument(skip(self))]
    pub async fn health_check(&self) -> bool {
        let url = self.endpoint(&["healthz"]);
        tracing::debug!("Checking server health at {}", url);

        match self.client.get(url).send().await {
            Ok(response) if response.status().is_success() => {
                tracing::debug!("Server is healthy");
                true
            }
            Ok(response) => {
                tracing::warn!(status = %response.status(), "Server health check returned error");
                false
            }
            Err(e) => {
                tracing::warn!("Health check failed: {}", e);
                false
            }
        }
    }

    /// Log in and keep the returned token.
    ///
    /// Returns `Ok(false)` when the server rejects the credentials.
    ///
    /// # Errors
    ///
    /// Returns error if the server cannot be reached, answers with a server
    /// error, or the token cannot be persisted.
    #[instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> PicsyncResult<bool> {
        let url = self.endpoint(&["login"]);
        let request = self
            .client
            .post(url)
            .json(&serde_json::json!({ "username": username, "password": password }));

        match self.execute::<LoginResponse>(request, false).await {
            Ok(login) if !login.token.is_empty() => {
                self.auth.set_authenticated(&login.token).await?;
                Ok(true)
            }
            Ok(_) => {
                tracing::warn!("Login response carried an empty token");
                Ok(false)
            }
            Err(e) => match e.kind() {
                HttpErrorKind::Status { status, .. } if (400..500).contains(status) => {
                    tracing::info!(status, "Login rejected");
                    Ok(false)
                }
                _ => Err(e.into()),
            },
        }
    }

    /// Drop the session token.
    ///
    /// # Errors
    ///
    /// Returns error if the cleared token cannot be persisted.
    pub async fn logout(&self) -> PicsyncResult<()> {
        self.auth.invalidate().await
    }

    /// Upload one file as `multipart/form-data` to `POST /media/upload`.
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    pub async fn upload(&self, bytes: Vec<u8>, file_name: &str, content_type: &str) -> UploadOutcome {
        let size = bytes.len();
        let multipart = match MultipartBody::single_file(&bytes, file_name, content_type) {
            Ok(multipart) => multipart,
            Err(e) => {
                tracing::warn!("Refusing upload: {}", e);
                return UploadOutcome::failure(e.kind().message(), e.kind().code());
            }
        };

        let url = self.endpoint(&["media", "upload"]);
        let request = self
            .client
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, multipart.content_type())
            .header("x-file-size", size.to_string())
            .body(multipart.into_bytes());

        match self.execute::<UploadedMediaRecord>(request, true).await {
            Ok(record) => {
                tracing::debug!(id = %record.id, "Upload stored");
                UploadOutcome::Success { record }
            }
            Err(e) => UploadOutcome::failure(e.kind().message(), e.kind().code()),
        }
    }

    /// Every record the server holds (`GET /media`).
    ///
    /// # Errors
    ///
    /// Returns error on network failure, non-2xx status, or an undecodable body.
    #[instrument(skip(self))]
    pub async fn list_media(&self) -> PicsyncResult<Vec<UploadedMediaRecord>> {
        let url = self.endpoint(&["media"]);
        let records: Vec<UploadedMediaRecord> =
            self.execute(self.client.get(url), true).await?;
        tracing::debug!(count = records.len(), "Fetched server records");
        Ok(records)
    }

    /// Delete one record (`DELETE /media/{id}`). Blank ids are refused locally.
    #[instrument(skip(self))]
    pub async fn delete_media(&self, id: &str) -> DeleteOutcome {
        let id = id.trim();
        if id.is_empty() {
            return DeleteOutcome::failure("Image ID is required", 400);
        }

        let url = self.endpoint(&["media", id]);
        match self.execute::<Value>(self.client.delete(url), true).await {
            Ok(value) => {
                let deleted = serde_json::from_value::<DeletedMedia>(value.clone()).unwrap_or_else(|_| {
                    let message = value
                        .get("message")
                        .and_then(Value::as_str)
                        .unwrap_or_default();
                    DeletedMedia::new(id, message, chrono::Utc::now())
                });
                DeleteOutcome::Success { deleted }
            }
            Err(e) => DeleteOutcome::failure(e.kind().message(), e.kind().code()),
        }
    }

    /// Send `request` and decode a success body, bare or wrapped in `{"data": ...}`.
    ///
    /// A 401 on an authenticated request invalidates the session before the
    /// error is returned.
    async fn execute<T: DeserializeOwned>(
        &self,
        mut request: reqwest::RequestBuilder,
        authenticated: bool,
    ) -> Result<T, HttpError> {
        if authenticated {
            if let Some(token) = self.auth.token() {
                request = request.bearer_auth(token);
            }
        }

        let response = request.send().await.map_err(|e| {
            tracing::error!("Request failed: {}", e);
            HttpError::new(HttpErrorKind::Network(e.to_string()))
        })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            tracing::error!("Failed to read response body: {}", e);
            HttpError::new(HttpErrorKind::Network(e.to_string()))
        })?;
        let body: Option<Value> = serde_json::from_str(&text).ok();

        if !status.is_success() {
            let message = body
                .as_ref()
                .and_then(|body| body.get("message"))
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| {
                    format!(
                        "HTTP {}: {}",
                        status.as_u16(),
                        status.canonical_reason().unwrap_or("Unknown")
                    )
                });
            tracing::error!(status = status.as_u16(), "Server returned error: {}", message);

            if authenticated && status == reqwest::StatusCode::UNAUTHORIZED {
                if let Err(e) = self.auth.invalidate().await {
                    tracing::warn!("Failed to clear rejected token: {}", e);
                }
                return Err(HttpError::new(HttpErrorKind::Unauthorized(message)));
            }
            return Err(HttpError::new(HttpErrorKind::Status {
                status: status.as_u16(),
                message,
            }));
        }

        let payload = match body {
            Some(Value::Object(mut map)) if map.contains_key("data") => {
                map.remove("data").unwrap_or(Value::Null)
            }
            Some(value) => value,
            None => Value::Null,
        };

        serde_json::from_value(payload).map_err(|e| {
            tracing::error!("Failed to parse response: {}", e);
            HttpError::new(HttpErrorKind::Decode(format!(
                "Failed to parse response: {}",
                e
            )))
        })
    }
}

#[async_trait]
impl MediaTransport for MediaClient {
    async fn upload(&self, bytes: Vec<u8>, file_name: &str, content_type: &str) -> UploadOutcome {
        MediaClient::upload(self, bytes, file_name, content_type).await
    }

    async fn list_media(&self) -> PicsyncResult<Vec<UploadedMediaRecord>> {
        MediaClient::list_media(self).await
    }

    async fn delete_media(&self, id: &str) -> DeleteOutcome {
        MediaClient::delete_media(self, id).await
    }
}
