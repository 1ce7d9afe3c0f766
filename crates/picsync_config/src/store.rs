//! Settings persisted in the host key-value store.

use crate::UploadSettings;
use picsync_error::{ConfigError, JsonError, PicsyncResult};
use picsync_host::KeyValueStore;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Key holding the upload settings JSON object.
pub const UPLOAD_SETTINGS_KEY: &str = "uploadSettings";

/// Key holding the media server base URL.
pub const SERVER_URL_KEY: &str = "serverUrl";

/// Build a server base URL from a host and port typed in by the user.
///
/// # Errors
///
/// Returns an error if the host is blank or the port is outside 1..=65535.
///
/// # Examples
///
/// ```
/// use picsync_config::server_url_from_parts;
///
/// let url = server_url_from_parts("192.168.1.20", 8000).unwrap();
/// assert_eq!(url, "http://192.168.1.20:8000/api");
/// assert!(server_url_from_parts("192.168.1.20", 0).is_err());
/// ```
pub fn server_url_from_parts(host: &str, port: u32) -> PicsyncResult<String> {
    let host = host.trim();
    if host.is_empty() {
        return Err(ConfigError::new("Server address is required").into());
    }
    if !(1..=65535).contains(&port) {
        return Err(ConfigError::new(format!("Port must be between 1 and 65535, got {}", port)).into());
    }
    Ok(format!("http://{}:{}/api", host, port))
}

/// Normalise a user-entered server base URL.
///
/// # Errors
///
/// Returns an error if `url` is not an http(s) URL.
pub fn validate_server_url(url: &str) -> PicsyncResult<String> {
    let url = url.trim().trim_end_matches('/');
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(ConfigError::new(format!(
            "Server URL must start with http:// or https://, got {:?}",
            url
        ))
        .into());
    }
    Ok(url.to_string())
}

/// Upload settings as stored: any field may be missing.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredUploadSettings {
    #[serde(alias = "max_parallel_uploads")]
    max_parallel_uploads: Option<u32>,
    #[serde(alias = "auto_upload")]
    auto_upload: Option<bool>,
    #[serde(alias = "auto_upload_concurrency")]
    auto_upload_concurrency: Option<u32>,
}

impl StoredUploadSettings {
    fn over(self, defaults: UploadSettings) -> UploadSettings {
        let mut settings = defaults;
        if let Some(count) = self.max_parallel_uploads {
            settings = settings.with_max_parallel_uploads(count);
        }
        if let Some(enabled) = self.auto_upload {
            settings = settings.with_auto_upload(enabled);
        }
        if let Some(count) = self.auto_upload_concurrency {
            settings = settings.with_auto_upload_concurrency(count);
        }
        settings.clamped()
    }
}

/// Typed access to the persisted settings keys.
#[derive(Clone)]
pub struct SettingsStore {
    store: Arc<dyn KeyValueStore>,
    default_server_url: String,
    default_upload: UploadSettings,
}

impl std::fmt::Debug for SettingsStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingsStore")
            .field("default_server_url", &self.default_server_url)
            .field("default_upload", &self.default_upload)
            .finish_non_exhaustive()
    }
}

impl SettingsStore {
    /// Settings over `store`, using `default_server_url` until the user picks one.
    pub fn new(store: Arc<dyn KeyValueStore>, default_server_url: impl Into<String>) -> Self {
        Self {
            store,
            default_server_url: default_server_url.into(),
            default_upload: UploadSettings::default(),
        }
    }

    /// Use `defaults` for upload settings the user never changed.
    pub fn with_default_upload(mut self, defaults: UploadSettings) -> Self {
        self.default_upload = defaults.clamped();
        self
    }

    /// Underlying key-value store.
    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    /// Upload settings, with stored fields merged over the defaults.
    ///
    /// Missing or unreadable settings fall back to the defaults; counts are clamped.
    #[instrument(skip(self))]
    pub fn load_upload_settings(&self) -> UploadSettings {
        let Some(raw) = self.store.get(UPLOAD_SETTINGS_KEY) else {
            debug!("No stored upload settings, using defaults");
            return self.default_upload;
        };

        match serde_json::from_str::<StoredUploadSettings>(&raw) {
            Ok(stored) => stored.over(self.default_upload),
            Err(e) => {
                warn!(error = %e, "Stored upload settings unreadable, using defaults");
                self.default_upload
            }
        }
    }

    /// Persist upload settings (clamped first). Returns what was stored.
    #[instrument(skip(self))]
    pub fn save_upload_settings(&self, settings: UploadSettings) -> PicsyncResult<UploadSettings> {
        let settings = settings.clamped();
        let value = serde_json::json!({
            "maxParallelUploads": settings.max_parallel_uploads(),
            "autoUpload": settings.auto_upload(),
            "autoUploadConcurrency": settings.auto_upload_concurrency(),
        });
        let text = serde_json::to_string(&value).map_err(JsonError::from)?;
        self.store.set(UPLOAD_SETTINGS_KEY, &text)?;
        debug!("Saved upload settings");
        Ok(settings)
    }

    /// Overwrite stored upload settings with the defaults.
    pub fn reset_upload_settings(&self) -> PicsyncResult<UploadSettings> {
        self.save_upload_settings(self.default_upload)
    }

    /// Server base URL, or the configured default when none is stored.
    pub fn server_url(&self) -> String {
        self.store
            .get(SERVER_URL_KEY)
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| self.default_server_url.clone())
    }

    /// Persist a new server base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if `url` is not an http(s) URL.
    #[instrument(skip(self))]
    pub fn set_server_url(&self, url: &str) -> PicsyncResult<String> {
        let url = validate_server_url(url)?;
        self.store.set(SERVER_URL_KEY, &url)?;
        Ok(url)
    }
}
