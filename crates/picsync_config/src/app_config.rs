//! File and environment configuration.
//!
//! Sources, later ones overriding earlier ones:
//! 1. Bundled defaults (include_str! from picsync.toml)
//! 2. `~/.config/picsync/picsync.toml`
//! 3. `./picsync.toml`
//! 4. `PICSYNC_<SECTION>__<KEY>` environment variables

use crate::UploadSettings;
use config::{Config, Environment, File, FileFormat};
use derive_getters::Getters;
use picsync_error::{ConfigError, PicsyncError, PicsyncResult};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, instrument};

/// Bundled default configuration.
const DEFAULT_CONFIG: &str = include_str!("../picsync.toml");

/// Media server connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Getters)]
pub struct ServerConfig {
    /// Base URL every endpoint path is appended to
    base_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    request_timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

impl ServerConfig {
    /// Server settings for `base_url` with the default timeout.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            request_timeout_secs: default_timeout_secs(),
        }
    }

    /// Replace the base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Request timeout as a duration.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Local gallery paging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Getters)]
pub struct GalleryConfig {
    /// Photos loaded per page
    #[serde(default = "default_page_size")]
    page_size: usize,
}

fn default_page_size() -> usize {
    20
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}

/// Where device photos come from on the desktop.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LibraryConfig {
    /// Photo directory; the platform picture directory when unset
    #[serde(default)]
    pub photo_dir: Option<PathBuf>,
}

impl LibraryConfig {
    /// Configured photo directory, falling back to the platform default.
    pub fn resolved_photo_dir(&self) -> Option<PathBuf> {
        self.photo_dir.clone().or_else(dirs::picture_dir)
    }
}

/// Top-level picsync configuration.
///
/// # Example
///
/// ```no_run
/// use picsync_config::PicsyncConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = PicsyncConfig::load()?;
/// println!("Uploading to {}", config.server().base_url());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct PicsyncConfig {
    /// Media server
    server: ServerConfig,

    /// Upload behaviour defaults
    #[serde(default)]
    upload: UploadSettings,

    /// Gallery paging
    #[serde(default)]
    gallery: GalleryConfig,

    /// Photo source
    #[serde(default)]
    library: LibraryConfig,
}

impl Default for PicsyncConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::new("http://192.168.240.1:8000/api"),
            upload: UploadSettings::default(),
            gallery: GalleryConfig::default(),
            library: LibraryConfig::default(),
        }
    }
}

impl PicsyncConfig {
    /// Parse configuration from TOML text layered over the bundled defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid TOML or fails validation.
    #[instrument(skip(toml))]
    pub fn from_toml_str(toml: &str) -> PicsyncResult<Self> {
        let config: Self = Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .map_err(|e| {
                PicsyncError::from(ConfigError::new(format!(
                    "Failed to build configuration: {}",
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                PicsyncError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })?;
        config.validated()
    }

    /// Load configuration from a specific file layered over the bundled defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<std::path::Path>) -> PicsyncResult<Self> {
        debug!("Loading configuration from file");

        let config: Self = Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .add_source(File::from(path.as_ref()))
            .build()
            .map_err(|e| {
                PicsyncError::from(ConfigError::new(format!(
                    "Failed to read configuration from {}: {}",
                    path.as_ref().display(),
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                PicsyncError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })?;
        config.validated()
    }

    /// Load configuration with precedence: environment > current dir > home dir > bundled.
    ///
    /// User config files are optional and silently skipped if not found.
    #[instrument]
    pub fn load() -> PicsyncResult<Self> {
        debug!("Loading configuration with precedence: env > current dir > home dir > bundled defaults");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/picsync/picsync.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder
            .add_source(File::with_name("picsync").required(false))
            .add_source(
                Environment::with_prefix("PICSYNC")
                    .prefix_separator("_")
                    .separator("__"),
            );

        let config: Self = builder
            .build()
            .map_err(|e| {
                PicsyncError::from(ConfigError::new(format!(
                    "Failed to build configuration: {}",
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                PicsyncError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })?;
        config.validated()
    }

    /// Replace the upload settings (used when persisted settings override the files).
    pub fn with_upload(mut self, upload: UploadSettings) -> Self {
        self.upload = upload.clamped();
        self
    }

    /// Read photos from `photo_dir`.
    pub fn with_photo_dir(mut self, photo_dir: impl Into<PathBuf>) -> Self {
        self.library.photo_dir = Some(photo_dir.into());
        self
    }

    /// Replace the server base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.server = self.server.with_base_url(base_url);
        self
    }

    fn validated(mut self) -> PicsyncResult<Self> {
        let base_url = self.server.base_url.trim().trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::new(format!(
                "server.base_url must be an http(s) URL, got {:?}",
                self.server.base_url
            ))
            .into());
        }
        if self.gallery.page_size == 0 {
            return Err(ConfigError::new("gallery.page_size must be at least 1").into());
        }
        self.server.base_url = base_url;
        self.upload = self.upload.clamped();
        Ok(self)
    }
}
