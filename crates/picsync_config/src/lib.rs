//! Configuration for picsync.
//!
//! Two layers feed the running application:
//!
//! - [`PicsyncConfig`]: TOML files and environment, loaded once at startup
//! - [`SettingsStore`]: user settings persisted in the host key-value store
//!   (`uploadSettings`, `serverUrl`), which override the file values

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod app_config;
mod settings;
mod store;

pub use app_config::{GalleryConfig, LibraryConfig, PicsyncConfig, ServerConfig};
pub use settings::{
    UploadSettings, UploadSettingsBuilder, MAX_PARALLEL_UPLOADS_LIMIT, MIN_PARALLEL_UPLOADS,
};
pub use store::{
    server_url_from_parts, validate_server_url, SettingsStore, SERVER_URL_KEY, UPLOAD_SETTINGS_KEY,
};
