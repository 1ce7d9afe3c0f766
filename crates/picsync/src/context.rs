//! Application dependency container.

use picsync_client::{AuthManager, MediaClient, MediaTransport};
use picsync_config::{PicsyncConfig, SettingsStore};
use picsync_error::{HostError, HostErrorKind, PicsyncResult};
use picsync_host::{
    DirectoryPhotoLibrary, JsonFileStore, KeyValueStore, MediaSourceAdapter, PhotoLibrary,
};
use picsync_sync::{GalleryScreen, UploadScheduler};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Every long-lived service, built once at startup and passed down.
#[derive(Clone)]
pub struct AppContext {
    config: PicsyncConfig,
    store: Arc<dyn KeyValueStore>,
    settings: SettingsStore,
    auth: Arc<AuthManager>,
    library: Arc<dyn PhotoLibrary>,
    client: Arc<MediaClient>,
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("config", &self.config)
            .field("server_url", &self.client.base_url())
            .field("auth", &self.auth)
            .finish_non_exhaustive()
    }
}

impl AppContext {
    /// Desktop context: JSON settings file in the config dir, photos from
    /// the configured (or platform) picture directory.
    ///
    /// # Errors
    ///
    /// Returns error if no photo directory or settings location can be found,
    /// or either cannot be opened.
    #[instrument(skip(config))]
    pub fn load(config: PicsyncConfig) -> PicsyncResult<Self> {
        let store_path = JsonFileStore::default_path().ok_or_else(|| {
            HostError::new(HostErrorKind::Storage(
                "No configuration directory for the settings store".to_string(),
            ))
        })?;
        let store = Arc::new(JsonFileStore::open(&store_path)?);

        let photo_dir = config.library().resolved_photo_dir().ok_or_else(|| {
            HostError::new(HostErrorKind::Enumeration(
                "No photo directory configured and no platform picture directory".to_string(),
            ))
        })?;
        let library = Arc::new(DirectoryPhotoLibrary::new(photo_dir)?);

        Self::new(config, store, library)
    }

    /// Context over explicit host collaborators.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built.
    pub fn new(
        config: PicsyncConfig,
        store: Arc<dyn KeyValueStore>,
        library: Arc<dyn PhotoLibrary>,
    ) -> PicsyncResult<Self> {
        let settings = SettingsStore::new(Arc::clone(&store), config.server().base_url())
            .with_default_upload(*config.upload());
        let auth = Arc::new(AuthManager::load(Arc::clone(&store)));
        let server_url = settings.server_url();
        debug!(server_url = %server_url, "Building media client");
        let client = Arc::new(MediaClient::new(
            &server_url,
            config.server().request_timeout(),
            Arc::clone(&auth),
        )?);

        Ok(Self {
            config,
            store,
            settings,
            auth,
            library,
            client,
        })
    }

    /// Same services, talking to a different server.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built.
    pub fn with_server_url(&self, server_url: &str) -> PicsyncResult<Self> {
        let client = Arc::new(MediaClient::new(
            server_url,
            self.config.server().request_timeout(),
            Arc::clone(&self.auth),
        )?);
        Ok(Self {
            client,
            ..self.clone()
        })
    }

    /// File/env configuration.
    pub fn config(&self) -> &PicsyncConfig {
        &self.config
    }

    /// Host key-value store.
    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    /// Persisted user settings.
    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    /// Session state.
    pub fn auth(&self) -> &Arc<AuthManager> {
        &self.auth
    }

    /// Media server client.
    pub fn client(&self) -> &Arc<MediaClient> {
        &self.client
    }

    /// Client as the transport seam.
    pub fn transport(&self) -> Arc<dyn MediaTransport> {
        self.client.clone()
    }

    /// Device photo source.
    pub fn media_source(&self) -> MediaSourceAdapter {
        MediaSourceAdapter::new(Arc::clone(&self.library))
    }

    /// Upload worker pool over this context's library and client.
    pub fn scheduler(&self) -> UploadScheduler {
        UploadScheduler::new(Arc::clone(&self.library), self.transport())
    }

    /// A fresh gallery screen.
    pub fn gallery_screen(&self) -> GalleryScreen {
        GalleryScreen::new(
            self.media_source(),
            self.transport(),
            self.settings.clone(),
            *self.config.gallery().page_size(),
        )
    }
}
