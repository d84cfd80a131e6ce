//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use campus_assistant::domain::{IdentityMode, ImageStore, VocabularyCacheConfig};
use campus_assistant::outbound::persistence::DbPool;
use campus_assistant::settings::{AssistantSettings, SettingsError};
use url::Url;

/// Validated configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) catalogue_fixture: PathBuf,
    pub(crate) identity_mode: IdentityMode,
    pub(crate) identity_endpoint: Url,
    pub(crate) identity_timeout: Duration,
    pub(crate) images: ImageStore,
    pub(crate) vocabulary_cache: VocabularyCacheConfig,
}

impl ServerConfig {
    /// Resolve every setting, applying fallbacks.
    ///
    /// # Errors
    ///
    /// [`SettingsError`] when a configured value does not parse.
    pub fn from_settings(settings: &AssistantSettings) -> Result<Self, SettingsError> {
        Ok(Self {
            bind_addr: settings.bind_addr()?,
            db_pool: None,
            catalogue_fixture: settings.catalogue_fixture(),
            identity_mode: settings.identity_mode()?,
            identity_endpoint: settings.identity_endpoint()?,
            identity_timeout: settings.identity_timeout(),
            images: settings.image_store(),
            vocabulary_cache: settings.vocabulary_cache(),
        })
    }

    /// Attach a database connection pool.
    ///
    /// When provided, the catalogue and user profiles are served from
    /// PostgreSQL instead of the fixture snapshot and process memory.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
