//! Assistant configuration loaded via OrthoConfig.
//!
//! Every field is optional. Accessors apply the documented fallbacks and
//! validate values that need parsing, so `main` can fail fast with one
//! error.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

use crate::domain::{
    IdentityMode, ImageStore, ParseIdentityModeError, VocabularyCacheConfig,
};
use crate::outbound::identity::DEFAULT_IDENTITY_ENDPOINT;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_IDENTITY_TIMEOUT_MS: u64 = 3_000;

fn default_catalogue_fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join("catalogue.json")
}

/// Errors raised when a configured value cannot be used.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// `bind_addr` is not a socket address.
    #[error("invalid bind address `{value}`: {source}")]
    BindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
    /// `identity_mode` is not a known mode.
    #[error(transparent)]
    IdentityMode(#[from] ParseIdentityModeError),
    /// `identity_endpoint` is not a URL.
    #[error("invalid identity endpoint `{value}`: {source}")]
    IdentityEndpoint {
        value: String,
        #[source]
        source: url::ParseError,
    },
}

/// Configuration values for the assistant server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "ASSISTANT")]
pub struct AssistantSettings {
    /// Socket address the HTTP server binds to.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL; the in-memory adapters are used when absent.
    pub database_url: Option<String>,
    /// Catalogue snapshot loaded when no database is configured.
    pub catalogue_fixture: Option<PathBuf>,
    /// `credential` or `session_user`.
    pub identity_mode: Option<String>,
    /// Identity provider profile endpoint.
    pub identity_endpoint: Option<String>,
    /// Identity provider request timeout in milliseconds.
    pub identity_timeout_ms: Option<u64>,
    /// Base URL of the screenshot bucket.
    pub image_base_url: Option<String>,
    /// Maximum number of cached vocabularies.
    pub vocabulary_cache_capacity: Option<u64>,
    /// Lifetime of a cached vocabulary in seconds.
    pub vocabulary_cache_ttl_secs: Option<u64>,
}

impl AssistantSettings {
    /// Bind address, `0.0.0.0:8080` by default.
    ///
    /// # Errors
    ///
    /// [`SettingsError::BindAddr`] when the value does not parse.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value.parse().map_err(|source| SettingsError::BindAddr {
            value: value.to_owned(),
            source,
        })
    }

    /// Catalogue snapshot path, `fixtures/catalogue.json` by default.
    pub fn catalogue_fixture(&self) -> PathBuf {
        self.catalogue_fixture
            .clone()
            .unwrap_or_else(default_catalogue_fixture)
    }

    /// Identity mode, [`IdentityMode::Credential`] by default.
    ///
    /// # Errors
    ///
    /// [`SettingsError::IdentityMode`] for unknown modes.
    pub fn identity_mode(&self) -> Result<IdentityMode, SettingsError> {
        self.identity_mode
            .as_deref()
            .map_or(Ok(IdentityMode::default()), str::parse::<IdentityMode>)
            .map_err(SettingsError::from)
    }

    /// Identity provider endpoint.
    ///
    /// # Errors
    ///
    /// [`SettingsError::IdentityEndpoint`] when the value is not a URL.
    pub fn identity_endpoint(&self) -> Result<Url, SettingsError> {
        let value = self
            .identity_endpoint
            .as_deref()
            .unwrap_or(DEFAULT_IDENTITY_ENDPOINT);
        Url::parse(value).map_err(|source| SettingsError::IdentityEndpoint {
            value: value.to_owned(),
            source,
        })
    }

    /// Identity provider timeout, three seconds by default.
    pub fn identity_timeout(&self) -> Duration {
        Duration::from_millis(
            self.identity_timeout_ms
                .unwrap_or(DEFAULT_IDENTITY_TIMEOUT_MS),
        )
    }

    /// Screenshot bucket.
    pub fn image_store(&self) -> ImageStore {
        self.image_base_url
            .as_deref()
            .map_or_else(ImageStore::default, ImageStore::new)
    }

    /// Vocabulary cache bounds.
    pub fn vocabulary_cache(&self) -> VocabularyCacheConfig {
        let defaults = VocabularyCacheConfig::default();
        VocabularyCacheConfig {
            capacity: self.vocabulary_cache_capacity.unwrap_or(defaults.capacity),
            ttl: self
                .vocabulary_cache_ttl_secs
                .map_or(defaults.ttl, Duration::from_secs),
        }
    }
}
