//! Configuration System
//!
//! Client configuration with layered loading: built-in defaults, an optional
//! TOML file, then `ACCOUNTS_*` environment variables. Each gateway builds its
//! own HTTP transport from a [`ClientConfig`].

use crate::error::ClientError;
use crate::logging::{self, LoggingConfig};
use config::{Config, ConfigBuilder, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
pub const ENV_PREFIX: &str = "ACCOUNTS";

/// Gateway configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Root of the remote API, without the `/v1/...` resource path
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// TCP connect timeout in seconds (none by default)
    #[serde(default)]
    pub connect_timeout_secs: Option<u64>,

    /// Whole-request timeout in seconds (none by default)
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,

    /// How long idle pooled connections are kept, in seconds
    #[serde(default)]
    pub pool_idle_timeout_secs: Option<u64>,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_user_agent() -> String {
    format!("accounts-client/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            connect_timeout_secs: None,
            request_timeout_secs: None,
            pool_idle_timeout_secs: None,
            user_agent: default_user_agent(),
            logging: LoggingConfig::default(),
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout_secs.map(Duration::from_secs)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    pub fn pool_idle_timeout(&self) -> Option<Duration> {
        self.pool_idle_timeout_secs.map(Duration::from_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ClientError> {
        let url = reqwest::Url::parse(&self.base_url)
            .map_err(|e| ClientError::InvalidBaseUrl(format!("{}: {}", self.base_url, e)))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ClientError::InvalidBaseUrl(format!(
                "{}: scheme must be http or https",
                self.base_url
            )));
        }
        if url.query().is_some() || url.fragment().is_some() {
            return Err(ClientError::InvalidBaseUrl(format!(
                "{}: query and fragment are not allowed",
                self.base_url
            )));
        }

        for (name, value) in [
            ("connect_timeout_secs", self.connect_timeout_secs),
            ("request_timeout_secs", self.request_timeout_secs),
        ] {
            if value == Some(0) {
                return Err(ClientError::Config(format!("{} must be greater than 0", name)));
            }
        }

        logging::validate_format(&self.logging.format)
    }
}

/// Loads [`ClientConfig`] from its layered sources.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Defaults, then `path` if given, then environment overrides.
    pub fn load(path: Option<&Path>) -> Result<ClientConfig, ClientError> {
        let mut builder = Self::builder_with_defaults()?;
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }
        builder = builder.add_source(Self::environment());
        Self::finish(builder)
    }

    /// Defaults plus a single file; environment is ignored.
    pub fn load_from_file(path: &Path) -> Result<ClientConfig, ClientError> {
        let builder = Self::builder_with_defaults()?.add_source(File::from(path).required(true));
        Self::finish(builder)
    }

    fn builder_with_defaults(
    ) -> Result<ConfigBuilder<config::builder::DefaultState>, ClientError> {
        Ok(Config::builder()
            .set_default("base_url", DEFAULT_BASE_URL)?
            .set_default("user_agent", default_user_agent())?)
    }

    /// `ACCOUNTS_BASE_URL`, `ACCOUNTS_REQUEST_TIMEOUT_SECS`, `ACCOUNTS_LOGGING__LEVEL`, ...
    fn environment() -> Environment {
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
    }

    fn finish(
        builder: ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<ClientConfig, ClientError> {
        let config: ClientConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }
}
