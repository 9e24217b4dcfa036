//! Configuration management for the Shortly CLI and SDK

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::error::{Result, ShortlyError};

/// Path prefix the same-origin rewrite proxy strips before forwarding
pub const API_PREFIX: &str = "/api";

fn default_endpoint() -> String {
    "https://api.shortly.app/api".to_string()
}

fn default_origin() -> String {
    "http://localhost:3000".to_string()
}

fn default_timeout() -> u64 {
    30
}

/// Credential storage configuration
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct CredentialStorageConfig {
    #[serde(default)]
    pub enabled: bool,
    pub storage_path: Option<String>,
}

/// Client configuration
///
/// `base_url` empty means proxy mode: request paths get the [`API_PREFIX`]
/// and are served by the same-origin host in `origin`, mirroring a
/// deployment where the web front-end rewrites `/api/*` to the backend.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub base_url: String,
    #[serde(default = "default_origin")]
    pub origin: String,
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    #[serde(default)]
    pub verbose: bool,
    #[serde(default)]
    pub credential_storage: CredentialStorageConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_endpoint(),
            origin: default_origin(),
            timeout: default_timeout(),
            verbose: false,
            credential_storage: CredentialStorageConfig::default(),
        }
    }
}

impl ClientConfig {
    pub fn new() -> Result<Self> {
        Self::from_file_and_env::<&str>(None)
    }

    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::new()
    }

    /// Layer defaults, an optional config file, and `SHORTLY_*` environment
    /// variables (highest precedence)
    pub fn from_file_and_env<P: AsRef<Path>>(config_file: Option<P>) -> Result<Self> {
        let mut builder = Config::builder()
            .set_default("base_url", default_endpoint())?
            .set_default("origin", default_origin())?
            .set_default("timeout", 30)?
            .set_default("verbose", false)?;

        if let Some(config_path) = config_file {
            if config_path.as_ref().exists() {
                builder = builder.add_source(File::from(config_path.as_ref()));
            }
        }
        builder = builder.add_source(Environment::with_prefix("SHORTLY").try_parsing(true));

        let config = builder.build()?;
        Ok(config.try_deserialize()?)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.base_url.is_empty()
            && !self.base_url.starts_with("http://")
            && !self.base_url.starts_with("https://")
        {
            return Err(ShortlyError::invalid_endpoint(format!(
                "Base URL must be absolute or empty for proxy mode: {}",
                self.base_url
            )));
        }
        if self.is_proxy_mode() && self.origin.is_empty() {
            return Err(ShortlyError::invalid_endpoint(
                "Proxy mode requires an origin",
            ));
        }
        if self.timeout == 0 {
            return Err(ShortlyError::invalid_input("Timeout cannot be zero"));
        }
        Ok(())
    }

    /// No configured API host; paths are rewritten by the same-origin proxy
    pub fn is_proxy_mode(&self) -> bool {
        self.base_url.is_empty()
    }

    /// Path-level resolution: a configured base URL is prepended verbatim,
    /// proxy mode enforces the API prefix and leaves the path root-relative
    pub fn resolve_path(&self, path: &str) -> String {
        if !self.base_url.is_empty() {
            format!("{}{}", self.base_url.trim_end_matches('/'), path)
        } else if path.starts_with(API_PREFIX) {
            path.to_string()
        } else {
            format!("{}{}", API_PREFIX, path)
        }
    }

    /// Absolute URL for one request; proxy-mode paths are served by `origin`
    pub fn request_url(&self, path: &str) -> String {
        let resolved = self.resolve_path(path);
        if resolved.starts_with("http://") || resolved.starts_with("https://") {
            resolved
        } else {
            format!("{}{}", self.origin.trim_end_matches('/'), resolved)
        }
    }
}

/// Builder for ClientConfig
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    base_url: Option<String>,
    origin: Option<String>,
    timeout: Option<u64>,
    verbose: Option<bool>,
    credential_storage: Option<CredentialStorageConfig>,
    config_file: Option<PathBuf>,
}

impl ClientConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn origin<S: Into<String>>(mut self, origin: S) -> Self {
        self.origin = Some(origin.into());
        self
    }

    pub fn timeout(mut self, timeout: u64) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = Some(verbose);
        self
    }

    pub fn credential_storage(mut self, credential_storage: CredentialStorageConfig) -> Self {
        self.credential_storage = Some(credential_storage);
        self
    }

    pub fn config_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_file = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn build(self) -> Result<ClientConfig> {
        let mut config = ClientConfig::from_file_and_env(self.config_file.as_deref())?;

        if let Some(base_url) = self.base_url {
            config.base_url = base_url;
        }
        if let Some(origin) = self.origin {
            config.origin = origin;
        }
        if let Some(timeout) = self.timeout {
            config.timeout = timeout;
        }
        if let Some(verbose) = self.verbose {
            config.verbose = verbose;
        }
        if let Some(credential_storage) = self.credential_storage {
            config.credential_storage = credential_storage;
        }

        config.validate()?;
        Ok(config)
    }
}

/// Settings persisted by the CLI between invocations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CliConfig {
    pub endpoint: String,
    pub timeout: u64,
    pub verbose: bool,
    pub storage_dir: PathBuf,
    pub credential_storage_enabled: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout: default_timeout(),
            verbose: false,
            storage_dir: default_storage_dir(),
            credential_storage_enabled: true,
        }
    }
}

impl CliConfig {
    pub async fn load(config_path: Option<&Path>) -> Result<Self> {
        let config_file = match config_path {
            Some(path) => path.to_path_buf(),
            None => default_config_path(),
        };

        if config_file.exists() {
            let content = fs::read_to_string(&config_file).await?;

            match serde_json::from_str::<Self>(&content) {
                Ok(config) => Ok(config),
                Err(_) => {
                    // Unreadable config is replaced rather than fatal.
                    let config = Self::default();
                    config.save(&config_file).await?;
                    Ok(config)
                }
            }
        } else {
            let config = Self::default();
            config.save(&config_file).await?;
            Ok(config)
        }
    }

    pub async fn save(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(config_path, content).await?;
        Ok(())
    }

    /// SDK configuration backing this CLI profile
    pub fn to_client_config(&self) -> Result<ClientConfig> {
        let mut builder = ClientConfig::builder()
            .base_url(self.endpoint.clone())
            .timeout(self.timeout)
            .verbose(self.verbose);

        if self.credential_storage_enabled {
            let credential_path = self.storage_dir.join("credentials.json");
            builder = builder.credential_storage(CredentialStorageConfig {
                enabled: true,
                storage_path: Some(credential_path.to_string_lossy().to_string()),
            });
        }

        builder.build()
    }
}

pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("shortly")
}

pub fn default_config_path() -> PathBuf {
    default_config_dir().join("config.json")
}

pub fn default_storage_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("shortly")
}
