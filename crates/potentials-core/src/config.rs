//! Configuration for potentials-core
//!
//! Cache directories, mirror and resolver endpoints, and HTTP settings are
//! passed explicitly to every lookup instead of being derived from the
//! install location.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Raw-file root of the GitHub copy of the potentials data directory
pub const DEFAULT_MIRROR_BASE_URL: &str = "https://github.com/lmhale99/potentials/raw/master/data";

/// DOI content-negotiation endpoint
pub const DEFAULT_RESOLVER_BASE_URL: &str = "https://doi.org";

/// Settings shared by citation and potential lookups
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PotentialsConfig {
    /// Directory holding cached `.bib` files
    pub bibtex_dir: PathBuf,
    /// Directory holding cached potential `.json` records
    pub potential_dir: PathBuf,
    /// Base URL of the mirror; `bibtex/` and `potential/` are appended
    pub mirror_base_url: String,
    /// Base URL of the DOI resolver
    pub resolver_base_url: String,
    /// User-Agent sent with every request
    pub user_agent: String,
    /// Request timeout in seconds; `None` keeps the HTTP client default
    pub timeout_secs: Option<u64>,
    /// Log where each record came from at info level
    pub verbose: bool,
}

impl Default for PotentialsConfig {
    fn default() -> Self {
        let root = dirs::data_dir()
            .map(|dir| dir.join("potentials"))
            .unwrap_or_else(|| PathBuf::from("data"));
        Self::with_data_root(root)
    }
}

impl PotentialsConfig {
    /// Create a configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration whose caches live in `{root}/bibtex` and `{root}/potential`
    pub fn with_data_root(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            bibtex_dir: root.join("bibtex"),
            potential_dir: root.join("potential"),
            mirror_base_url: DEFAULT_MIRROR_BASE_URL.to_string(),
            resolver_base_url: DEFAULT_RESOLVER_BASE_URL.to_string(),
            user_agent: format!("potentials-rs/{}", env!("CARGO_PKG_VERSION")),
            timeout_secs: None,
            verbose: true,
        }
    }

    /// Request timeout, if one is configured
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Load configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Serialize configuration to TOML
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load configuration from a JSON string
    pub fn from_json(json_str: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json_str).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Serialize configuration to JSON
    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load and validate a `.toml` or `.json` configuration file
    pub fn load_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        let config = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json(&content)?,
            _ => Self::from_toml(&content)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("mirror_base_url", &self.mirror_base_url),
            ("resolver_base_url", &self.resolver_base_url),
        ] {
            if value.is_empty() {
                return Err(ConfigError::MissingField(name.to_string()));
            }
            url::Url::parse(value).map_err(|e| ConfigError::InvalidUrl {
                field: name.to_string(),
                message: e.to_string(),
            })?;
        }

        if self.timeout_secs == Some(0) {
            return Err(ConfigError::OutOfRange(
                "timeout_secs must be positive".to_string(),
            ));
        }

        Ok(())
    }
}

/// Configuration loading and validation error
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Missing field: {0}")]
    MissingField(String),
    #[error("Invalid URL in {field}: {message}")]
    InvalidUrl { field: String, message: String },
    #[error("Value out of range: {0}")]
    OutOfRange(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("I/O error: {0}")]
    Io(String),
}
