//! Configuration management
//!
//! This module handles loading and saving the s3b configuration file.
//! The configuration file is stored in TOML format at ~/.config/s3b/config.toml,
//! or under `$S3B_CONFIG_DIR` when set. A missing file means defaults.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::lister::{ListingPolicy, DEFAULT_PAGE_SIZE};

/// Current configuration schema version
pub const SCHEMA_VERSION: u32 = 1;

/// Environment variable overriding the configuration directory
pub const CONFIG_DIR_ENV: &str = "S3B_CONFIG_DIR";

/// Default color setting
const DEFAULT_COLOR: &str = "auto";

/// Entries shown in the automatic listing after cd/mkdir/rm
const DEFAULT_LISTING_LIMIT: usize = 20;

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Schema version for migration support
    pub schema_version: u32,

    /// Default settings
    #[serde(default)]
    pub defaults: Defaults,

    /// How to reach the store
    #[serde(default)]
    pub connection: Connection,
}

/// Default settings for browser behavior
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Defaults {
    /// Entries shown after cd/mkdir/rm before truncating
    #[serde(default = "default_listing_limit")]
    pub listing_limit: usize,

    /// Color mode: "auto", "always", or "never"
    #[serde(default = "default_color")]
    pub color: String,

    /// Show progress spinners for transfers
    #[serde(default = "default_true")]
    pub progress: bool,

    /// Keys requested per list call
    #[serde(default = "default_page_size")]
    pub page_size: i32,

    /// List zero-length objects that are not directory markers
    #[serde(default)]
    pub show_empty_objects: bool,
}

/// Connection settings; each can be overridden on the command line
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    /// Named credentials profile
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,

    /// Custom endpoint URL for S3-compatible services
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// Region override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    /// Use path-style bucket addressing
    #[serde(default)]
    pub path_style: bool,
}

fn default_listing_limit() -> usize {
    DEFAULT_LISTING_LIMIT
}

fn default_color() -> String {
    DEFAULT_COLOR.to_string()
}

fn default_true() -> bool {
    true
}

fn default_page_size() -> i32 {
    DEFAULT_PAGE_SIZE
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            listing_limit: default_listing_limit(),
            color: default_color(),
            progress: true,
            page_size: default_page_size(),
            show_empty_objects: false,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            defaults: Defaults::default(),
            connection: Connection::default(),
        }
    }
}

impl Config {
    /// Listing filter derived from the defaults section
    pub fn listing_policy(&self) -> ListingPolicy {
        ListingPolicy {
            show_empty_objects: self.defaults.show_empty_objects,
            page_size: self.defaults.page_size.clamp(1, DEFAULT_PAGE_SIZE),
        }
    }

    /// Check values that serde cannot
    pub fn validate(&self) -> Result<()> {
        if let Some(endpoint) = &self.connection.endpoint {
            url::Url::parse(endpoint)?;
        }
        if !matches!(self.defaults.color.as_str(), "auto" | "always" | "never") {
            return Err(Error::Config(format!(
                "color must be auto, always or never, got '{}'",
                self.defaults.color
            )));
        }
        Ok(())
    }
}

/// Configuration manager handles loading and saving config
#[derive(Debug)]
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Create a new ConfigManager with the default config path
    pub fn new() -> Result<Self> {
        let config_dir = match std::env::var_os(CONFIG_DIR_ENV) {
            Some(dir) => PathBuf::from(dir),
            None => dirs::config_dir()
                .ok_or_else(|| Error::Config("Could not determine config directory".into()))?
                .join("s3b"),
        };
        Ok(Self {
            config_path: config_dir.join("config.toml"),
        })
    }

    /// Create a ConfigManager with a custom path (useful for testing)
    pub fn with_path(path: PathBuf) -> Self {
        Self { config_path: path }
    }

    /// Get the configuration file path
    pub fn config_path(&self) -> &PathBuf {
        &self.config_path
    }

    /// Load configuration from disk
    ///
    /// If the configuration file doesn't exist, returns a default configuration.
    pub fn load(&self) -> Result<Config> {
        if !self.config_path.exists() {
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(&self.config_path)?;
        let config: Config = toml::from_str(&content)?;

        if config.schema_version > SCHEMA_VERSION {
            return Err(Error::Config(format!(
                "Configuration file version {} is newer than supported version {}. Please upgrade s3b.",
                config.schema_version, SCHEMA_VERSION
            )));
        }

        config.validate()?;
        Ok(config)
    }
}
