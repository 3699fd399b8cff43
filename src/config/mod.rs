//! Configuration module for visual-qa
//!
//! Manages where the detection service lives and the defaults the
//! controllers start from. Configuration is stored in the user's config
//! directory (`~/.config/visual-qa/config.toml` on Linux) and every key can
//! be overridden with a `VQA_`-prefixed environment variable, e.g.
//! `VQA_BASE_URL=http://10.0.0.5:8080`.

use crate::controllers::gallery::DEFAULT_LIMIT;
use crate::controllers::upload::DEFAULT_CONFIDENCE;
use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Keys accepted by [`AppConfig::set`]
pub const KEYS: &[&str] = &[
    "base_url",
    "api_prefix",
    "confidence",
    "gallery_limit",
    "timeout_secs",
    "quiet",
];

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_api_prefix() -> String {
    "/api".to_string()
}

const fn default_confidence() -> f64 {
    DEFAULT_CONFIDENCE
}

const fn default_gallery_limit() -> u32 {
    DEFAULT_LIMIT
}

const fn default_timeout_secs() -> u64 {
    30
}

/// Application configuration structure
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AppConfig {
    /// Scheme, host and port of the service
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Path prefix in front of `/images`
    #[serde(default = "default_api_prefix")]
    pub api_prefix: String,

    /// Confidence threshold sent with uploads
    #[serde(default = "default_confidence")]
    pub confidence: f64,

    /// Gallery page size, also the value a reset restores
    #[serde(default = "default_gallery_limit")]
    pub gallery_limit: u32,

    /// Transport timeout per request, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Suppress informational output by default
    #[serde(default)]
    pub quiet: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_prefix: default_api_prefix(),
            confidence: default_confidence(),
            gallery_limit: default_gallery_limit(),
            timeout_secs: default_timeout_secs(),
            quiet: false,
        }
    }
}

impl AppConfig {
    /// Get the path to the config file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the system config directory cannot be determined.
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| {
                ConfigError::Message("Could not determine config directory".to_string())
            })?;

        Ok(config_dir.join("visual-qa").join("config.toml"))
    }

    /// Load configuration from the default location, creating it with
    /// defaults if it doesn't exist
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the config file cannot be read, parsed, or created.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from `path`, creating it with defaults if missing
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the config file cannot be read, parsed, or created.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            Self::default().save_to(path)?;
        }
        Self::build(path, Environment::with_prefix("VQA"))
    }

    fn build(path: &Path, env: Environment) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path).format(FileFormat::Toml))
            .add_source(env.try_parsing(true))
            .build()?;

        settings.try_deserialize()
    }

    /// Save configuration to the default location
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the configuration cannot be written.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to `path`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the config directory cannot be created, the configuration
    /// cannot be serialized to TOML, or the file cannot be written.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| {
                    ConfigError::Message(format!("Failed to create config directory: {e}"))
                })?;
        }

        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Message(format!("Failed to serialize config: {e}")))?;

        fs::write(path, toml_string)
            .map_err(|e| ConfigError::Message(format!("Failed to write config file: {e}")))?;

        Ok(())
    }

    /// Set one key from its string form
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the key is unknown or the value does not parse.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        fn parse<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
            value
                .trim()
                .parse()
                .map_err(|_| ConfigError::Message(format!("Invalid value '{value}' for '{key}'")))
        }

        match key {
            "base_url" => self.base_url = value.trim().to_string(),
            "api_prefix" => self.api_prefix = value.trim().to_string(),
            "confidence" => self.confidence = parse(key, value)?,
            "gallery_limit" => self.gallery_limit = parse(key, value)?,
            "timeout_secs" => self.timeout_secs = parse(key, value)?,
            "quiet" => self.quiet = parse(key, value)?,
            _ => {
                return Err(ConfigError::Message(format!(
                    "Unknown key '{key}'. Valid keys: {}",
                    KEYS.join(", ")
                )));
            }
        }
        Ok(())
    }
}
