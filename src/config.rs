//! Configuration management for autoagile
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::error::{AutoAgileError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use url::Url;

/// Main configuration structure for autoagile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Story service connection settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Upload pre-checks
    #[serde(default)]
    pub upload: UploadConfig,
    /// Review screen behavior
    #[serde(default)]
    pub review: ReviewConfig,
}

/// Story service connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Base URL the `/api/...` endpoints are resolved against
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    ///
    /// `None` keeps the HTTP client's default (no explicit timeout).
    /// Story generation runs a multi-stage model pipeline server-side and
    /// routinely takes minutes.
    #[serde(default)]
    pub timeout_seconds: Option<u64>,

    /// User agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_user_agent() -> String {
    format!("autoagile/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: None,
            user_agent: default_user_agent(),
        }
    }
}

/// Upload pre-check configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// File extensions accepted by the generation endpoint
    ///
    /// An empty list disables the client-side check.
    #[serde(default = "default_allowed_extensions")]
    pub allowed_extensions: Vec<String>,
}

fn default_allowed_extensions() -> Vec<String> {
    ["docx", "doc", "txt", "md"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            allowed_extensions: default_allowed_extensions(),
        }
    }
}

impl UploadConfig {
    /// Whether `path` has an accepted extension (case-insensitive)
    pub fn accepts(&self, path: &Path) -> bool {
        if self.allowed_extensions.is_empty() {
            return true;
        }
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                self.allowed_extensions
                    .iter()
                    .any(|allowed| allowed.eq_ignore_ascii_case(ext))
            })
            .unwrap_or(false)
    }
}

/// Review screen configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewConfig {
    /// Ask before integrating every story at once
    #[serde(default = "default_true")]
    pub confirm_bulk_integration: bool,

    /// Send full story bodies alongside ids on integration
    #[serde(default = "default_true")]
    pub send_full_records: bool,
}

fn default_true() -> bool {
    true
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            confirm_bulk_integration: true,
            send_full_records: true,
        }
    }
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// # Arguments
    ///
    /// * `path` - Path to configuration file
    /// * `cli` - CLI arguments for overrides
    ///
    /// # Returns
    ///
    /// Returns the loaded and merged configuration
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::debug!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| AutoAgileError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| AutoAgileError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(base_url) = std::env::var("AUTOAGILE_SERVER_URL") {
            self.server.base_url = base_url;
        }

        if let Ok(timeout) = std::env::var("AUTOAGILE_TIMEOUT_SECONDS") {
            if let Ok(value) = timeout.parse() {
                self.server.timeout_seconds = Some(value);
            } else {
                tracing::warn!("Invalid AUTOAGILE_TIMEOUT_SECONDS: {}", timeout);
            }
        }

        if let Ok(send_full) = std::env::var("AUTOAGILE_SEND_FULL_RECORDS") {
            match parse_flag(&send_full) {
                Some(value) => self.review.send_full_records = value,
                None => tracing::warn!("Invalid AUTOAGILE_SEND_FULL_RECORDS: {}", send_full),
            }
        }

        if let Ok(confirm) = std::env::var("AUTOAGILE_CONFIRM_BULK") {
            match parse_flag(&confirm) {
                Some(value) => self.review.confirm_bulk_integration = value,
                None => tracing::warn!("Invalid AUTOAGILE_CONFIRM_BULK: {}", confirm),
            }
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if let Some(server) = &cli.server {
            tracing::debug!("Using server override from CLI: {}", server);
            self.server.base_url = server.clone();
        }
    }

    /// Parsed base URL
    ///
    /// # Errors
    ///
    /// Returns error if the configured base URL is not a valid URL
    pub fn base_url(&self) -> Result<Url> {
        Url::parse(&self.server.base_url).map_err(|e| {
            AutoAgileError::Config(format!(
                "Invalid server.base_url '{}': {}",
                self.server.base_url, e
            ))
            .into()
        })
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns error if any validation check fails
    pub fn validate(&self) -> Result<()> {
        if self.server.base_url.trim().is_empty() {
            return Err(
                AutoAgileError::Config("server.base_url cannot be empty".to_string()).into(),
            );
        }

        let url = self.base_url()?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(AutoAgileError::Config(format!(
                "server.base_url must use http or https, got: {}",
                url.scheme()
            ))
            .into());
        }

        if self.server.timeout_seconds == Some(0) {
            return Err(AutoAgileError::Config(
                "server.timeout_seconds must be greater than 0".to_string(),
            )
            .into());
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            upload: UploadConfig::default(),
            review: ReviewConfig::default(),
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
