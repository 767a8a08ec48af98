//! Application configuration from file and environment variables
//!
//! Configuration is loaded with the following priority (highest to lowest):
//! 1. Environment variables (prefixed with STUDYHALL_)
//! 2. Config file (config.toml)
//! 3. Default values
//!
//! Database credentials stay in the DATABASE_URL environment variable and are
//! never read from the config file.

use config::{Config, ConfigError, Environment, File, FileFormat};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::sync::RwLock;

/// Global application configuration
pub static APP_CONFIG: Lazy<RwLock<AppConfig>> = Lazy::new(|| {
    RwLock::new(AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config file, using defaults: {}", e);
        AppConfig::default()
    }))
});

/// Site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub name: String,
    pub base_url: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            name: "Studyhall".to_string(),
            base_url: "http://localhost:8080".to_string(),
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Moderation tunables
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModerationConfig {
    /// Listing page size when the request does not specify one
    pub default_page_size: u64,
    /// Upper bound on requested page sizes
    pub max_page_size: u64,
    /// Learning samples are truncated to this many characters
    pub learning_sample_max_len: usize,
}

impl Default for ModerationConfig {
    fn default() -> Self {
        Self {
            default_page_size: 20,
            max_page_size: 100,
            learning_sample_max_len: 2000,
        }
    }
}

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub site: SiteConfig,
    pub server: ServerConfig,
    pub moderation: ModerationConfig,
}

impl AppConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_path("config.toml")
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &str) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(Config::try_from(&AppConfig::default())?)
            .add_source(File::new(path, FileFormat::Toml).required(false))
            .add_source(
                Environment::with_prefix("STUDYHALL")
                    .separator("_")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

/// Initialize application configuration
///
/// Triggers the lazy load and logs the result. Call early in startup.
pub fn init() {
    let config = APP_CONFIG.read().unwrap();
    log::info!("Configuration loaded: site.name = {}", config.site.name);
}

/// Get the current application configuration
pub fn get_config() -> AppConfig {
    APP_CONFIG.read().map(|c| c.clone()).unwrap_or_default()
}

/// Get server configuration
pub fn server() -> ServerConfig {
    get_config().server
}

/// Get moderation configuration
pub fn moderation() -> ModerationConfig {
    get_config().moderation
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.moderation.default_page_size, 20);
        assert_eq!(config.moderation.max_page_size, 100);
        assert_eq!(config.server.bind, "0.0.0.0:8080");
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let config = AppConfig::load_from_path("/nonexistent/config.toml")
            .expect("Missing file should not be an error");
        assert_eq!(config.moderation.default_page_size, 20);
    }

    #[test]
    fn test_load_from_file_overrides_defaults() {
        let mut file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
        writeln!(
            file,
            "[moderation]\ndefault_page_size = 50\n\n[site]\nname = \"Test Site\""
        )
        .expect("Failed to write temp config");

        let config = AppConfig::load_from_path(file.path().to_str().unwrap())
            .expect("Failed to load config");
        assert_eq!(config.moderation.default_page_size, 50);
        assert_eq!(config.site.name, "Test Site");
        // Untouched sections keep their defaults
        assert_eq!(config.moderation.max_page_size, 100);
    }
}
