use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;
use tokio::io::AsyncWriteExt;

pub mod paths;
pub mod validation;

use paths::{get_config_path, get_log_dir_path};
use validation::validate_config;

/// Configuration structure for the application.
/// Handles loading, saving, and managing application settings.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Domain the statistics tables are fetched from. Should include the
    /// https:// prefix.
    #[serde(default = "default_source_domain")]
    pub source_domain: String,
    /// Competition path segment, e.g. "en/comps/9".
    #[serde(default = "default_competition_path")]
    pub competition_path: String,
    /// Trailing page slug shared by every table URL.
    #[serde(default = "default_competition_slug")]
    pub competition_slug: String,
    /// Minutes gate threshold applied while extracting rows.
    #[serde(default = "default_min_minutes")]
    pub min_minutes: u32,
    /// Delay between consecutive table fetches in milliseconds.
    #[serde(default = "default_politeness_delay_ms")]
    pub politeness_delay_ms: u64,
    /// HTTP timeout in seconds for page requests. Defaults to 30 seconds.
    #[serde(default = "default_http_timeout")]
    pub http_timeout_seconds: u64,
    /// Where the exported statistics CSV is written, unless overridden on
    /// the command line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_path: Option<String>,
    /// Path to the log file. If not specified, logs will be written to a
    /// default location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_file_path: Option<String>,
}

fn default_source_domain() -> String {
    crate::constants::source::DOMAIN.to_string()
}

fn default_competition_path() -> String {
    crate::constants::source::COMPETITION_PATH.to_string()
}

fn default_competition_slug() -> String {
    crate::constants::source::COMPETITION_SLUG.to_string()
}

fn default_min_minutes() -> u32 {
    crate::constants::DEFAULT_MIN_MINUTES
}

fn default_politeness_delay_ms() -> u64 {
    crate::constants::DEFAULT_POLITENESS_DELAY_MS
}

/// Default HTTP timeout in seconds
fn default_http_timeout() -> u64 {
    crate::constants::DEFAULT_HTTP_TIMEOUT_SECONDS
}

impl Default for Config {
    fn default() -> Self {
        Config {
            source_domain: default_source_domain(),
            competition_path: default_competition_path(),
            competition_slug: default_competition_slug(),
            min_minutes: default_min_minutes(),
            politeness_delay_ms: default_politeness_delay_ms(),
            http_timeout_seconds: default_http_timeout(),
            output_path: None,
            log_file_path: None,
        }
    }
}

impl Config {
    /// Loads configuration from the default config file location.
    /// If no config file exists, the built-in defaults are used.
    /// Environment variables can override config file values.
    ///
    /// # Environment Variables
    /// - `FOOTSTATS_SOURCE_DOMAIN` - Override source domain
    /// - `FOOTSTATS_LOG_FILE` - Override log file path
    /// - `FOOTSTATS_HTTP_TIMEOUT` - Override HTTP timeout in seconds
    /// - `FOOTSTATS_MIN_MINUTES` - Override the minutes gate threshold
    ///
    /// # Returns
    /// * `Ok(Config)` - Successfully loaded or defaulted configuration
    /// * `Err(AppError)` - Error occurred during load
    ///
    /// # Notes
    /// - Config file is stored in platform-specific config directory
    /// - Environment variables take precedence over config file
    pub async fn load() -> Result<Self, AppError> {
        let config_path = get_config_path();

        let mut config = if Path::new(&config_path).exists() {
            let content = fs::read_to_string(&config_path).await?;
            toml::from_str(&content)?
        } else {
            Config::default()
        };

        // Override with environment variables if present
        if let Ok(source_domain) = std::env::var("FOOTSTATS_SOURCE_DOMAIN") {
            config.source_domain = source_domain;
        }

        if let Ok(log_file_path) = std::env::var("FOOTSTATS_LOG_FILE") {
            config.log_file_path = Some(log_file_path);
        }

        if let Some(timeout) = std::env::var("FOOTSTATS_HTTP_TIMEOUT")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
        {
            config.http_timeout_seconds = timeout;
        }

        if let Some(min_minutes) = std::env::var("FOOTSTATS_MIN_MINUTES")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
        {
            config.min_minutes = min_minutes;
        }

        config.validate()?;

        Ok(config)
    }

    /// Validates the configuration settings
    ///
    /// # Returns
    /// * `Ok(())` - Configuration is valid
    /// * `Err(AppError)` - Configuration validation failed
    pub fn validate(&self) -> Result<(), AppError> {
        validate_config(&self.source_domain, &self.log_file_path)
    }

    /// Saves current configuration to the default config file location.
    ///
    /// # Returns
    /// * `Ok(())` - Successfully saved configuration
    /// * `Err(AppError)` - Error occurred during save
    ///
    /// # Notes
    /// - Creates config directory if it doesn't exist
    /// - Ensures source_domain has https:// prefix
    /// - Uses TOML format for storage
    pub async fn save(&self) -> Result<(), AppError> {
        let config_path = get_config_path();
        self.save_to_path(&config_path).await
    }

    /// Returns the platform-specific path for the config file.
    pub fn get_config_path() -> String {
        paths::get_config_path()
    }

    /// Returns the platform-specific path for the log directory.
    pub fn get_log_dir_path() -> String {
        paths::get_log_dir_path()
    }

    /// Displays current configuration settings to stdout.
    ///
    /// # Returns
    /// * `Ok(())` - Successfully displayed configuration
    /// * `Err(AppError)` - Error occurred while reading config
    pub async fn display() -> Result<(), AppError> {
        let config_path = get_config_path();
        let log_dir = get_log_dir_path();

        if Path::new(&config_path).exists() {
            let config = Config::load().await?;
            println!("\nCurrent Configuration");
            println!("────────────────────────────────────");
            println!("Config Location:");
            println!("{config_path}");
            println!("────────────────────────────────────");
            println!("Source Domain:");
            println!("{}", config.source_domain);
            println!("────────────────────────────────────");
            println!("Competition:");
            println!("{}/{}", config.competition_path, config.competition_slug);
            println!("────────────────────────────────────");
            println!("Minutes Gate:");
            println!("{} minutes", config.min_minutes);
            println!("────────────────────────────────────");
            println!("Politeness Delay:");
            println!("{} ms", config.politeness_delay_ms);
            println!("────────────────────────────────────");
            println!("HTTP Timeout:");
            println!("{} seconds", config.http_timeout_seconds);
            println!("────────────────────────────────────");
            println!("Log File Location:");
            if let Some(custom_path) = &config.log_file_path {
                println!("{custom_path}");
            } else {
                println!("{log_dir}/footstats.log");
                println!("(Default location)");
            }
        } else {
            println!("\nNo configuration file found at:");
            println!("{config_path}");
            println!("Built-in defaults are in effect.");
        }

        Ok(())
    }

    /// Saves configuration to a custom file path.
    ///
    /// Creates the parent directory if it doesn't exist and ensures the
    /// source domain has the https:// prefix.
    ///
    /// # Arguments
    /// * `path` - The file path where the configuration should be saved
    ///
    /// # Errors
    /// * `AppError::Config` - If the provided path has no parent directory
    /// * `AppError::Io` - If there's an I/O error creating directories or writing the file
    /// * `AppError::TomlSerialize` - If there's an error serializing the configuration
    pub async fn save_to_path(&self, path: &str) -> Result<(), AppError> {
        let config_dir = Path::new(path).parent().ok_or_else(|| {
            AppError::config_error(format!("Path '{path}' has no parent directory"))
        })?;

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).await?;
        }
        let source_domain = if !self.source_domain.starts_with("https://") {
            format!(
                "https://{}",
                self.source_domain.trim_start_matches("http://")
            )
        } else {
            self.source_domain.clone()
        };
        let content = toml::to_string_pretty(&Config {
            source_domain,
            ..self.clone()
        })?;
        let mut file = fs::File::create(path).await?;
        file.write_all(content.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }

    /// Loads configuration from a custom file path (for testing).
    #[allow(dead_code)] // Used in tests
    pub async fn load_from_path(path: &str) -> Result<Self, AppError> {
        let content = fs::read_to_string(path).await?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}
