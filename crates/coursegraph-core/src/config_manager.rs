use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

use crate::DEFAULT_GRADUATION_CREDITS;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(String),

    #[error("Failed to read config: {0}")]
    ReadError(String),

    #[error("Failed to parse config: {0}")]
    ParseError(String),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Main configuration for CourseGraph
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct CourseGraphConfig {
    /// Where the course catalog comes from
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Where completed-course snapshots are kept
    #[serde(default)]
    pub progress: ProgressConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Roadmap layout geometry
    #[serde(default)]
    pub layout: LayoutConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct CatalogConfig {
    /// Catalog document (.json or .toml). None uses the bundled dataset.
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Overrides the graduation threshold declared by the catalog
    #[serde(default)]
    pub graduation_credits: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProgressConfig {
    /// Snapshot file. Defaults to ~/.coursegraph/progress.json
    #[serde(default)]
    pub snapshot_path: Option<PathBuf>,

    /// Write the snapshot back after every mutating command
    #[serde(default = "default_autosave")]
    pub autosave: bool,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            snapshot_path: None,
            autosave: default_autosave(),
        }
    }
}

impl ProgressConfig {
    pub fn resolved_snapshot_path(&self) -> PathBuf {
        self.snapshot_path.clone().unwrap_or_else(|| {
            dirs::home_dir()
                .map(|home| home.join(".coursegraph").join("progress.json"))
                .unwrap_or_else(|| PathBuf::from(".coursegraph-progress.json"))
        })
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Log level: "trace", "debug", "info", "warn", "error"
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: "pretty", "json", "compact"
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

/// Screen-space geometry for the roadmap layout
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LayoutConfig {
    #[serde(default = "default_node_width")]
    pub node_width: f64,

    #[serde(default = "default_node_height")]
    pub node_height: f64,

    /// Horizontal space between rank columns
    #[serde(default = "default_column_gap")]
    pub column_gap: f64,

    /// Vertical space between courses of one rank
    #[serde(default = "default_row_gap")]
    pub row_gap: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_width: default_node_width(),
            node_height: default_node_height(),
            column_gap: default_column_gap(),
            row_gap: default_row_gap(),
        }
    }
}

// Default value functions
fn default_autosave() -> bool {
    true
}
fn default_log_level() -> String {
    "warn".to_string()
}
fn default_log_format() -> String {
    "pretty".to_string()
}
fn default_node_width() -> f64 {
    128.0
}
fn default_node_height() -> f64 {
    96.0
}
fn default_column_gap() -> f64 {
    80.0
}
fn default_row_gap() -> f64 {
    24.0
}

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
const LOG_FORMATS: [&str; 3] = ["pretty", "json", "compact"];

/// Configuration manager with file discovery and environment overrides
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config: CourseGraphConfig,
    config_path: Option<PathBuf>,
}

impl ConfigManager {
    /// Load configuration with the following precedence:
    /// 1. Environment variables (.env file)
    /// 2. Config file (.coursegraph.toml)
    /// 3. Defaults
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_dotenv();

        let (config, config_path) = Self::load_config_file()?;
        Self::finish(config, config_path)
    }

    /// Load an explicit config file, still honouring environment overrides.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }
        Self::load_dotenv();
        let config = Self::read_toml_file(path)?;
        Self::finish(config, Some(path.to_path_buf()))
    }

    fn finish(
        config: CourseGraphConfig,
        config_path: Option<PathBuf>,
    ) -> Result<Self, ConfigError> {
        let config = Self::apply_env_overrides(config);
        Self::validate_config(&config)?;

        match &config_path {
            Some(path) => info!("Configuration loaded from {}", path.display()),
            None => info!("No config file found, using defaults"),
        }

        Ok(Self {
            config,
            config_path,
        })
    }

    fn load_dotenv() {
        if Path::new(".env").exists() {
            if let Err(e) = dotenv::from_filename(".env") {
                warn!("Failed to load .env file: {}", e);
            }
            return;
        }

        if let Some(home) = dirs::home_dir() {
            let home_env = home.join(".coursegraph.env");
            if home_env.exists() {
                if let Err(e) = dotenv::from_path(&home_env) {
                    warn!("Failed to load .coursegraph.env: {}", e);
                }
            }
        }
    }

    /// Search order:
    /// 1. ./.coursegraph.toml
    /// 2. ~/.coursegraph/config.toml
    fn load_config_file() -> Result<(CourseGraphConfig, Option<PathBuf>), ConfigError> {
        let local_config = Path::new(".coursegraph.toml");
        if local_config.exists() {
            let config = Self::read_toml_file(local_config)?;
            return Ok((config, Some(local_config.to_path_buf())));
        }

        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".coursegraph").join("config.toml");
            if user_config.exists() {
                let config = Self::read_toml_file(&user_config)?;
                return Ok((config, Some(user_config)));
            }
        }

        Ok((CourseGraphConfig::default(), None))
    }

    fn read_toml_file(path: &Path) -> Result<CourseGraphConfig, ConfigError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError(e.to_string()))?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    fn apply_env_overrides(mut config: CourseGraphConfig) -> CourseGraphConfig {
        if let Ok(path) = std::env::var("COURSEGRAPH_CATALOG") {
            config.catalog.path = Some(PathBuf::from(path));
        }
        if let Ok(path) = std::env::var("COURSEGRAPH_PROGRESS") {
            config.progress.snapshot_path = Some(PathBuf::from(path));
        }
        if let Ok(autosave) = std::env::var("COURSEGRAPH_AUTOSAVE") {
            match autosave.to_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => config.progress.autosave = true,
                "0" | "false" | "no" | "off" => config.progress.autosave = false,
                other => warn!("Ignoring COURSEGRAPH_AUTOSAVE={}", other),
            }
        }
        if let Ok(level) = std::env::var("COURSEGRAPH_LOG_LEVEL") {
            config.logging.level = level;
        }
        if let Ok(format) = std::env::var("COURSEGRAPH_LOG_FORMAT") {
            config.logging.format = format;
        }

        config
    }

    pub fn validate_config(config: &CourseGraphConfig) -> Result<(), ConfigError> {
        let level = config.logging.level.to_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "Invalid log level '{}'. Must be one of: {}",
                config.logging.level,
                LOG_LEVELS.join(", ")
            )));
        }

        let format = config.logging.format.to_lowercase();
        if !LOG_FORMATS.contains(&format.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "Invalid log format '{}'. Must be one of: {}",
                config.logging.format,
                LOG_FORMATS.join(", ")
            )));
        }

        if config.catalog.graduation_credits == Some(0) {
            return Err(ConfigError::ValidationError(
                "graduation_credits must be greater than 0".to_string(),
            ));
        }

        let layout = &config.layout;
        for (name, value) in [
            ("node_width", layout.node_width),
            ("node_height", layout.node_height),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::ValidationError(format!(
                    "layout.{} must be a positive number, got {}",
                    name, value
                )));
            }
        }
        for (name, value) in [
            ("column_gap", layout.column_gap),
            ("row_gap", layout.row_gap),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::ValidationError(format!(
                    "layout.{} must not be negative, got {}",
                    name, value
                )));
            }
        }

        Ok(())
    }

    pub fn config(&self) -> &CourseGraphConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut CourseGraphConfig {
        &mut self.config
    }

    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// Graduation threshold: config override, else the catalog's own value.
    pub fn graduation_credits(&self, catalog_value: u32) -> u32 {
        self.config
            .catalog
            .graduation_credits
            .unwrap_or(if catalog_value > 0 {
                catalog_value
            } else {
                DEFAULT_GRADUATION_CREDITS
            })
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(&self.config).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        let config = CourseGraphConfig::default();
        assert!(ConfigManager::validate_config(&config).is_ok());
        assert!(config.progress.autosave);
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn rejects_unknown_log_level() {
        let mut config = CourseGraphConfig::default();
        config.logging.level = "loud".to_string();
        assert!(matches!(
            ConfigManager::validate_config(&config),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn rejects_zero_sized_nodes() {
        let mut config = CourseGraphConfig::default();
        config.layout.node_height = 0.0;
        assert!(ConfigManager::validate_config(&config).is_err());
    }

    #[test]
    fn partial_sections_fall_back_to_defaults() {
        let config: CourseGraphConfig = toml::from_str(
            r#"
[layout]
column_gap = 120.0
"#,
        )
        .unwrap();
        assert_eq!(config.layout.column_gap, 120.0);
        assert_eq!(config.layout.node_width, default_node_width());
        assert_eq!(config.logging, LoggingConfig::default());
    }
}
