//! Configuration file support.
//!
//! Preferences (log level, clipping ceiling, default zoom, search mode) and
//! the category list are stored as JSON in the user's config directory.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_CHUNK_ROWS, DEFAULT_IMPEDANCE_CEILING, DEFAULT_UNDO_HISTORY, DEFAULT_WINDOW_MINUTES,
    MAX_WINDOW_MINUTES, MIN_WINDOW_MINUTES,
};
use crate::format::ImportOptions;
use crate::model::{Category, CategoryRegistry, default_categories};
use crate::search::SearchMode;

/// Log level setting for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Show only errors
    Error,
    /// Show errors and warnings
    Warn,
    /// Show errors, warnings, and info messages
    #[default]
    Info,
    /// Show debug-level logging
    Debug,
    /// Show all log messages including trace
    Trace,
}

impl LogLevel {
    /// Convert to log crate's LevelFilter.
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Current configuration file format version.
/// Increment this when making breaking changes to the config format.
pub const CONFIG_VERSION: u32 = 1;

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Version of the configuration file format
    pub version: u32,

    /// Application name (for identification)
    #[serde(default = "default_app_name")]
    pub app_name: String,

    /// User preferences
    #[serde(default)]
    pub preferences: UserPreferences,

    /// Category definitions, in button order
    #[serde(default = "default_category_configs")]
    pub categories: Vec<CategoryConfig>,
}

fn default_app_name() -> String {
    "Time Series Scribe".to_string()
}

fn default_category_configs() -> Vec<CategoryConfig> {
    default_categories().iter().map(CategoryConfig::from).collect()
}

/// User preferences section of the config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPreferences {
    /// Log verbosity level
    #[serde(default)]
    pub log_level: LogLevel,

    /// Impedance values above this are clipped at import
    #[serde(default = "default_impedance_ceiling")]
    pub impedance_ceiling: f64,

    /// Window width after a load, in minutes
    #[serde(default = "default_window_minutes")]
    pub default_window_minutes: f64,

    /// Impedance rows per chunk when reading raw exports
    #[serde(default = "default_chunk_rows")]
    pub chunk_rows: usize,

    /// Index range lookup used for redraws
    #[serde(default)]
    pub search_mode: SearchMode,

    /// Undoable label edits kept in history
    #[serde(default = "default_undo_history")]
    pub undo_history: usize,

    /// Pretty-print native session files
    #[serde(default)]
    pub pretty_json: bool,
}

fn default_impedance_ceiling() -> f64 {
    DEFAULT_IMPEDANCE_CEILING
}

fn default_window_minutes() -> f64 {
    DEFAULT_WINDOW_MINUTES
}

fn default_chunk_rows() -> usize {
    DEFAULT_CHUNK_ROWS
}

fn default_undo_history() -> usize {
    DEFAULT_UNDO_HISTORY
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            log_level: LogLevel::default(),
            impedance_ceiling: default_impedance_ceiling(),
            default_window_minutes: default_window_minutes(),
            chunk_rows: default_chunk_rows(),
            search_mode: SearchMode::default(),
            undo_history: default_undo_history(),
            pretty_json: false,
        }
    }
}

impl UserPreferences {
    /// Replace out-of-range values with usable ones.
    pub fn sanitized(mut self) -> Self {
        if !self.impedance_ceiling.is_finite() || self.impedance_ceiling <= 0.0 {
            log::warn!(
                "Ignoring impedance ceiling {}, using {}",
                self.impedance_ceiling,
                DEFAULT_IMPEDANCE_CEILING
            );
            self.impedance_ceiling = DEFAULT_IMPEDANCE_CEILING;
        }
        if self.default_window_minutes.is_finite() {
            self.default_window_minutes = self
                .default_window_minutes
                .clamp(MIN_WINDOW_MINUTES, MAX_WINDOW_MINUTES);
        } else {
            self.default_window_minutes = DEFAULT_WINDOW_MINUTES;
        }
        self.chunk_rows = self.chunk_rows.max(1);
        self.undo_history = self.undo_history.max(1);
        self
    }

    /// Import options matching these preferences.
    pub fn import_options(&self) -> ImportOptions {
        ImportOptions::new()
            .impedance_ceiling(self.impedance_ceiling)
            .chunk_rows(self.chunk_rows)
    }
}

/// Category configuration for serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryConfig {
    /// Unique identifier for the category
    pub id: u32,
    /// Display name of the category
    pub name: String,
    /// Color as `#rrggbb`
    pub color: String,
}

impl From<&Category> for CategoryConfig {
    fn from(cat: &Category) -> Self {
        Self {
            id: cat.id,
            name: cat.name.clone(),
            color: crate::color_utils::to_hex(cat.color),
        }
    }
}

impl CategoryConfig {
    /// Convert to a category, or None when the color is not valid hex.
    pub fn to_category(&self) -> Option<Category> {
        let color = crate::color_utils::parse_hex(&self.color)?;
        Some(Category::new(self.id, &self.name, color))
    }
}

impl AppConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self {
            version: CONFIG_VERSION,
            app_name: default_app_name(),
            preferences: UserPreferences::default(),
            categories: default_category_configs(),
        }
    }

    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_json::from_str(json)?;

        // Validate version compatibility
        if config.version > CONFIG_VERSION {
            return Err(ConfigError::VersionTooNew {
                file_version: config.version,
                supported_version: CONFIG_VERSION,
            });
        }

        config.preferences = config.preferences.sanitized();
        Ok(config)
    }

    /// Category registry seeded from the configured categories.
    ///
    /// Entries with an invalid color or a repeated name are skipped.
    pub fn category_registry(&self) -> CategoryRegistry {
        let mut registry = CategoryRegistry::empty();
        for entry in &self.categories {
            match entry.to_category() {
                Some(category) if registry.get(&category.name).is_none() => {
                    registry.adopt(&category.name, category.color);
                }
                Some(category) => {
                    log::warn!("Duplicate category '{}' in config", category.name);
                }
                None => {
                    log::warn!(
                        "Category '{}' has invalid color '{}'",
                        entry.name,
                        entry.color
                    );
                }
            }
        }
        registry
    }

    /// Read configuration from a file.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Write configuration to a file, creating parent directories.
    pub fn save_to_path(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_json()?)?;
        log::info!("Saved configuration to {:?}", path);
        Ok(())
    }

    /// Get the default filename for the config file.
    pub fn default_filename() -> &'static str {
        "ts-scribe-config.json"
    }

    /// Get the default config file path.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn default_path() -> Option<std::path::PathBuf> {
        // Try to use XDG config directory, fall back to home directory
        if let Some(config_dir) = dirs::config_dir() {
            Some(config_dir.join("ts-scribe").join(Self::default_filename()))
        } else {
            dirs::home_dir().map(|home_dir| {
                home_dir
                    .join(".config")
                    .join("ts-scribe")
                    .join(Self::default_filename())
            })
        }
    }

    /// Try to load configuration from the default path.
    /// Returns None if the file doesn't exist or can't be read.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_default_path() -> Option<Self> {
        let path = Self::default_path()?;
        if !path.exists() {
            log::debug!("No config file found at {:?}", path);
            return None;
        }

        match Self::load_from_path(&path) {
            Ok(config) => {
                log::info!("Loaded configuration from {:?}", path);
                Some(config)
            }
            Err(e) => {
                log::warn!("Failed to load config file {:?}: {}", path, e);
                None
            }
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// JSON parsing error
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Configuration version is newer than supported
    #[error(
        "Configuration file version {file_version} is newer than supported version {supported_version}"
    )]
    VersionTooNew {
        file_version: u32,
        supported_version: u32,
    },

    /// I/O error when reading/writing config
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}
