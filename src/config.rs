//! Settings file for the editor.
//!
//! A versioned JSON document holding the log verbosity, the zoom step, the
//! fallback viewport size and the key map. Missing sections take defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_VIEWPORT_SIZE, DEFAULT_ZOOM_STEP};
use crate::keybindings::KeyBindings;

/// Verbosity handed to the logger at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    /// Includes per-frame layout timing
    Trace,
}

impl LogLevel {
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

/// Settings format understood by this build. Files with a higher version
/// are rejected.
pub const CONFIG_VERSION: u32 = 1;

const CONFIG_DIR: &str = "rackelev";

/// Editor settings as stored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub version: u32,

    /// Written into every saved file; not interpreted on load
    #[serde(default = "default_app_name")]
    pub app_name: String,

    #[serde(default)]
    pub preferences: UserPreferences,

    #[serde(default)]
    pub keybindings: KeyBindings,
}

fn default_app_name() -> String {
    "Rackelev".to_string()
}

/// Container size used when no real surface reports one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportSize {
    pub width: f32,
    pub height: f32,
}

impl Default for ViewportSize {
    fn default() -> Self {
        let (width, height) = DEFAULT_VIEWPORT_SIZE;
        Self { width, height }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPreferences {
    #[serde(default)]
    pub log_level: LogLevel,

    /// Scale delta applied per zoom key press
    #[serde(default = "default_zoom_step")]
    pub zoom_step: f32,

    #[serde(default)]
    pub viewport: ViewportSize,
}

fn default_zoom_step() -> f32 {
    DEFAULT_ZOOM_STEP
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            log_level: LogLevel::default(),
            zoom_step: default_zoom_step(),
            viewport: ViewportSize::default(),
        }
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self {
            version: CONFIG_VERSION,
            app_name: default_app_name(),
            preferences: UserPreferences::default(),
            keybindings: KeyBindings::default(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parse settings, refusing files written by a newer format version.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        if config.version > CONFIG_VERSION {
            return Err(ConfigError::VersionTooNew {
                file_version: config.version,
                supported_version: CONFIG_VERSION,
            });
        }
        Ok(config)
    }

    pub fn default_filename() -> &'static str {
        "rackelev-config.json"
    }

    /// `<config dir>/rackelev/rackelev-config.json`, with `~/.config` standing
    /// in when the platform reports no config directory.
    pub fn default_path() -> Option<PathBuf> {
        let base = dirs::config_dir().or_else(|| dirs::home_dir().map(|home| home.join(".config")))?;
        Some(base.join(CONFIG_DIR).join(Self::default_filename()))
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Write to `path`, creating missing parent directories.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Settings from [`AppConfig::default_path`]. A missing or unreadable
    /// file yields `None`; the reason is logged.
    pub fn load_from_default_path() -> Option<Self> {
        let path = Self::default_path()?;
        if !path.exists() {
            log::debug!("No settings at {}", path.display());
            return None;
        }

        Self::load(&path)
            .inspect(|_| log::info!("Settings read from {}", path.display()))
            .inspect_err(|e| log::warn!("Ignoring settings in {}: {}", path.display(), e))
            .ok()
    }

    pub fn save_to_default_path(&self) -> Result<(), ConfigError> {
        let path = Self::default_path().ok_or_else(|| {
            ConfigError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "no config or home directory",
            ))
        })?;
        self.save(&path)?;
        log::info!("Settings written to {}", path.display());
        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error(
        "Configuration file version {file_version} is newer than supported version {supported_version}"
    )]
    VersionTooNew {
        file_version: u32,
        supported_version: u32,
    },

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}
