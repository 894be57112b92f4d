use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::frame::OverflowPolicy;

/// Upper bound used when no `max` is configured.
/// Largest integer an f64 represents exactly, so practically unbounded.
pub const DEFAULT_MAX: f64 = 9_007_199_254_740_991.0;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub ticker: TickerConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Data directory path (log files live here)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
        }
    }
}

/// Fixed parameters of one animation session
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Boundary behavior: "loopBoth", "loopStart", "loopEnd", "overflow" or "contain"
    #[serde(default, alias = "overflowBehavior")]
    pub overflow_behavior: OverflowPolicy,
    /// Initial frame position
    #[serde(default)]
    pub start: f64,
    /// Upper bound of the frame position domain
    #[serde(default = "default_max")]
    pub max: f64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            overflow_behavior: OverflowPolicy::default(),
            start: 0.0,
            max: default_max(),
        }
    }
}

impl SessionConfig {
    pub fn new(overflow_behavior: OverflowPolicy, start: f64, max: f64) -> Self {
        Self {
            overflow_behavior,
            start,
            max,
        }
    }

    /// Check that the domain is usable: `max` finite and positive, `start`
    /// inside `[0, max]`
    pub fn validate(&self) -> crate::Result<()> {
        if !self.max.is_finite() || self.max <= 0.0 {
            return Err(crate::Error::Config(format!(
                "max must be a positive finite number, got {}",
                self.max
            )));
        }
        if !self.start.is_finite() || self.start < 0.0 || self.start > self.max {
            return Err(crate::Error::Config(format!(
                "start must lie in [0, {}], got {}",
                self.max, self.start
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickerConfig {
    /// Interval between smoothing ticks in milliseconds (~60fps by default)
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,
}

impl Default for TickerConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Show the frame position gauge in the terminal preview
    #[serde(default = "default_true")]
    pub show_position: bool,
    /// Accent color as a hex string (e.g., "#d8a657")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accent: Option<String>,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            show_position: default_true(),
            accent: None,
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("wheelframe")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max() -> f64 {
    DEFAULT_MAX
}

fn default_tick_rate() -> u64 {
    16
}

fn default_true() -> bool {
    true
}

/// Expand tilde (~) in path to user's home directory
fn expand_tilde(path: &Path) -> PathBuf {
    if let Some(path_str) = path.to_str() {
        if let Some(stripped) = path_str.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(stripped);
            }
        } else if path_str == "~" {
            if let Some(home) = dirs::home_dir() {
                return home;
            }
        }
    }
    path.to_path_buf()
}

impl AppConfig {
    /// Load configuration from the default path or return defaults
    pub fn load() -> crate::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from `path`, falling back to defaults when the file
    /// does not exist
    pub fn load_from(path: &Path) -> crate::Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Self = Self::parse(&content)?;
        tracing::debug!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    /// Parse and validate TOML configuration text
    pub fn parse(content: &str) -> crate::Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| crate::Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> crate::Result<()> {
        self.session.validate()?;
        if self.ticker.tick_rate_ms == 0 {
            return Err(crate::Error::Config(
                "ticker.tick_rate_ms must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Save configuration to the default path
    pub fn save(&self) -> crate::Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> crate::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content =
            toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))?;
        std::fs::write(path, content)?;

        Ok(())
    }

    /// Get the configuration file path
    /// Always uses ~/.config/wheelframe/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("wheelframe")
            .join("config.toml")
    }

    /// Get the data directory (with tilde expansion)
    pub fn data_dir(&self) -> PathBuf {
        expand_tilde(&self.general.data_dir)
    }

    /// Get the log file used by the terminal preview
    pub fn log_path(&self) -> PathBuf {
        self.data_dir().join("wheelframe.log")
    }
}
