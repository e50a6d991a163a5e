use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid setting `{setting}` in {config_path}: {reason}")]
    InvalidSetting {
        config_path: PathBuf,
        setting: &'static str,
        reason: String,
    },
}

/// How tabs should be shown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TabModeSetting {
    /// Let the front end decide based on what it can render.
    #[default]
    Auto,
    Native,
    Replace,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub tab_size: usize,
    pub char_width: f32,
    pub pattern: Option<String>,
    pub extra_pattern: Option<String>,
    pub tab_mode: TabModeSetting,
    pub merge_gap: usize,
    /// Where the viewer writes its log, if anywhere.
    pub log_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tab_size: 4,
            char_width: 1.0,
            pattern: None,
            extra_pattern: None,
            tab_mode: TabModeSetting::Auto,
            merge_gap: 10,
            log_path: None,
        }
    }
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let mut config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        config.validate(config_path)?;

        // Expand shell variables and tilde in the log path
        config.log_path = config
            .log_path
            .map(|path| Self::expand_path(&path).unwrap_or(path));

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/special-chars");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    fn validate(&self, config_path: &Path) -> Result<(), ConfigError> {
        let invalid = |setting, reason: &str| ConfigError::InvalidSetting {
            config_path: config_path.to_path_buf(),
            setting,
            reason: reason.to_string(),
        };

        if self.tab_size == 0 {
            return Err(invalid("tab_size", "must be at least 1"));
        }
        if !(self.char_width.is_finite() && self.char_width > 0.0) {
            return Err(invalid("char_width", "must be a positive number"));
        }
        Ok(())
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}
