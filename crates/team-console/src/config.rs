//! Dashboard configuration, read from TOML.
//!
//! ```toml
//! [api]
//! base_url = "https://team.example.com/api"
//! timeout_secs = 15
//!
//! [tree]
//! max_depth = 5
//! expanded_depth = 2
//!
//! [logging]
//! level = "info"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use team_views::TreeOptions;

/// Environment variable that overrides `api.token`.
pub const TOKEN_ENV: &str = "TEAM_API_TOKEN";

const APP_DIR: &str = "team-dashboard";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub token: Option<String>,
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000/api".to_string(),
            token: None,
            timeout_secs: 15,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    pub max_depth: usize,
    pub expanded_depth: usize,
}

impl Default for TreeConfig {
    fn default() -> Self {
        let options = TreeOptions::default();
        Self { max_depth: options.max_depth, expanded_depth: options.expanded_depth }
    }
}

impl TreeConfig {
    pub fn options(&self) -> TreeOptions {
        TreeOptions { max_depth: self.max_depth, expanded_depth: self.expanded_depth }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter used when `RUST_LOG` is unset.
    pub level: String,
    /// Log file for the interactive console.
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), file: None }
    }
}

impl LoggingConfig {
    /// Where the console writes its log: the configured file, else the
    /// platform cache directory, else the temp directory.
    pub fn console_log_path(&self) -> PathBuf {
        self.file.clone().unwrap_or_else(|| {
            dirs::cache_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join(APP_DIR)
                .join("console.log")
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub api: ApiConfig,
    pub tree: TreeConfig,
    pub logging: LoggingConfig,
}

impl DashboardConfig {
    /// `<config dir>/team-dashboard/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.toml"))
    }

    /// Load from an explicit path, which must exist, or from the default
    /// path, which may be missing.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load_from(path, true),
            None => match Self::default_path() {
                Some(path) => Self::load_from(&path, false),
                None => Ok(Self::default()),
            },
        }
    }

    /// Load from `path`. A missing file is an error only when `required`.
    pub fn load_from(path: &Path, required: bool) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(text) => {
                let config = Self::from_toml_str(&text)?;
                tracing::debug!(path = %path.display(), "Loaded config");
                Ok(config)
            }
            Err(e) if !required && e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file, using defaults");
                Ok(Self::default())
            }
            Err(source) => Err(ConfigError::Read { path: path.to_path_buf(), source }),
        }
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.api.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("api.base_url must not be empty".into()));
        }
        if self.api.timeout_secs == 0 {
            return Err(ConfigError::Invalid("api.timeout_secs must be positive".into()));
        }
        Ok(())
    }

    /// Apply environment overrides from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    pub fn apply_env_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(token) = lookup(TOKEN_ENV).filter(|t| !t.is_empty()) {
            self.api.token = Some(token);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_view_defaults() {
        let config = DashboardConfig::default();
        assert_eq!(config.tree.options(), TreeOptions::default());
        assert_eq!(config.api.timeout(), Duration::from_secs(15));
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config = DashboardConfig::from_toml_str("[tree]\nmax_depth = 3\n").unwrap();
        assert_eq!(config.tree.max_depth, 3);
        assert_eq!(config.tree.expanded_depth, 2);
        assert_eq!(config.api, ApiConfig::default());
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let err = DashboardConfig::from_toml_str("[api]\ntimeout_secs = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn env_token_overrides_file() {
        let mut config = DashboardConfig::from_toml_str("[api]\ntoken = \"from-file\"\n").unwrap();
        config.apply_env_from(|key| (key == TOKEN_ENV).then(|| "from-env".to_string()));
        assert_eq!(config.api.token.as_deref(), Some("from-env"));

        config.apply_env_from(|_| Some(String::new()));
        assert_eq!(config.api.token.as_deref(), Some("from-env"), "empty values are ignored");
    }
}
