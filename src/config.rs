//! Runtime configuration.
//!
//! Values come from an optional TOML file and are then overridden by
//! command line flags.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::Deserialize;
use thiserror::Error;

use crate::quiz::DEFAULT_TIME_LIMIT_SECS;

pub const DEFAULT_API_URL: &str = "https://opentdb.com/api.php";
pub const DEFAULT_AMOUNT: usize = 15;
/// Largest batch the trivia API serves in one call.
pub const MAX_AMOUNT: usize = 50;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Values given on the command line.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub amount: Option<usize>,
    pub time_limit_secs: Option<u32>,
    pub api_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QuizConfig {
    /// Trivia endpoint queried with `?amount=N`.
    pub api_url: String,
    /// Questions per session.
    pub amount: usize,
    /// Seconds on the countdown.
    pub time_limit_secs: u32,
    pub request_timeout_secs: u64,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            amount: DEFAULT_AMOUNT,
            time_limit_secs: DEFAULT_TIME_LIMIT_SECS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl QuizConfig {
    /// Load from `path`, or from the per-user config file when it exists,
    /// or fall back to defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => match default_config_path().filter(|p| p.is_file()) {
                Some(path) => Self::from_file(&path),
                None => Ok(Self::default()),
            },
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config: Self = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(config)
    }

    /// Apply command line values on top of the file. Validation happens
    /// afterwards so a flag can correct a bad file value.
    pub fn apply(&mut self, overrides: ConfigOverrides) {
        if let Some(amount) = overrides.amount {
            self.amount = amount;
        }
        if let Some(time_limit_secs) = overrides.time_limit_secs {
            self.time_limit_secs = time_limit_secs;
        }
        if let Some(api_url) = overrides.api_url {
            self.api_url = api_url;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.amount == 0 || self.amount > MAX_AMOUNT {
            return Err(ConfigError::Invalid(format!(
                "amount must be between 1 and {MAX_AMOUNT}, got {}",
                self.amount
            )));
        }
        if self.time_limit_secs == 0 {
            return Err(ConfigError::Invalid(
                "time limit must be at least one second".to_string(),
            ));
        }
        if self.api_url.trim().is_empty() {
            return Err(ConfigError::Invalid("api_url must not be empty".to_string()));
        }
        Ok(())
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "trivia-quiz").map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}
