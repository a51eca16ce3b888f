//! Configuration loading and validation.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::models::Format;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Settings of a single tournament.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TournamentConfig {
    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default = "default_format")]
    pub format: Format,

    /// Number of rounds; derived from the field size at start when absent
    #[serde(default)]
    pub rounds: Option<u32>,

    /// Games per match (best-of-N)
    #[serde(default = "default_best_of")]
    pub best_of: u32,

    /// Seed for shuffled pairings; drawn at random when absent
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_name() -> String {
    "Tournament".to_string()
}

fn default_format() -> Format {
    Format::Swiss
}

fn default_best_of() -> u32 {
    1
}

impl Default for TournamentConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            format: default_format(),
            rounds: None,
            best_of: default_best_of(),
            seed: None,
        }
    }
}

impl TournamentConfig {
    pub fn new(name: &str, format: Format) -> Self {
        Self {
            name: name.to_string(),
            format,
            ..Default::default()
        }
    }

    /// Builder method to set the round count.
    pub fn with_rounds(mut self, rounds: u32) -> Self {
        self.rounds = Some(rounds);
        self
    }

    /// Builder method to set best-of-N.
    pub fn with_best_of(mut self, best_of: u32) -> Self {
        self.best_of = best_of;
        self
    }

    /// Builder method to set the pairing seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "Tournament name must not be empty".to_string(),
            ));
        }

        if self.rounds == Some(0) {
            return Err(ConfigError::ValidationError(
                "Round count must be greater than 0".to_string(),
            ));
        }

        if self.best_of == 0 || self.best_of % 2 == 0 {
            return Err(ConfigError::ValidationError(format!(
                "best_of must be an odd number, got {}",
                self.best_of
            )));
        }

        Ok(())
    }
}

/// A player listed in the config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerEntry {
    pub name: String,

    /// Opaque deck reference
    #[serde(default)]
    pub deck: Option<String>,
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub tournament: TournamentConfig,

    #[serde(default)]
    pub players: Vec<PlayerEntry>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            tournament: TournamentConfig::default(),
            players: Vec::new(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.tournament.validate()?;

        if let Some(index) = self.players.iter().position(|p| p.name.trim().is_empty()) {
            return Err(ConfigError::ValidationError(format!(
                "Player #{} has an empty name",
                index + 1
            )));
        }

        Ok(())
    }

    /// Log filter to use when `RUST_LOG` is unset: an explicit flag wins
    /// over the file's `log_level`, and `info` is the fallback.
    pub fn resolve_log_level(flag: Option<&str>, file: Option<&AppConfig>) -> String {
        flag.map(str::to_string)
            .or_else(|| file.map(|c| c.log_level.clone()))
            .unwrap_or_else(default_log_level)
    }
}
