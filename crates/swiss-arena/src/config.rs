//! Configuration file loading for the arena.
//!
//! This module provides types and functions for loading the arena settings
//! and tournament presets from a TOML file.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use swiss_core::TimeControl;
use swiss_engine::PairingPolicy;
use thiserror::Error;

/// Errors that can occur when loading or querying configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse the configuration file as valid TOML.
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    /// Requested preset was not found in the configuration.
    #[error("Preset not found: {0}")]
    PresetNotFound(String),
}

/// Reusable tournament settings.
///
/// A preset fills in whatever a script or the prompts leave blank.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct PresetConfig {
    /// Time control. Defaults to blitz.
    #[serde(default = "default_time_control")]
    pub time_control: TimeControl,
    /// Number of rounds. Defaults to 4.
    #[serde(default = "default_rounds")]
    pub rounds: u32,
    /// Expected roster size, if the preset pins one.
    #[serde(default)]
    pub participants: Option<u32>,
    /// Rematch-avoidance strategy. Defaults to the relaxation.
    #[serde(default)]
    pub pairing: PairingPolicy,
}

fn default_time_control() -> TimeControl {
    TimeControl::Blitz
}

fn default_rounds() -> u32 {
    4
}

impl Default for PresetConfig {
    fn default() -> Self {
        Self {
            time_control: default_time_control(),
            rounds: default_rounds(),
            participants: None,
            pairing: PairingPolicy::default(),
        }
    }
}

/// Main arena configuration structure.
///
/// Uses `arena.toml` in the current directory by default.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ArenaConfig {
    /// Path to the SQLite document store.
    #[serde(default = "default_database")]
    pub database: PathBuf,
    /// Directory JSON exports are written to when no path is given.
    #[serde(default = "default_export_dir")]
    pub export_dir: PathBuf,
    /// Save the tournament after every scored round.
    #[serde(default = "default_autosave")]
    pub autosave: bool,
    /// Map of preset names to their settings.
    #[serde(default)]
    pub presets: HashMap<String, PresetConfig>,
}

fn default_database() -> PathBuf {
    PathBuf::from("data/arena.db")
}

fn default_export_dir() -> PathBuf {
    PathBuf::from("data/exports")
}

fn default_autosave() -> bool {
    true
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            database: default_database(),
            export_dir: default_export_dir(),
            autosave: default_autosave(),
            presets: HashMap::new(),
        }
    }
}

impl ArenaConfig {
    /// Loads the arena configuration from disk.
    ///
    /// Returns the defaults when [`Self::config_path()`] does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ReadError`] if the file exists but cannot be read,
    /// or [`ConfigError::ParseError`] if the file contains invalid TOML.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_path();
        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Ok(toml::from_str(&content)?)
        } else {
            Ok(Self::default())
        }
    }

    /// Returns the path to the configuration file.
    pub fn config_path() -> PathBuf {
        PathBuf::from("arena.toml")
    }

    /// Retrieves a preset by name.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::PresetNotFound`] if no preset has that name.
    pub fn get_preset(&self, name: &str) -> Result<&PresetConfig, ConfigError> {
        self.presets
            .get(name)
            .ok_or_else(|| ConfigError::PresetNotFound(name.to_string()))
    }
}
