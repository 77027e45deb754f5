//! # Configuration Management Module
//!
//! Loads and writes the TOML configuration consumed by the `zorkcore` binary
//! and the engine.
//!
//! ## Configuration Structure
//!
//! - [`GameConfig`] - world data location, starting scene, weight threshold,
//!   scoring containers
//! - [`LoggingConfig`] - log level and optional log file
//!
//! ## Usage
//!
//! ```rust,no_run
//! use zorkcore::config::Config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.toml").await?;
//!     println!("Starting scene: {}", config.game.starting_scene);
//!
//!     Config::create_default("config.toml").await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration File Format
//!
//! ```toml
//! [game]
//! data_dir = "data"
//! starting_scene = "west_of_house"
//! light_load_threshold = 15
//! scoring_containers = ["trophy_case"]
//!
//! [logging]
//! level = "info"
//! file = "zorkcore.log"
//! ```
//!
//! Every field has a default, so a partial file (or an empty one) is valid.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use tokio::fs;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameConfig {
    /// Root of the `items/` and `scenes/` JSON trees.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default = "default_starting_scene")]
    pub starting_scene: String,
    /// Inventory weight at or below which the player counts as lightly loaded.
    #[serde(default = "default_light_load_threshold")]
    pub light_load_threshold: u32,
    /// Containers that award an item's `treasurePoints` on deposit.
    #[serde(default = "default_scoring_containers")]
    pub scoring_containers: Vec<String>,
}

fn default_data_dir() -> String {
    "data".to_string()
}

fn default_starting_scene() -> String {
    "west_of_house".to_string()
}

fn default_light_load_threshold() -> u32 {
    15
}

fn default_scoring_containers() -> Vec<String> {
    vec!["trophy_case".to_string()]
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            starting_scene: default_starting_scene(),
            light_load_threshold: default_light_load_threshold(),
            scoring_containers: default_scoring_containers(),
        }
    }
}

impl GameConfig {
    pub fn with_threshold(mut self, threshold: u32) -> Self {
        self.light_load_threshold = threshold;
        self
    }

    pub fn with_starting_scene(mut self, scene_id: &str) -> Self {
        self.starting_scene = scene_id.to_string();
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.light_load_threshold == 0 {
            return Err(anyhow!("game.light_load_threshold must be greater than 0"));
        }
        if self.starting_scene.trim().is_empty() {
            return Err(anyhow!("game.starting_scene must not be empty"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub file: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: Some("zorkcore.log".to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub game: GameConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a file
    pub async fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| anyhow!("Failed to read config file {}: {}", path, e))?;

        let config = Self::from_toml(&content)
            .map_err(|e| anyhow!("Failed to parse config file {}: {}", path, e))?;

        Ok(config)
    }

    /// Parse and validate configuration text.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.game.validate()?;
        Ok(config)
    }

    /// Create a default configuration file
    pub async fn create_default(path: &str) -> Result<()> {
        let config = Config::default();
        let content = toml::to_string_pretty(&config)
            .map_err(|e| anyhow!("Failed to serialize default config: {}", e))?;

        fs::write(path, content)
            .await
            .map_err(|e| anyhow!("Failed to write config file {}: {}", path, e))?;

        Ok(())
    }
}
