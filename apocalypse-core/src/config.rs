//! Game configuration.
//!
//! Loads tuning parameters from `apocalypse.toml` so prices, odds and the
//! length of the day can be adjusted without recompiling. Every section is
//! optional; missing keys fall back to the defaults below.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default configuration file path.
pub const DEFAULT_CONFIG_PATH: &str = "apocalypse.toml";

/// One week; longer countdowns are rejected.
pub const MAX_STARTING_HOURS: u32 = 24 * 7;

/// Errors from loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Top-level configuration structure.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub game: GameSection,
    pub tuning: TuningConfig,
    pub saves: SaveConfig,
}

/// Session setup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSection {
    /// Hours on the clock when the vision ends.
    pub starting_hours: u32,
    /// Name used when the player doesn't give one.
    pub default_name: String,
    /// Fixed RNG seed for reproducible runs.
    pub seed: Option<u64>,
}

impl Default for GameSection {
    fn default() -> Self {
        Self {
            starting_hours: 24,
            default_name: "You".to_string(),
            seed: None,
        }
    }
}

/// Prices and odds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TuningConfig {
    pub steal_chance_with_backpack: f64,
    pub steal_chance_without_backpack: f64,
    pub bunker_rumor_chance: f64,
    pub store_item_cost: i32,
    pub tech_part_cost: i32,
    pub bus_ticket_cost: i32,
    pub bribe_cost: i32,
    pub shift_pay: i32,
    pub pawn_price: i32,
    pub truck_gas_needed: i32,
}

impl Default for TuningConfig {
    fn default() -> Self {
        Self {
            steal_chance_with_backpack: 0.65,
            steal_chance_without_backpack: 0.35,
            bunker_rumor_chance: 0.3,
            store_item_cost: 1,
            tech_part_cost: 1,
            bus_ticket_cost: 1,
            bribe_cost: 2,
            shift_pay: 1,
            pawn_price: 1,
            truck_gas_needed: 30,
        }
    }
}

/// Where saves go.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SaveConfig {
    pub directory: PathBuf,
}

impl Default for SaveConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("saves"),
        }
    }
}

impl GameConfig {
    /// Parse configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.check()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_toml(&content)
    }

    /// Load configuration from `path`, or use defaults if it can't be read.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Self::default();
        }
        Self::load(path).unwrap_or_else(|e| {
            tracing::warn!(path = %path.display(), error = %e, "could not load config, using defaults");
            Self::default()
        })
    }

    fn check(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_STARTING_HOURS).contains(&self.game.starting_hours) {
            return Err(ConfigError::Invalid(format!(
                "game.starting_hours must be between 1 and {MAX_STARTING_HOURS}, got {}",
                self.game.starting_hours
            )));
        }
        for (name, chance) in [
            ("steal_chance_with_backpack", self.tuning.steal_chance_with_backpack),
            ("steal_chance_without_backpack", self.tuning.steal_chance_without_backpack),
            ("bunker_rumor_chance", self.tuning.bunker_rumor_chance),
        ] {
            if !(0.0..=1.0).contains(&chance) {
                return Err(ConfigError::Invalid(format!(
                    "tuning.{name} must be between 0 and 1, got {chance}"
                )));
            }
        }
        let t = &self.tuning;
        for (name, value) in [
            ("store_item_cost", t.store_item_cost),
            ("tech_part_cost", t.tech_part_cost),
            ("bus_ticket_cost", t.bus_ticket_cost),
            ("bribe_cost", t.bribe_cost),
            ("shift_pay", t.shift_pay),
            ("pawn_price", t.pawn_price),
            ("truck_gas_needed", t.truck_gas_needed),
        ] {
            if value < 0 {
                return Err(ConfigError::Invalid(format!(
                    "tuning.{name} can't be negative, got {value}"
                )));
            }
        }
        Ok(())
    }

    /// Set the number of hours on the clock.
    pub fn with_starting_hours(mut self, hours: u32) -> Self {
        self.game.starting_hours = hours;
        self
    }

    /// Set the fallback protagonist name.
    pub fn with_default_name(mut self, name: impl Into<String>) -> Self {
        self.game.default_name = name.into();
        self
    }

    /// Fix the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.game.seed = Some(seed);
        self
    }

    /// Set the save directory.
    pub fn with_save_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.saves.directory = dir.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.game.starting_hours, 24);
        assert_eq!(config.game.default_name, "You");
        assert_eq!(config.tuning.bribe_cost, 2);
        assert!(config.tuning.steal_chance_with_backpack > config.tuning.steal_chance_without_backpack);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = GameConfig::from_toml(
            r#"
            [game]
            starting_hours = 12
            seed = 7

            [tuning]
            bribe_cost = 3
            "#,
        )
        .unwrap();
        assert_eq!(config.game.starting_hours, 12);
        assert_eq!(config.game.seed, Some(7));
        assert_eq!(config.game.default_name, "You");
        assert_eq!(config.tuning.bribe_cost, 3);
        assert_eq!(config.tuning.bus_ticket_cost, 1);
        assert_eq!(config.saves.directory, PathBuf::from("saves"));
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            GameConfig::from_toml("[game]\nstarting_hours = 0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            GameConfig::from_toml("[tuning]\nbunker_rumor_chance = 1.5"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            GameConfig::from_toml("[game]\nstarting_hours = 80000000"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            GameConfig::from_toml("[tuning]\nbribe_cost = -5"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            GameConfig::from_toml("[tuning]\nshift_pay = -3"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(GameConfig::from_toml("[tuning]\ntruck_gas_needed = 0").is_ok());
        assert!(matches!(
            GameConfig::from_toml("[game\n"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_builder() {
        let config = GameConfig::default()
            .with_starting_hours(6)
            .with_default_name("Riley")
            .with_seed(42)
            .with_save_dir("/tmp/saves");
        assert_eq!(config.game.starting_hours, 6);
        assert_eq!(config.game.default_name, "Riley");
        assert_eq!(config.game.seed, Some(42));
        assert_eq!(config.saves.directory, PathBuf::from("/tmp/saves"));
    }

    #[test]
    fn test_missing_file_falls_back() {
        let config = GameConfig::load_or_default("/nonexistent/apocalypse.toml");
        assert_eq!(config, GameConfig::default());
    }
}
