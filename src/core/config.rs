//! Run configuration.
//!
//! Applied once when the engine is constructed. Overrides exist for dev and
//! test tooling; nothing here is re-validated after the run starts.

use serde::{Deserialize, Serialize};

use crate::character::player::CharacterClass;
use crate::core::constants::DEFAULT_ROOMS_PER_FLOOR;
use crate::core::error::ConfigError;

/// Optional replacements for the class starting stats.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatOverrides {
    /// Replaces base power
    pub attack: Option<u32>,
    /// Replaces base armor
    pub defense: Option<u32>,
    /// Replaces base max health
    pub health: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub player_name: String,
    pub class: CharacterClass,
    pub overrides: StatOverrides,

    /// Multiplies every XP award (1.0 = unchanged)
    pub xp_multiplier: f64,
    pub starting_gold: u64,
    pub starting_floor: u32,
    pub rooms_per_floor: u32,

    /// Fixed seed for deterministic runs (None = seeded from entropy)
    pub seed: Option<u64>,

    /// Player health never drops below 1
    pub invincible: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            player_name: "Hero".to_string(),
            class: CharacterClass::Warrior,
            overrides: StatOverrides::default(),
            xp_multiplier: 1.0,
            starting_gold: 0,
            starting_floor: 1,
            rooms_per_floor: DEFAULT_ROOMS_PER_FLOOR,
            seed: None,
            invincible: false,
        }
    }
}

impl RunConfig {
    pub fn for_class(class: CharacterClass) -> Self {
        Self {
            class,
            ..Default::default()
        }
    }

    /// Parses a JSON config. Missing fields fall back to defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: RunConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rooms_per_floor == 0 {
            return Err(ConfigError::InvalidRoomsPerFloor);
        }
        Ok(())
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Effective XP multiplier; negative or NaN values count as zero.
    pub fn xp_factor(&self) -> f64 {
        if self.xp_multiplier.is_finite() {
            self.xp_multiplier.max(0.0)
        } else {
            0.0
        }
    }
}
