//! Rules configuration with documented defaults
//!
//! Every tunable rule parameter lives here. The config is loaded once per
//! session (TOML or defaults) and passed explicitly to the components that
//! need it.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::core::error::{ConquestError, Result};
use crate::units::UnitKind;

/// Per-unit-kind override of the hit threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitHitThreshold {
    pub kind: UnitKind,
    pub threshold: u8,
}

/// Configuration for the rules engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    // === DICE ===
    /// Number of faces on a combat die
    pub die_sides: u8,

    /// A roll at or below this value scores a hit
    ///
    /// With a six-sided die the default of 3 gives every die a 50% hit
    /// chance regardless of unit type.
    pub hit_threshold: u8,

    /// Unit kinds that hit on a different value than `hit_threshold`
    pub unit_hit_thresholds: Vec<UnitHitThreshold>,

    // === COMBAT ===
    /// Attacking a territory owned by another player requires being at war
    /// with that player's country
    pub require_war_for_combat: bool,

    // === ECONOMY ===
    /// Wallet each player starts with at setup
    pub starting_wallet: u32,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            die_sides: 6,
            hit_threshold: 3,
            unit_hit_thresholds: Vec::new(),
            require_war_for_combat: true,
            starting_wallet: 100,
        }
    }
}

impl RulesConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a config from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: RulesConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a config from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Hit threshold for a unit kind, falling back to `hit_threshold`
    pub fn threshold_for(&self, kind: UnitKind) -> u8 {
        self.unit_hit_thresholds
            .iter()
            .find(|t| t.kind == kind)
            .map(|t| t.threshold)
            .unwrap_or(self.hit_threshold)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.die_sides < 2 {
            return Err(ConquestError::InvalidConfig(format!(
                "die_sides ({}) must be at least 2",
                self.die_sides
            )));
        }

        if self.hit_threshold == 0 || self.hit_threshold > self.die_sides {
            return Err(ConquestError::InvalidConfig(format!(
                "hit_threshold ({}) must be within 1..={}",
                self.hit_threshold, self.die_sides
            )));
        }

        for entry in &self.unit_hit_thresholds {
            if entry.threshold == 0 || entry.threshold > self.die_sides {
                return Err(ConquestError::InvalidConfig(format!(
                    "{:?} threshold ({}) must be within 1..={}",
                    entry.kind, entry.threshold, self.die_sides
                )));
            }
        }

        Ok(())
    }
}
