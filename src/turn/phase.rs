//! Turn phases
//!
//! The phase order is a fixed array; "next" is index arithmetic modulo its
//! length. Wrapping from the last phase back to the first is the end of a
//! player's turn.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One segment of a player's turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Diplomacy,
    Purchase,
    CombatMove,
    CombatResolution,
    NonCombatMove,
    Mobilization,
    CollectIncome,
}

impl Phase {
    /// Phases in play order
    pub const ALL: [Phase; 7] = [
        Phase::Diplomacy,
        Phase::Purchase,
        Phase::CombatMove,
        Phase::CombatResolution,
        Phase::NonCombatMove,
        Phase::Mobilization,
        Phase::CollectIncome,
    ];

    /// Length of one full turn cycle
    pub const COUNT: usize = Self::ALL.len();

    pub fn first() -> Phase {
        Self::ALL[0]
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// The following phase, wrapping to the first
    pub fn next(self) -> Phase {
        Self::ALL[(self.index() + 1) % Self::COUNT]
    }

    /// True when advancing from this phase ends the turn
    pub fn is_last(self) -> bool {
        self.index() == Self::COUNT - 1
    }

    pub fn name(self) -> &'static str {
        match self {
            Phase::Diplomacy => "diplomacy",
            Phase::Purchase => "purchase",
            Phase::CombatMove => "combat-move",
            Phase::CombatResolution => "combat-resolution",
            Phase::NonCombatMove => "non-combat-move",
            Phase::Mobilization => "mobilization",
            Phase::CollectIncome => "collect-income",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
