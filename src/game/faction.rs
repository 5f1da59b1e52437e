//! Playable countries and the camps they belong to

use serde::{Deserialize, Serialize};
use std::fmt;

/// A playable side; declaration order is the turn order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Country {
    Germany,
    Japan,
    UnitedStates,
    UnitedKingdom,
    China,
    Italy,
    Commonwealth,
    France,
    Russia,
}

/// Victory-scoring alliance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Camp {
    Axis,
    Allies,
}

impl Country {
    pub const ALL: [Country; 9] = [
        Country::Germany,
        Country::Japan,
        Country::UnitedStates,
        Country::UnitedKingdom,
        Country::China,
        Country::Italy,
        Country::Commonwealth,
        Country::France,
        Country::Russia,
    ];

    pub fn camp(self) -> Camp {
        match self {
            Country::Germany | Country::Japan | Country::Italy => Camp::Axis,
            _ => Camp::Allies,
        }
    }

    pub fn is_ally_of(self, other: Country) -> bool {
        self.camp() == other.camp()
    }

    pub fn name(self) -> &'static str {
        match self {
            Country::Germany => "Germany",
            Country::Japan => "Japan",
            Country::UnitedStates => "United States",
            Country::UnitedKingdom => "United Kingdom",
            Country::China => "China",
            Country::Italy => "Italy",
            Country::Commonwealth => "Commonwealth",
            Country::France => "France",
            Country::Russia => "Russia",
        }
    }
}

impl Camp {
    pub fn opponent(self) -> Camp {
        match self {
            Camp::Axis => Camp::Allies,
            Camp::Allies => Camp::Axis,
        }
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
