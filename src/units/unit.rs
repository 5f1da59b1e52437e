//! Unit instances

use serde::{Deserialize, Serialize};

use crate::core::types::{PlayerId, UnitId};
use crate::units::archetype::{UnitArchetype, UnitKind};

/// A single unit on the board, in a purchase queue, or in reserve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Unit {
    pub id: UnitId,
    pub kind: UnitKind,
    pub owner: PlayerId,
}

impl Unit {
    pub fn new(id: UnitId, kind: UnitKind, owner: PlayerId) -> Self {
        Self { id, kind, owner }
    }

    pub fn archetype(&self) -> &'static UnitArchetype {
        self.kind.archetype()
    }

    pub fn attack(&self) -> u32 {
        self.kind.attack()
    }

    pub fn defense(&self) -> u32 {
        self.kind.defense()
    }

    pub fn cost(&self) -> u32 {
        self.kind.cost()
    }
}

/// Total attack dice for a group of units
pub fn attack_strength<'a>(units: impl IntoIterator<Item = &'a Unit>) -> u32 {
    units.into_iter().map(Unit::attack).sum()
}

/// Total defense dice for a group of units
pub fn defense_strength<'a>(units: impl IntoIterator<Item = &'a Unit>) -> u32 {
    units.into_iter().map(Unit::defense).sum()
}
