//! Unit kinds and their fixed combat profiles
//!
//! The archetype table is a compile-time constant, so every unit instance
//! of a kind shares the same profile for the lifetime of the process.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of military unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitKind {
    Infantry,
    Tank,
    Fighter,
    Bomber,
    Battleship,
}

/// Shared base record for every unit of a kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnitArchetype {
    pub kind: UnitKind,
    /// Dice rolled when attacking
    pub attack: u32,
    /// Dice rolled when defending
    pub defense: u32,
    /// Adjacency steps per move
    pub movement: u32,
    /// Purchase price
    pub cost: u32,
}

const ARCHETYPES: [UnitArchetype; 5] = [
    UnitArchetype { kind: UnitKind::Infantry, attack: 1, defense: 2, movement: 1, cost: 3 },
    UnitArchetype { kind: UnitKind::Tank, attack: 3, defense: 3, movement: 2, cost: 5 },
    UnitArchetype { kind: UnitKind::Fighter, attack: 3, defense: 4, movement: 4, cost: 10 },
    UnitArchetype { kind: UnitKind::Bomber, attack: 4, defense: 1, movement: 6, cost: 15 },
    UnitArchetype { kind: UnitKind::Battleship, attack: 4, defense: 4, movement: 2, cost: 24 },
];

impl UnitKind {
    pub const ALL: [UnitKind; 5] = [
        UnitKind::Infantry,
        UnitKind::Tank,
        UnitKind::Fighter,
        UnitKind::Bomber,
        UnitKind::Battleship,
    ];

    /// Archetype lookup replaces per-kind subtyping
    pub fn archetype(self) -> &'static UnitArchetype {
        &ARCHETYPES[self as usize]
    }

    pub fn attack(self) -> u32 {
        self.archetype().attack
    }

    pub fn defense(self) -> u32 {
        self.archetype().defense
    }

    pub fn movement(self) -> u32 {
        self.archetype().movement
    }

    pub fn cost(self) -> u32 {
        self.archetype().cost
    }

    pub fn name(self) -> &'static str {
        match self {
            UnitKind::Infantry => "infantry",
            UnitKind::Tank => "tank",
            UnitKind::Fighter => "fighter",
            UnitKind::Bomber => "bomber",
            UnitKind::Battleship => "battleship",
        }
    }
}

impl fmt::Display for UnitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_archetype_table_matches_kind() {
        for kind in UnitKind::ALL {
            assert_eq!(kind.archetype().kind, kind);
        }
    }

    #[test]
    fn test_infantry_and_tank_profiles() {
        let infantry = UnitKind::Infantry.archetype();
        assert_eq!((infantry.attack, infantry.defense, infantry.movement, infantry.cost), (1, 2, 1, 3));

        let tank = UnitKind::Tank.archetype();
        assert_eq!((tank.attack, tank.defense, tank.movement, tank.cost), (3, 3, 2, 5));
    }

    #[test]
    fn test_archetypes_are_value_equal() {
        let a = *UnitKind::Fighter.archetype();
        let b = UnitArchetype { kind: UnitKind::Fighter, attack: 3, defense: 4, movement: 4, cost: 10 };
        assert_eq!(a, b);
        assert_ne!(a, *UnitKind::Bomber.archetype());
    }

    #[test]
    fn test_every_unit_can_move() {
        assert!(UnitKind::ALL.iter().all(|k| k.movement() >= 1));
    }
}
