//! Unit archetypes and instances

pub mod archetype;
pub mod unit;

pub use archetype::{UnitArchetype, UnitKind};
pub use unit::{attack_strength, defense_strength, Unit};
