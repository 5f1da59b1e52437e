//! Dice combat
//!
//! - [`dice`]: pluggable random source
//! - [`resolution`]: exchange rolling, casualty selection and capture

pub mod dice;
pub mod resolution;

pub use dice::{DiceRoller, ScriptedDice, SeededDice};
pub use resolution::{select_casualties, CombatEngine, CombatReport, Exchange};
