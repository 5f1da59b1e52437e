pub mod config;
pub mod error;
pub mod types;

pub use config::{RulesConfig, UnitHitThreshold};
pub use error::{ConquestError, Result};
pub use types::{EventId, PlayerId, TerritoryId, Turn, UnitId};
