//! Board and territory model

pub mod map;
pub mod provider;
pub mod territory;

pub use map::Board;
pub use provider::{BoardProvider, ClassicBoard};
pub use territory::{Territory, TerritoryCategory};
