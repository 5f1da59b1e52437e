//! Conquest Engine - turn-based territorial conquest rules engine

pub mod actions;
pub mod board;
pub mod combat;
pub mod core;
pub mod events;
pub mod game;
pub mod turn;
pub mod units;

pub use crate::core::error::{ConquestError, Result};
