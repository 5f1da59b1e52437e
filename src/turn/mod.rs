//! Turn phase cycle and its state machine

pub mod machine;
pub mod phase;

pub use machine::{PhaseTransition, TurnStateMachine};
pub use phase::Phase;
