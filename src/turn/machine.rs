//! Turn phase state machine
//!
//! Holds the current phase and the turn counter. It only answers "is this
//! kind of action legal now?" and moves to the next phase; executing actions
//! is the dispatcher's job, and deciding when the game ends belongs to the
//! victory conditions.

use serde::{Deserialize, Serialize};

use crate::actions::ActionKind;
use crate::core::types::Turn;
use crate::turn::phase::Phase;

/// Result of a single `advance`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseTransition {
    pub from: Phase,
    pub to: Phase,
    /// Turn counter after the transition
    pub turn: Turn,
    /// True when the transition wrapped to the first phase
    pub turn_ended: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnStateMachine {
    phase: Phase,
    turn: Turn,
}

impl Default for TurnStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl TurnStateMachine {
    /// Start at the first phase of turn 1
    pub fn new() -> Self {
        Self::starting_at(Phase::first(), 1)
    }

    pub fn starting_at(phase: Phase, turn: Turn) -> Self {
        Self { phase, turn }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn turn(&self) -> Turn {
        self.turn
    }

    /// An action kind is legal when its declared phase equals the current
    /// phase; phase changes are always legal
    pub fn can_perform(&self, kind: ActionKind) -> bool {
        match kind.legal_phase() {
            Some(phase) => phase == self.phase,
            None => true,
        }
    }

    /// Move to the next phase, incrementing the turn counter on wrap-around
    pub fn advance(&mut self) -> PhaseTransition {
        let from = self.phase;
        let to = from.next();
        let turn_ended = from.is_last();
        if turn_ended {
            self.turn += 1;
        }
        self.phase = to;

        PhaseTransition { from, to, turn: self.turn, turn_ended }
    }
}
