//! Record of accepted actions

use serde::{Deserialize, Serialize};

use crate::actions::ActionOutcome;
use crate::core::types::{PlayerId, Turn};
use crate::turn::Phase;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: u32,
    pub turn: Turn,
    /// Phase the action was accepted in
    pub phase: Phase,
    pub player: Option<PlayerId>,
    pub outcome: ActionOutcome,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryLog {
    pub entries: Vec<HistoryEntry>,
    next_entry_id: u32,
}

impl HistoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(
        &mut self,
        turn: Turn,
        phase: Phase,
        player: Option<PlayerId>,
        outcome: ActionOutcome,
    ) -> u32 {
        let id = self.next_entry_id;
        self.next_entry_id += 1;

        self.entries.push(HistoryEntry {
            id,
            turn,
            phase,
            player,
            outcome,
        });

        id
    }

    pub fn entries_for_turn(&self, turn: Turn) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter().filter(move |e| e.turn == turn)
    }

    pub fn entries_for_player(&self, player: PlayerId) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter().filter(move |e| e.player == Some(player))
    }

    pub fn last(&self) -> Option<&HistoryEntry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
