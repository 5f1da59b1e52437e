//! Serializable snapshot of a game in progress
//!
//! The snapshot carries every field of the state: board with garrisons,
//! players, phase and turn, wars, pending battles and history. The format is
//! plain JSON. Restoring re-runs the board, ownership and id counter checks,
//! so a tampered file is refused instead of producing an inconsistent game.

use serde::{Deserialize, Serialize};

use crate::core::error::Result;
use crate::game::state::GameState;

pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub version: u32,
    pub state: GameState,
}

impl GameSnapshot {
    pub fn capture(state: &GameState) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            state: state.clone(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Validate and hand back the state
    pub fn restore(self) -> Result<GameState> {
        self.state.check_ownership_invariant()?;
        self.state.check_counters()?;
        Ok(self.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{BoardProvider, ClassicBoard};
    use crate::core::error::ConquestError;
    use crate::game::faction::Country;
    use crate::units::UnitKind;

    #[test]
    fn test_snapshot_restores_state() {
        let board = ClassicBoard.build_board().unwrap();
        let mut state = GameState::new(board);
        let germany = state.add_player("Germany", Country::Germany, 40).unwrap();
        let target = state.board().id_of("Germany").unwrap();
        state.assign_territory(target, germany).unwrap();
        state.deploy_unit(germany, UnitKind::Tank, target).unwrap();

        let json = GameSnapshot::capture(&state).to_json().unwrap();
        let restored = GameSnapshot::from_json(&json).unwrap().restore().unwrap();

        assert_eq!(restored.phase(), state.phase());
        assert_eq!(restored.players(), state.players());
        assert_eq!(restored.board().territory(target), state.board().territory(target));
        assert_eq!(restored.board().len(), state.board().len());
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        let err = GameSnapshot::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConquestError::SerdeError(_)));
    }
}
