//! Victory conditions
//!
//! The game is over as soon as any registered condition reports it.
//! Conditions may declare dependencies on other conditions by id; a
//! dependency must be registered first, so registration order is always a
//! valid evaluation order.

use crate::core::error::{ConquestError, Result};
use crate::core::types::Turn;
use crate::game::faction::Camp;
use crate::game::state::GameState;

pub trait VictoryCondition: Send {
    fn id(&self) -> &str;

    /// Ids of conditions that must be evaluated before this one
    fn dependencies(&self) -> Vec<String> {
        Vec::new()
    }

    fn is_end_of_game(&self, state: &GameState) -> bool;

    /// The winning camp, if the condition names one
    fn winner(&self, _state: &GameState) -> Option<Camp> {
        None
    }
}

/// Ordered set of victory conditions
#[derive(Default)]
pub struct VictoryRegistry {
    conditions: Vec<Box<dyn VictoryCondition>>,
}

impl VictoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Turn limit, camp domination and an economic target
    pub fn standard(max_turns: Turn, economic_target: u32) -> Self {
        let mut registry = Self::new();
        registry.conditions.push(Box::new(CampDomination));
        registry.conditions.push(Box::new(EconomicVictory::new(economic_target)));
        registry.conditions.push(Box::new(TurnLimit::new(max_turns)));
        registry
    }

    pub fn register(&mut self, condition: Box<dyn VictoryCondition>) -> Result<()> {
        let id = condition.id().to_string();
        if self.conditions.iter().any(|c| c.id() == id) {
            return Err(ConquestError::DuplicateVictoryCondition(id));
        }
        for dependency in condition.dependencies() {
            if !self.conditions.iter().any(|c| c.id() == dependency) {
                return Err(ConquestError::UnknownVictoryDependency { plugin: id, dependency });
            }
        }

        self.conditions.push(condition);
        Ok(())
    }

    pub fn is_game_over(&self, state: &GameState) -> bool {
        self.satisfied(state).is_some()
    }

    /// First condition, in evaluation order, that ends the game
    pub fn satisfied(&self, state: &GameState) -> Option<&dyn VictoryCondition> {
        self.conditions
            .iter()
            .find(|c| c.is_end_of_game(state))
            .map(|c| &**c)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.conditions.iter().map(|c| c.id())
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }
}

impl std::fmt::Debug for VictoryRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.ids()).finish()
    }
}

/// Ends the game once the turn counter passes `max_turns`
#[derive(Debug, Clone, Copy)]
pub struct TurnLimit {
    pub max_turns: Turn,
}

impl TurnLimit {
    pub fn new(max_turns: Turn) -> Self {
        Self { max_turns }
    }
}

impl VictoryCondition for TurnLimit {
    fn id(&self) -> &str {
        "turn-limit"
    }

    fn is_end_of_game(&self, state: &GameState) -> bool {
        state.turn() > self.max_turns
    }

    fn winner(&self, state: &GameState) -> Option<Camp> {
        let axis = state.camp_output(Camp::Axis);
        let allies = state.camp_output(Camp::Allies);
        match axis.cmp(&allies) {
            std::cmp::Ordering::Greater => Some(Camp::Axis),
            std::cmp::Ordering::Less => Some(Camp::Allies),
            std::cmp::Ordering::Equal => None,
        }
    }
}

/// A camp wins when the opposing camp is seated but holds no territory
#[derive(Debug, Clone, Copy, Default)]
pub struct CampDomination;

impl CampDomination {
    fn dominant(state: &GameState) -> Option<Camp> {
        [Camp::Axis, Camp::Allies].into_iter().find(|&camp| {
            let rival = camp.opponent();
            let rival_seated = state.players().iter().any(|p| p.camp() == rival);
            rival_seated
                && state.camp_territory_count(camp) > 0
                && state.camp_territory_count(rival) == 0
        })
    }
}

impl VictoryCondition for CampDomination {
    fn id(&self) -> &str {
        "camp-domination"
    }

    fn is_end_of_game(&self, state: &GameState) -> bool {
        Self::dominant(state).is_some()
    }

    fn winner(&self, state: &GameState) -> Option<Camp> {
        Self::dominant(state)
    }
}

/// A camp wins when its combined industrial output reaches `target`
#[derive(Debug, Clone, Copy)]
pub struct EconomicVictory {
    pub target: u32,
}

impl EconomicVictory {
    pub fn new(target: u32) -> Self {
        Self { target }
    }

    fn leader(&self, state: &GameState) -> Option<Camp> {
        [Camp::Axis, Camp::Allies]
            .into_iter()
            .find(|&camp| state.camp_output(camp) >= self.target)
    }
}

impl VictoryCondition for EconomicVictory {
    fn id(&self) -> &str {
        "economic-victory"
    }

    fn is_end_of_game(&self, state: &GameState) -> bool {
        self.leader(state).is_some()
    }

    fn winner(&self, state: &GameState) -> Option<Camp> {
        self.leader(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Board, Territory};
    use crate::core::types::TerritoryId;
    use crate::game::faction::Country;

    struct Dependent;

    impl VictoryCondition for Dependent {
        fn id(&self) -> &str {
            "dependent"
        }

        fn dependencies(&self) -> Vec<String> {
            vec!["turn-limit".to_string()]
        }

        fn is_end_of_game(&self, _state: &GameState) -> bool {
            false
        }
    }

    fn state() -> GameState {
        let board = Board::new([
            Territory::new(TerritoryId(1), "West").with_output(5).with_adjacent([TerritoryId(2)]),
            Territory::new(TerritoryId(2), "East").with_output(3).with_adjacent([TerritoryId(1)]),
        ])
        .unwrap();
        let mut state = GameState::new(board);
        let germany = state.add_player("Germany", Country::Germany, 0).unwrap();
        let russia = state.add_player("Russia", Country::Russia, 0).unwrap();
        state.assign_territory(TerritoryId(1), germany).unwrap();
        state.assign_territory(TerritoryId(2), russia).unwrap();
        state
    }

    #[test]
    fn test_empty_registry_never_ends() {
        assert!(!VictoryRegistry::new().is_game_over(&state()));
    }

    #[test]
    fn test_dependency_must_be_registered_first() {
        let mut registry = VictoryRegistry::new();
        let err = registry.register(Box::new(Dependent)).unwrap_err();
        assert!(matches!(err, ConquestError::UnknownVictoryDependency { .. }));

        registry.register(Box::new(TurnLimit::new(5))).unwrap();
        registry.register(Box::new(Dependent)).unwrap();
        assert_eq!(registry.ids().collect::<Vec<_>>(), vec!["turn-limit", "dependent"]);
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut registry = VictoryRegistry::new();
        registry.register(Box::new(CampDomination)).unwrap();
        let err = registry.register(Box::new(CampDomination)).unwrap_err();
        assert!(matches!(err, ConquestError::DuplicateVictoryCondition(_)));
    }

    #[test]
    fn test_camp_domination() {
        let mut state = state();
        assert!(!CampDomination.is_end_of_game(&state));

        let germany = state.player_for(Country::Germany).unwrap().id;
        state.transfer_territory(TerritoryId(2), Some(germany)).unwrap();
        assert!(CampDomination.is_end_of_game(&state));
        assert_eq!(CampDomination.winner(&state), Some(Camp::Axis));
    }

    #[test]
    fn test_economic_target() {
        let state = state();
        assert!(EconomicVictory::new(5).is_end_of_game(&state));
        assert_eq!(EconomicVictory::new(5).winner(&state), Some(Camp::Axis));
        assert!(!EconomicVictory::new(6).is_end_of_game(&state));
    }

    #[test]
    fn test_game_over_is_any_condition() {
        let registry = VictoryRegistry::standard(10, 100);
        let state = state();
        assert!(!registry.is_game_over(&state));

        let registry = VictoryRegistry::standard(0, 100);
        assert_eq!(registry.satisfied(&state).map(|c| c.id()), Some("turn-limit"));
    }
}
