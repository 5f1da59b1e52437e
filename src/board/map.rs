//! The board: exclusive owner of every territory record

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::board::territory::Territory;
use crate::core::error::{ConquestError, Result};
use crate::core::types::{TerritoryId, UnitId};

/// All territories in play, indexed by id and by name
///
/// Construction validates that ids and names are unique and that the
/// adjacency relation is symmetric.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "Vec<Territory>", into = "Vec<Territory>")]
pub struct Board {
    territories: BTreeMap<TerritoryId, Territory>,
    by_name: AHashMap<String, TerritoryId>,
}

impl Board {
    pub fn new(territories: impl IntoIterator<Item = Territory>) -> Result<Self> {
        let mut map = BTreeMap::new();
        let mut by_name = AHashMap::new();

        for territory in territories {
            if by_name.insert(territory.name.clone(), territory.id).is_some() {
                return Err(ConquestError::DuplicateTerritoryName(territory.name));
            }
            let id = territory.id;
            if map.insert(id, territory).is_some() {
                return Err(ConquestError::DuplicateTerritory(id));
            }
        }

        let board = Self { territories: map, by_name };
        board.validate_adjacency()?;
        Ok(board)
    }

    /// Check every adjacency entry points at a known territory that lists
    /// the origin back
    pub fn validate_adjacency(&self) -> Result<()> {
        for territory in self.territories.values() {
            for &neighbour in territory.adjacency() {
                let other = self.territories.get(&neighbour).ok_or(
                    ConquestError::DanglingAdjacency { from: territory.id, to: neighbour },
                )?;
                if !other.is_adjacent(territory.id) {
                    return Err(ConquestError::AsymmetricAdjacency {
                        from: territory.id,
                        to: neighbour,
                    });
                }
            }
        }
        Ok(())
    }

    pub fn territory(&self, id: TerritoryId) -> Option<&Territory> {
        self.territories.get(&id)
    }

    pub fn territory_by_name(&self, name: &str) -> Option<&Territory> {
        self.by_name.get(name).and_then(|id| self.territories.get(id))
    }

    /// Resolve a territory name to its id
    pub fn id_of(&self, name: &str) -> Result<TerritoryId> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| ConquestError::TerritoryNameNotFound(name.to_string()))
    }

    pub(crate) fn territory_mut(&mut self, id: TerritoryId) -> Option<&mut Territory> {
        self.territories.get_mut(&id)
    }

    /// Territories in ascending id order
    pub fn territories(&self) -> impl Iterator<Item = &Territory> {
        self.territories.values()
    }

    pub fn ids(&self) -> impl Iterator<Item = TerritoryId> + '_ {
        self.territories.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.territories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.territories.is_empty()
    }

    pub fn are_adjacent(&self, a: TerritoryId, b: TerritoryId) -> bool {
        self.territory(a).map(|t| t.is_adjacent(b)).unwrap_or(false)
    }

    /// Find which territory currently garrisons a unit
    pub fn locate_unit(&self, unit: UnitId) -> Option<TerritoryId> {
        self.territories
            .values()
            .find(|t| t.contains_unit(unit))
            .map(|t| t.id)
    }
}

impl TryFrom<Vec<Territory>> for Board {
    type Error = ConquestError;

    fn try_from(territories: Vec<Territory>) -> Result<Self> {
        Board::new(territories)
    }
}

impl From<Board> for Vec<Territory> {
    fn from(board: Board) -> Self {
        board.territories.into_values().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair() -> Vec<Territory> {
        vec![
            Territory::new(TerritoryId(1), "A").with_adjacent([TerritoryId(2)]),
            Territory::new(TerritoryId(2), "B").with_adjacent([TerritoryId(1)]),
        ]
    }

    #[test]
    fn test_lookup_by_id_and_name() {
        let board = Board::new(pair()).unwrap();
        assert_eq!(board.len(), 2);
        assert_eq!(board.territory_by_name("B").map(|t| t.id), Some(TerritoryId(2)));
        assert_eq!(board.id_of("A").unwrap(), TerritoryId(1));
        assert!(board.are_adjacent(TerritoryId(1), TerritoryId(2)));
        assert!(board.id_of("Nowhere").is_err());
    }

    #[test]
    fn test_asymmetric_adjacency_rejected() {
        let territories = vec![
            Territory::new(TerritoryId(1), "A").with_adjacent([TerritoryId(2)]),
            Territory::new(TerritoryId(2), "B"),
        ];
        let err = Board::new(territories).unwrap_err();
        assert!(matches!(
            err,
            ConquestError::AsymmetricAdjacency { from: TerritoryId(1), to: TerritoryId(2) }
        ));
    }

    #[test]
    fn test_dangling_adjacency_rejected() {
        let territories = vec![Territory::new(TerritoryId(1), "A").with_adjacent([TerritoryId(9)])];
        assert!(matches!(
            Board::new(territories),
            Err(ConquestError::DanglingAdjacency { .. })
        ));
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let territories = vec![
            Territory::new(TerritoryId(1), "A"),
            Territory::new(TerritoryId(2), "A"),
        ];
        assert!(matches!(
            Board::new(territories),
            Err(ConquestError::DuplicateTerritoryName(_))
        ));
    }

    #[test]
    fn test_serde_rebuilds_name_index() {
        let board = Board::new(pair()).unwrap();
        let json = serde_json::to_string(&board).unwrap();
        let restored: Board = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.id_of("B").unwrap(), TerritoryId(2));
    }
}
