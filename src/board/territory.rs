//! Territory records
//!
//! A territory is owned by the [`Board`](super::Board) that created it.
//! Garrison changes go through `add_unit`/`remove_unit`; the owner pointer
//! is only changed by the game state, which updates the owning player's
//! territory set in the same step.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::core::types::{PlayerId, TerritoryId, UnitId};
use crate::units::Unit;

/// Terrain class of a territory (metadata only)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerritoryCategory {
    Land,
    Sea,
    Impassable,
    #[default]
    Unknown,
}

/// A board region with an owner, garrison, and adjacency list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Territory {
    pub id: TerritoryId,
    pub name: String,
    owner: Option<PlayerId>,
    garrison: Vec<Unit>,
    adjacency: BTreeSet<TerritoryId>,
    pub industrial_output: u32,
    pub category: TerritoryCategory,
}

impl Territory {
    pub fn new(id: TerritoryId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            owner: None,
            garrison: Vec::new(),
            adjacency: BTreeSet::new(),
            industrial_output: 0,
            category: TerritoryCategory::Unknown,
        }
    }

    pub fn with_output(mut self, industrial_output: u32) -> Self {
        self.industrial_output = industrial_output;
        self
    }

    pub fn with_category(mut self, category: TerritoryCategory) -> Self {
        self.category = category;
        self
    }

    pub fn with_adjacent(mut self, neighbours: impl IntoIterator<Item = TerritoryId>) -> Self {
        self.adjacency.extend(neighbours);
        self
    }

    pub fn add_adjacent(&mut self, neighbour: TerritoryId) {
        self.adjacency.insert(neighbour);
    }

    pub fn owner(&self) -> Option<PlayerId> {
        self.owner
    }

    pub fn garrison(&self) -> &[Unit] {
        &self.garrison
    }

    pub fn adjacency(&self) -> &BTreeSet<TerritoryId> {
        &self.adjacency
    }

    pub fn is_adjacent(&self, other: TerritoryId) -> bool {
        self.adjacency.contains(&other)
    }

    pub fn has_industry(&self) -> bool {
        self.industrial_output > 0
    }

    pub fn contains_unit(&self, id: UnitId) -> bool {
        self.garrison.iter().any(|u| u.id == id)
    }

    pub fn units_owned_by(&self, player: PlayerId) -> impl Iterator<Item = &Unit> {
        self.garrison.iter().filter(move |u| u.owner == player)
    }

    pub fn add_unit(&mut self, unit: Unit) {
        self.garrison.push(unit);
    }

    pub fn remove_unit(&mut self, id: UnitId) -> Option<Unit> {
        let index = self.garrison.iter().position(|u| u.id == id)?;
        Some(self.garrison.remove(index))
    }

    pub(crate) fn change_owner(&mut self, owner: Option<PlayerId>) {
        self.owner = owner;
    }
}
