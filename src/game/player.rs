//! Players: one per country in play

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::core::types::{PlayerId, TerritoryId, Turn};
use crate::game::faction::{Camp, Country};
use crate::units::Unit;

/// A purchased unit waiting for mobilization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingPurchase {
    pub unit: Unit,
    pub destination: TerritoryId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub country: Country,
    /// Mirror of `Territory::owner`; only `GameState` edits it
    territories: BTreeSet<TerritoryId>,
    /// Owned units that are not on the board
    pub reserve: Vec<Unit>,
    pub purchase_queue: Vec<PendingPurchase>,
    pub wallet: u32,
    last_income_turn: Option<Turn>,
}

impl Player {
    pub fn new(id: PlayerId, name: impl Into<String>, country: Country, wallet: u32) -> Self {
        Self {
            id,
            name: name.into(),
            country,
            territories: BTreeSet::new(),
            reserve: Vec::new(),
            purchase_queue: Vec::new(),
            wallet,
            last_income_turn: None,
        }
    }

    pub fn camp(&self) -> Camp {
        self.country.camp()
    }

    pub fn territories(&self) -> &BTreeSet<TerritoryId> {
        &self.territories
    }

    pub fn owns(&self, territory: TerritoryId) -> bool {
        self.territories.contains(&territory)
    }

    pub fn can_afford(&self, cost: u32) -> bool {
        self.wallet >= cost
    }

    pub fn has_collected_income(&self, turn: Turn) -> bool {
        self.last_income_turn == Some(turn)
    }

    pub(crate) fn insert_territory(&mut self, territory: TerritoryId) {
        self.territories.insert(territory);
    }

    pub(crate) fn remove_territory(&mut self, territory: TerritoryId) {
        self.territories.remove(&territory);
    }

    pub(crate) fn mark_income_collected(&mut self, turn: Turn) {
        self.last_income_turn = Some(turn);
    }
}
