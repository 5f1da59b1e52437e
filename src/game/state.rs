//! Aggregate game state
//!
//! Owns the board, the players, the phase machine, active wars and the
//! battles committed this turn. Territory ownership is recorded twice
//! (`Territory::owner` and `Player::territories`); every change goes through
//! [`GameState::transfer_territory`], which validates first and then updates
//! both sides in one step.

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::core::error::{ConquestError, Result};
use crate::core::types::{PlayerId, TerritoryId, Turn, UnitId};
use crate::game::faction::{Camp, Country};
use crate::game::history::HistoryLog;
use crate::game::player::Player;
use crate::game::wars::WarSet;
use crate::turn::{Phase, PhaseTransition, TurnStateMachine};
use crate::units::{Unit, UnitKind};

/// A unit committed to a battle, with the territory it came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommittedUnit {
    pub unit: Unit,
    pub origin: TerritoryId,
}

/// Forces moved against a territory during combat-move, not yet rolled
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingBattle {
    pub territory: TerritoryId,
    pub attacker: PlayerId,
    pub committed: Vec<CommittedUnit>,
}

impl PendingBattle {
    pub fn units(&self) -> impl Iterator<Item = &Unit> {
        self.committed.iter().map(|c| &c.unit)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    board: Board,
    /// Kept sorted by country, which is the turn order
    players: Vec<Player>,
    active: usize,
    machine: TurnStateMachine,
    wars: WarSet,
    pending_battles: Vec<PendingBattle>,
    next_unit_id: u64,
    next_player_id: u32,
    history: HistoryLog,
}

impl GameState {
    pub fn new(board: Board) -> Self {
        Self {
            board,
            players: Vec::new(),
            active: 0,
            machine: TurnStateMachine::new(),
            wars: WarSet::new(),
            pending_battles: Vec::new(),
            next_unit_id: 1,
            next_player_id: 1,
            history: HistoryLog::new(),
        }
    }

    // === PLAYERS ===

    /// Seat a player for `country`; turn order follows country order
    pub fn add_player(&mut self, name: impl Into<String>, country: Country, wallet: u32) -> Result<PlayerId> {
        if self.players.iter().any(|p| p.country == country) {
            return Err(ConquestError::DuplicateCountry(country.to_string()));
        }

        let active = if self.has_started() { self.active_player() } else { None };
        let id = PlayerId(self.next_player_id);
        self.next_player_id += 1;
        self.players.push(Player::new(id, name, country, wallet));
        self.players.sort_by_key(|p| p.country);

        // Before play starts the earliest country opens; afterwards seating a
        // player must not hand the turn to someone else.
        self.active = active
            .and_then(|active| self.players.iter().position(|p| p.id == active))
            .unwrap_or(0);

        Ok(id)
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub(crate) fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    pub fn player_for(&self, country: Country) -> Option<&Player> {
        self.players.iter().find(|p| p.country == country)
    }

    pub fn active_player(&self) -> Option<PlayerId> {
        self.players.get(self.active).map(|p| p.id)
    }

    pub fn country_of(&self, id: PlayerId) -> Option<Country> {
        self.player(id).map(|p| p.country)
    }

    // === TURN ===

    /// Whether any phase has been played or any action recorded
    pub fn has_started(&self) -> bool {
        !self.history.is_empty() || self.turn() > 1 || self.phase() != Phase::first()
    }

    pub fn phase(&self) -> Phase {
        self.machine.phase()
    }

    pub fn turn(&self) -> Turn {
        self.machine.turn()
    }

    pub fn machine(&self) -> &TurnStateMachine {
        &self.machine
    }

    /// Advance the phase machine; a wrap hands the turn to the next player
    pub(crate) fn advance_phase(&mut self) -> PhaseTransition {
        let transition = self.machine.advance();
        if transition.turn_ended && !self.players.is_empty() {
            self.active = (self.active + 1) % self.players.len();
        }
        transition
    }

    // === WARS ===

    pub fn wars(&self) -> &WarSet {
        &self.wars
    }

    pub(crate) fn wars_mut(&mut self) -> &mut WarSet {
        &mut self.wars
    }

    pub fn players_at_war(&self, a: PlayerId, b: PlayerId) -> bool {
        match (self.country_of(a), self.country_of(b)) {
            (Some(a), Some(b)) => self.wars.is_at_war(a, b),
            _ => false,
        }
    }

    /// Same camp and not at war with each other
    pub fn are_friendly(&self, a: PlayerId, b: PlayerId) -> bool {
        if a == b {
            return true;
        }
        match (self.country_of(a), self.country_of(b)) {
            (Some(ca), Some(cb)) => ca.is_ally_of(cb) && !self.wars.is_at_war(ca, cb),
            _ => false,
        }
    }

    // === BOARD ===

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub(crate) fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    /// Change a territory's owner, keeping both ownership records in step
    ///
    /// Returns the previous owner. Nothing is modified if either the
    /// territory or the new owner is unknown.
    pub fn transfer_territory(
        &mut self,
        territory: TerritoryId,
        new_owner: Option<PlayerId>,
    ) -> Result<Option<PlayerId>> {
        let previous = self
            .board
            .territory(territory)
            .ok_or(ConquestError::TerritoryNotFound(territory))?
            .owner();
        if let Some(owner) = new_owner {
            if self.player(owner).is_none() {
                return Err(ConquestError::PlayerNotFound(owner));
            }
        }

        if let Some(old) = previous.and_then(|id| self.player_mut(id)) {
            old.remove_territory(territory);
        }
        if let Some(new) = new_owner.and_then(|id| self.player_mut(id)) {
            new.insert_territory(territory);
        }
        if let Some(record) = self.board.territory_mut(territory) {
            record.change_owner(new_owner);
        }

        Ok(previous)
    }

    /// Setup helper: give `territory` to `player`
    pub fn assign_territory(&mut self, territory: TerritoryId, player: PlayerId) -> Result<()> {
        self.transfer_territory(territory, Some(player)).map(|_| ())
    }

    /// Verify that every territory owner and every player territory set agree
    pub fn check_ownership_invariant(&self) -> Result<()> {
        for territory in self.board.territories() {
            if let Some(owner) = territory.owner() {
                let listed = self.player(owner).is_some_and(|p| p.owns(territory.id));
                if !listed {
                    return Err(ConquestError::OwnershipMismatch(territory.id));
                }
            }
        }

        for player in &self.players {
            for &id in player.territories() {
                let owner = self.board.territory(id).and_then(|t| t.owner());
                if owner != Some(player.id) {
                    return Err(ConquestError::OwnershipMismatch(id));
                }
            }
        }

        Ok(())
    }

    /// Verify the turn pointer and id counters against the recorded state
    pub fn check_counters(&self) -> Result<()> {
        if self.active >= self.players.len().max(1) {
            return Err(ConquestError::InconsistentState(format!(
                "active seat {} with {} players",
                self.active,
                self.players.len()
            )));
        }

        if let Some(max) = self.units().map(|u| u.id.0).max() {
            if self.next_unit_id <= max {
                return Err(ConquestError::InconsistentState(format!(
                    "next unit id {} does not exceed existing unit {}",
                    self.next_unit_id, max
                )));
            }
        }

        if let Some(max) = self.players.iter().map(|p| p.id.0).max() {
            if self.next_player_id <= max {
                return Err(ConquestError::InconsistentState(format!(
                    "next player id {} does not exceed existing player {}",
                    self.next_player_id, max
                )));
            }
        }

        Ok(())
    }

    // === UNITS ===

    /// Every unit in play: garrisons, reserves, purchase queues and battles
    pub fn units(&self) -> impl Iterator<Item = &Unit> {
        let garrisons = self.board.territories().flat_map(|t| t.garrison());
        let held = self
            .players
            .iter()
            .flat_map(|p| p.reserve.iter().chain(p.purchase_queue.iter().map(|q| &q.unit)));
        let committed = self.pending_battles.iter().flat_map(|b| b.units());
        garrisons.chain(held).chain(committed)
    }

    pub(crate) fn allocate_unit(&mut self, owner: PlayerId, kind: UnitKind) -> Unit {
        let id = UnitId(self.next_unit_id);
        self.next_unit_id += 1;
        Unit::new(id, kind, owner)
    }

    /// Setup helper: create a unit for `owner` directly in `territory`
    pub fn deploy_unit(&mut self, owner: PlayerId, kind: UnitKind, territory: TerritoryId) -> Result<UnitId> {
        if self.player(owner).is_none() {
            return Err(ConquestError::PlayerNotFound(owner));
        }
        if self.board.territory(territory).is_none() {
            return Err(ConquestError::TerritoryNotFound(territory));
        }

        let unit = self.allocate_unit(owner, kind);
        if let Some(record) = self.board.territory_mut(territory) {
            record.add_unit(unit);
        }
        Ok(unit.id)
    }

    // === BATTLES ===

    pub fn pending_battles(&self) -> &[PendingBattle] {
        &self.pending_battles
    }

    pub fn pending_battle(&self, territory: TerritoryId) -> Option<&PendingBattle> {
        self.pending_battles.iter().find(|b| b.territory == territory)
    }

    /// Add committed units to the battle for `territory`, opening it if needed
    pub(crate) fn commit_to_battle(&mut self, territory: TerritoryId, attacker: PlayerId, units: Vec<CommittedUnit>) {
        match self.pending_battles.iter_mut().find(|b| b.territory == territory) {
            Some(battle) => battle.committed.extend(units),
            None => self.pending_battles.push(PendingBattle {
                territory,
                attacker,
                committed: units,
            }),
        }
    }

    pub(crate) fn take_battle(&mut self, territory: TerritoryId) -> Option<PendingBattle> {
        let index = self.pending_battles.iter().position(|b| b.territory == territory)?;
        Some(self.pending_battles.remove(index))
    }

    pub(crate) fn take_all_battles(&mut self) -> Vec<PendingBattle> {
        std::mem::take(&mut self.pending_battles)
    }

    /// Put units back where they came from, or into reserve if the origin
    /// is no longer theirs
    pub(crate) fn return_to_origin(&mut self, units: impl IntoIterator<Item = CommittedUnit>) {
        for CommittedUnit { unit, origin } in units {
            let still_owned = self
                .board
                .territory(origin)
                .is_some_and(|t| t.owner() == Some(unit.owner));
            if still_owned {
                if let Some(record) = self.board.territory_mut(origin) {
                    record.add_unit(unit);
                    continue;
                }
            }
            if let Some(player) = self.player_mut(unit.owner) {
                player.reserve.push(unit);
            }
        }
    }

    // === ECONOMY ===

    /// Combined industrial output of the territories a player owns
    pub fn income_of(&self, player: PlayerId) -> u32 {
        self.player(player)
            .map(|p| {
                p.territories()
                    .iter()
                    .filter_map(|id| self.board.territory(*id))
                    .fold(0u32, |total, t| total.saturating_add(t.industrial_output))
            })
            .unwrap_or(0)
    }

    pub fn camp_territory_count(&self, camp: Camp) -> usize {
        self.players
            .iter()
            .filter(|p| p.camp() == camp)
            .map(|p| p.territories().len())
            .sum()
    }

    pub fn camp_output(&self, camp: Camp) -> u32 {
        self.players
            .iter()
            .filter(|p| p.camp() == camp)
            .map(|p| self.income_of(p.id))
            .sum()
    }

    // === HISTORY ===

    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    pub(crate) fn history_mut(&mut self) -> &mut HistoryLog {
        &mut self.history
    }
}
