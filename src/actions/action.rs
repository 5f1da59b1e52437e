//! Turn actions
//!
//! Every action a caller can submit is a variant of [`TurnAction`]; the
//! dispatcher matches on it exhaustively. Each variant maps to an
//! [`ActionKind`], and each kind declares the one phase it is legal in.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::types::{PlayerId, TerritoryId, UnitId};
use crate::game::faction::Country;
use crate::turn::Phase;
use crate::units::UnitKind;

/// Action category used for phase legality checks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Diplomatic,
    Purchase,
    CombatMove,
    CombatResolve,
    NonCombatMove,
    Mobilize,
    CollectIncome,
    ChangePhase,
}

impl ActionKind {
    pub const ALL: [ActionKind; 8] = [
        ActionKind::Diplomatic,
        ActionKind::Purchase,
        ActionKind::CombatMove,
        ActionKind::CombatResolve,
        ActionKind::NonCombatMove,
        ActionKind::Mobilize,
        ActionKind::CollectIncome,
        ActionKind::ChangePhase,
    ];

    /// The phase this kind is legal in; `None` means always legal
    pub fn legal_phase(self) -> Option<Phase> {
        match self {
            ActionKind::Diplomatic => Some(Phase::Diplomacy),
            ActionKind::Purchase => Some(Phase::Purchase),
            ActionKind::CombatMove => Some(Phase::CombatMove),
            ActionKind::CombatResolve => Some(Phase::CombatResolution),
            ActionKind::NonCombatMove => Some(Phase::NonCombatMove),
            ActionKind::Mobilize => Some(Phase::Mobilization),
            ActionKind::CollectIncome => Some(Phase::CollectIncome),
            ActionKind::ChangePhase => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ActionKind::Diplomatic => "diplomacy",
            ActionKind::Purchase => "purchase",
            ActionKind::CombatMove => "combat move",
            ActionKind::CombatResolve => "combat resolution",
            ActionKind::NonCombatMove => "non-combat move",
            ActionKind::Mobilize => "mobilize",
            ActionKind::CollectIncome => "collect income",
            ActionKind::ChangePhase => "change phase",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiplomaticAction {
    DeclareWar { player: PlayerId, against: Country },
    MakePeace { player: PlayerId, with: Country },
}

/// Buy a unit for later placement at `destination`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseAction {
    pub player: PlayerId,
    pub kind: UnitKind,
    pub destination: TerritoryId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CombatAction {
    /// Move units into an adjacent hostile or unowned territory
    Commit {
        player: PlayerId,
        from: TerritoryId,
        to: TerritoryId,
        units: Vec<UnitId>,
    },
    /// Roll the battle for a territory with committed forces
    Resolve { player: PlayerId, territory: TerritoryId },
}

/// Move units between friendly territories
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NonCombatAction {
    pub player: PlayerId,
    pub from: TerritoryId,
    pub to: TerritoryId,
    pub units: Vec<UnitId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectIncomeAction {
    pub player: PlayerId,
}

/// Place every purchased unit at its destination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MobilizeAction {
    pub player: PlayerId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChangePhaseAction;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnAction {
    Diplomatic(DiplomaticAction),
    Purchase(PurchaseAction),
    Combat(CombatAction),
    NonCombat(NonCombatAction),
    CollectIncome(CollectIncomeAction),
    Mobilize(MobilizeAction),
    ChangePhase(ChangePhaseAction),
}

impl TurnAction {
    pub fn change_phase() -> Self {
        TurnAction::ChangePhase(ChangePhaseAction)
    }

    pub fn kind(&self) -> ActionKind {
        match self {
            TurnAction::Diplomatic(_) => ActionKind::Diplomatic,
            TurnAction::Purchase(_) => ActionKind::Purchase,
            TurnAction::Combat(CombatAction::Commit { .. }) => ActionKind::CombatMove,
            TurnAction::Combat(CombatAction::Resolve { .. }) => ActionKind::CombatResolve,
            TurnAction::NonCombat(_) => ActionKind::NonCombatMove,
            TurnAction::CollectIncome(_) => ActionKind::CollectIncome,
            TurnAction::Mobilize(_) => ActionKind::Mobilize,
            TurnAction::ChangePhase(_) => ActionKind::ChangePhase,
        }
    }

    pub fn legal_phase(&self) -> Option<Phase> {
        self.kind().legal_phase()
    }

    /// The acting player, if the action has one
    pub fn player(&self) -> Option<PlayerId> {
        match self {
            TurnAction::Diplomatic(DiplomaticAction::DeclareWar { player, .. })
            | TurnAction::Diplomatic(DiplomaticAction::MakePeace { player, .. }) => Some(*player),
            TurnAction::Purchase(a) => Some(a.player),
            TurnAction::Combat(CombatAction::Commit { player, .. })
            | TurnAction::Combat(CombatAction::Resolve { player, .. }) => Some(*player),
            TurnAction::NonCombat(a) => Some(a.player),
            TurnAction::CollectIncome(a) => Some(a.player),
            TurnAction::Mobilize(a) => Some(a.player),
            TurnAction::ChangePhase(_) => None,
        }
    }
}
