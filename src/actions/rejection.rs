//! Reasons an action was refused
//!
//! Rejections are expected user input, returned to the caller as values.
//! Messages are written to be shown to the player as-is.

use thiserror::Error;

use crate::actions::action::ActionKind;
use crate::core::types::{PlayerId, TerritoryId, UnitId};
use crate::game::faction::Country;
use crate::turn::Phase;
use crate::units::UnitKind;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MovementError {
    #[error("cannot move: {0} is not your territory")]
    NotOwner(TerritoryId),

    #[error("cannot move: {from} is not adjacent to {to}")]
    NotAdjacent { from: TerritoryId, to: TerritoryId },

    #[error("cannot move: units {missing:?} are not yours to move from {territory}")]
    UnitsNotPresent { territory: TerritoryId, missing: Vec<UnitId> },

    #[error("cannot move: no units selected")]
    EmptyBatch,

    #[error("cannot move: {0} is not held by you or an ally")]
    HostileDestination(TerritoryId),

    #[error("cannot attack: {0} is already held by your side")]
    FriendlyTarget(TerritoryId),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    #[error("cannot {kind} during the {phase} phase")]
    IllegalAction { kind: ActionKind, phase: Phase },

    #[error("it is not {player}'s turn")]
    NotActivePlayer { player: PlayerId, active: Option<PlayerId> },

    #[error("unknown player {0}")]
    UnknownPlayer(PlayerId),

    #[error("unknown territory {0}")]
    UnknownTerritory(TerritoryId),

    #[error(transparent)]
    InvalidMovement(#[from] MovementError),

    #[error("{kind} costs {cost} but only {wallet} is available")]
    InsufficientFunds { kind: UnitKind, cost: u32, wallet: u32 },

    #[error("cannot place units in {0}: not your territory")]
    PlacementNotOwned(TerritoryId),

    #[error("cannot place units in {0}: no industrial capacity")]
    NoIndustry(TerritoryId),

    #[error("{0} and {1} are not at war")]
    NotAtWar(Country, Country),

    #[error("{0} and {1} are already at war")]
    AlreadyAtWar(Country, Country),

    #[error("{0} cannot declare war on its own side ({1})")]
    AlliedTarget(Country, Country),

    #[error("no battle is pending in {0}")]
    NoPendingBattle(TerritoryId),

    #[error("{0} has already collected income this turn")]
    IncomeAlreadyCollected(PlayerId),

    #[error("the game is over")]
    GameOver,
}
