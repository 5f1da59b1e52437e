//! What an accepted action did

use serde::{Deserialize, Serialize};

use crate::actions::rejection::Rejection;
use crate::combat::CombatReport;
use crate::core::types::{PlayerId, TerritoryId, UnitId};
use crate::game::faction::Country;
use crate::turn::PhaseTransition;
use crate::units::UnitKind;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum ActionOutcome {
    WarDeclared {
        aggressor: Country,
        target: Country,
    },
    PeaceMade {
        a: Country,
        b: Country,
    },
    UnitPurchased {
        player: PlayerId,
        unit: UnitId,
        kind: UnitKind,
        destination: TerritoryId,
        cost: u32,
        wallet: u32,
    },
    ForcesCommitted {
        player: PlayerId,
        from: TerritoryId,
        to: TerritoryId,
        units: Vec<UnitId>,
    },
    CombatResolved(CombatReport),
    UnitsMoved {
        player: PlayerId,
        from: TerritoryId,
        to: TerritoryId,
        units: Vec<UnitId>,
    },
    UnitsMobilized {
        player: PlayerId,
        placed: Vec<(UnitId, TerritoryId)>,
        /// Units whose destination was lost before placement
        reserved: Vec<UnitId>,
    },
    IncomeCollected {
        player: PlayerId,
        amount: u32,
        wallet: u32,
    },
    PhaseChanged(PhaseTransition),
}

/// Accepted outcome, or the reason the action was refused
pub type ActionResult = std::result::Result<ActionOutcome, Rejection>;
