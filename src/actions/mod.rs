//! Turn actions, their validation and their outcomes

pub mod action;
pub mod dispatcher;
pub mod outcome;
pub mod rejection;

pub use action::{
    ActionKind, ChangePhaseAction, CollectIncomeAction, CombatAction, DiplomaticAction, MobilizeAction,
    NonCombatAction, PurchaseAction, TurnAction,
};
pub use dispatcher::ActionDispatcher;
pub use outcome::{ActionOutcome, ActionResult};
pub use rejection::{MovementError, Rejection};
