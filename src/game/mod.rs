//! Game state, players, diplomacy and victory
//!
//! Components:
//! - `faction`: countries, camps and turn order
//! - `player`: wallets, reserves and purchase queues
//! - `wars`: symmetric war relation
//! - `state`: the aggregate the dispatcher mutates
//! - `history`: log of accepted actions
//! - `snapshot`: JSON save/restore of a state
//! - `victory`: pluggable game-over checks
//! - `session`: state, dispatcher and bus wired together

pub mod faction;
pub mod history;
pub mod player;
pub mod session;
pub mod snapshot;
pub mod state;
pub mod victory;
pub mod wars;

pub use faction::{Camp, Country};
pub use history::{HistoryEntry, HistoryLog};
pub use player::{PendingPurchase, Player};
pub use session::{GameOverReport, GameSession, PhaseReport};
pub use snapshot::GameSnapshot;
pub use state::{CommittedUnit, GameState, PendingBattle};
pub use victory::{CampDomination, EconomicVictory, TurnLimit, VictoryCondition, VictoryRegistry};
pub use wars::WarSet;
