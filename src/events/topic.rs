//! Event topics
//!
//! A topic is a namespace, a sub-kind, and optionally a territory key.
//! Equality is structural, so two independently built topics with the same
//! parts address the same subscribers.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::types::TerritoryId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionTopic {
    Purchase,
    Move,
    Attack,
    Diplomacy,
    Mobilize,
    Income,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameTopic {
    PhaseChanged,
    TurnEnded,
    CombatResolved,
    TerritoryCaptured,
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserInteraction {
    SelectToolbar,
    RecenterMap,
    SelectNextPhase,
    SelectPhase,
    EndTurn,
    SelectTerritory(Option<TerritoryId>),
    /// Carries a [`TurnAction`](crate::actions::TurnAction) to perform
    SubmitAction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataRequest {
    Territory(TerritoryId),
    CurrentPhase,
    Snapshot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataResponse {
    Territory(TerritoryId),
    CurrentPhase,
    Snapshot,
}

impl DataRequest {
    /// The topic a request is answered on
    pub fn response(self) -> DataResponse {
        match self {
            DataRequest::Territory(id) => DataResponse::Territory(id),
            DataRequest::CurrentPhase => DataResponse::CurrentPhase,
            DataRequest::Snapshot => DataResponse::Snapshot,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    Action(ActionTopic),
    Game(GameTopic),
    UserInteraction(UserInteraction),
    Territory(TerritoryId),
    Request(DataRequest),
    Response(DataResponse),
}

impl Topic {
    pub fn namespace(&self) -> &'static str {
        match self {
            Topic::Action(_) => "action",
            Topic::Game(_) => "game",
            Topic::UserInteraction(_) => "user_interaction",
            Topic::Territory(_) => "territory",
            Topic::Request(_) => "request",
            Topic::Response(_) => "response",
        }
    }

    /// Territory embedded in the topic, if any
    pub fn key(&self) -> Option<TerritoryId> {
        match self {
            Topic::Territory(id)
            | Topic::Request(DataRequest::Territory(id))
            | Topic::Response(DataResponse::Territory(id))
            | Topic::UserInteraction(UserInteraction::SelectTerritory(Some(id))) => Some(*id),
            _ => None,
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Topic::Action(t) => write!(f, "action/{t:?}"),
            Topic::Game(t) => write!(f, "game/{t:?}"),
            Topic::UserInteraction(t) => write!(f, "user_interaction/{t:?}"),
            Topic::Territory(id) => write!(f, "territory/{}", id.0),
            Topic::Request(r) => write!(f, "request/{r:?}"),
            Topic::Response(r) => write!(f, "response/{r:?}"),
        }
    }
}
