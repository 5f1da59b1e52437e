use thiserror::Error;

use crate::core::types::{PlayerId, TerritoryId};

#[derive(Error, Debug)]
pub enum ConquestError {
    #[error("Territory not found: {0}")]
    TerritoryNotFound(TerritoryId),

    #[error("No territory named {0:?}")]
    TerritoryNameNotFound(String),

    #[error("Player not found: {0}")]
    PlayerNotFound(PlayerId),

    #[error("Duplicate territory id: {0}")]
    DuplicateTerritory(TerritoryId),

    #[error("Duplicate territory name: {0:?}")]
    DuplicateTerritoryName(String),

    #[error("{from} lists unknown neighbour {to}")]
    DanglingAdjacency { from: TerritoryId, to: TerritoryId },

    #[error("Adjacency is not symmetric: {from} lists {to} but not the reverse")]
    AsymmetricAdjacency { from: TerritoryId, to: TerritoryId },

    #[error("Ownership bookkeeping disagrees for {0}")]
    OwnershipMismatch(TerritoryId),

    #[error("Inconsistent game state: {0}")]
    InconsistentState(String),

    #[error("Country {0} already has a player")]
    DuplicateCountry(String),

    #[error("Invalid rules config: {0}")]
    InvalidConfig(String),

    #[error("Victory condition {0:?} is already registered")]
    DuplicateVictoryCondition(String),

    #[error("Victory condition {plugin:?} depends on unregistered {dependency:?}")]
    UnknownVictoryDependency { plugin: String, dependency: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, ConquestError>;
