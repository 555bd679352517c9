//! Error types for ScriptStylist.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid character name: {0:?}")]
    InvalidName(String),

    #[error("Character already exists: {0}")]
    DuplicateCharacter(String),

    #[error("Character not found: {0}")]
    CharacterNotFound(String),

    #[error("Invalid confidence for {name}: {value}")]
    InvalidConfidence { name: String, value: f64 },

    #[error("Invalid discovery response: {0}")]
    InvalidDiscoveryResponse(String),

    #[error("Discovery error: {0}")]
    Discovery(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
