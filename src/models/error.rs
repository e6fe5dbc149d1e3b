//! Error types for tracker and storage operations.

use thiserror::Error;

/// Failure reading or writing the key-value store.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Errors a tracker operation can report to its caller. Unknown ids are not errors;
/// lookups and updates return `Option` instead.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// Player name is empty after trimming.
    #[error("Please enter a player name")]
    EmptyName,
    /// A selected player is missing, unknown, or selected for both sides.
    #[error("Invalid players selected: {0}")]
    InvalidPlayer(String),
    /// A game is already in progress; finish or cancel it first.
    #[error("A game is already in progress")]
    GameAlreadyActive,
    /// Forced completion of a level game needs an explicit winner.
    #[error("Scores are tied; choose a winner to end the game")]
    TiedScore,
    #[error(transparent)]
    Storage(#[from] StorageError),
}
