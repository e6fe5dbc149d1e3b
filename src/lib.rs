//! Ping-pong tracker: library with models, storage and game/statistics logic.

pub mod logic;
pub mod models;
pub mod storage;
pub mod tracker;

pub use logic::{
    Completion, DateFilter, EndOutcome, GameEngine, GameFilter, GameStats, NewPlayer,
    PlayerUpdate, SortOrder, MIN_RANKED_GAMES,
};
pub use models::{
    Game, GameId, Player, PlayerId, PlayerSlot, PlayerSnapshot, PlayerStats, Settings,
    SettingsUpdate, StorageError, TrackerError, DEFAULT_POINTS_LIMIT,
};
pub use storage::{DataStore, FileStore, KeyValueStore, MemoryStore};
pub use tracker::{OpenOptions, Tracker};
