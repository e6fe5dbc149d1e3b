//! Data structures for the tracker: players, games, settings, errors.

mod error;
mod game;
mod player;
pub(crate) mod serde_ext;
mod settings;

pub use error::{StorageError, TrackerError};
pub use game::{Game, GameId, PlayerSlot, DEFAULT_POINTS_LIMIT, WINNING_MARGIN};
pub use player::{new_id, win_percentage, Player, PlayerId, PlayerSnapshot, PlayerStats};
pub use settings::{Settings, SettingsUpdate};
