//! Player and PlayerStats data structures.

use crate::models::serde_ext::empty_as_none;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque identifier for a player (used in games and lookups). Records written by the
/// browser app carry short base-36 ids; new ones are UUID strings.
pub type PlayerId = String;

/// Fresh identifier for a player or game.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Derived win/loss record of a player. Recomputable from the game log at any time.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStats {
    pub games_played: u32,
    pub wins: u32,
    pub losses: u32,
    /// Whole percent, rounded half up; 0 when no games were played.
    pub win_percentage: u32,
}

impl PlayerStats {
    /// Build stats from a win count and the number of completed games played.
    pub fn from_counts(wins: u32, games_played: u32) -> Self {
        Self {
            games_played,
            wins,
            losses: games_played.saturating_sub(wins),
            win_percentage: win_percentage(wins, games_played),
        }
    }
}

/// `round(100 * wins / total)`, or 0 for no games.
pub fn win_percentage(wins: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    let (wins, total) = (u64::from(wins), u64::from(total));
    ((200 * wins + total) / (2 * total)) as u32
}

/// A registered player.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    /// The browser app stores "" for no email.
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub stats: PlayerStats,
}

impl Player {
    /// Create a new player with the given name. Stats start at zero.
    pub fn new(name: impl Into<String>, email: Option<String>) -> Self {
        Self {
            id: new_id(),
            name: name.into(),
            email,
            created_at: Utc::now(),
            stats: PlayerStats::default(),
        }
    }

    /// Value copy of id and name, stored in games so history survives renames and deletions.
    pub fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            id: self.id.clone(),
            name: self.name.clone(),
        }
    }
}

/// Player identity as it was when a game started.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub id: PlayerId,
    pub name: String,
}
