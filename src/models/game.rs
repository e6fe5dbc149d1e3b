//! Game record and PlayerSlot.

use crate::models::player::{new_id, PlayerId, PlayerSnapshot};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque identifier for a game.
pub type GameId = String;

/// Score needed to win when nothing else is configured.
pub const DEFAULT_POINTS_LIMIT: u32 = 11;

/// Minimum lead required to win once the points limit is reached.
pub const WINNING_MARGIN: u32 = 2;

/// Which side of a game: player 1 / score 1 or player 2 / score 2.
/// Serialized as the integer 1 or 2.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum PlayerSlot {
    One,
    Two,
}

impl TryFrom<u8> for PlayerSlot {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(PlayerSlot::One),
            2 => Ok(PlayerSlot::Two),
            other => Err(format!("player slot must be 1 or 2, got {other}")),
        }
    }
}

impl From<PlayerSlot> for u8 {
    fn from(slot: PlayerSlot) -> Self {
        match slot {
            PlayerSlot::One => 1,
            PlayerSlot::Two => 2,
        }
    }
}

/// A single game between two players.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    pub id: GameId,
    pub player1: PlayerSnapshot,
    pub player2: PlayerSnapshot,
    pub score1: u32,
    pub score2: u32,
    pub points_limit: u32,
    /// None until a win condition is reached (or the game is force-completed).
    #[serde(default)]
    pub winner: Option<PlayerId>,
    #[serde(default)]
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Game {
    /// A fresh 0-0 game between two snapshots.
    pub fn new(player1: PlayerSnapshot, player2: PlayerSnapshot, points_limit: u32) -> Self {
        let now = Utc::now();
        Self {
            id: new_id(),
            player1,
            player2,
            score1: 0,
            score2: 0,
            points_limit,
            winner: None,
            completed: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn player(&self, slot: PlayerSlot) -> &PlayerSnapshot {
        match slot {
            PlayerSlot::One => &self.player1,
            PlayerSlot::Two => &self.player2,
        }
    }

    pub fn score(&self, slot: PlayerSlot) -> u32 {
        match slot {
            PlayerSlot::One => self.score1,
            PlayerSlot::Two => self.score2,
        }
    }

    pub fn set_score(&mut self, slot: PlayerSlot, score: u32) {
        match slot {
            PlayerSlot::One => self.score1 = score,
            PlayerSlot::Two => self.score2 = score,
        }
    }

    /// Whether the player took part in this game, in either slot.
    pub fn involves(&self, player_id: &str) -> bool {
        self.player1.id == player_id || self.player2.id == player_id
    }

    pub fn score_difference(&self) -> u32 {
        self.score1.abs_diff(self.score2)
    }

    pub fn total_points(&self) -> u32 {
        self.score1 + self.score2
    }

    /// Slot with the strictly higher score, None on a tie.
    pub fn leader(&self) -> Option<PlayerSlot> {
        match self.score1.cmp(&self.score2) {
            std::cmp::Ordering::Greater => Some(PlayerSlot::One),
            std::cmp::Ordering::Less => Some(PlayerSlot::Two),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// Winner by the rules: reached the points limit with a lead of at least two.
    pub fn determine_winner(&self) -> Option<PlayerId> {
        if self.score_difference() < WINNING_MARGIN {
            return None;
        }
        if self.score1 >= self.points_limit {
            Some(self.player1.id.clone())
        } else if self.score2 >= self.points_limit {
            Some(self.player2.id.clone())
        } else {
            None
        }
    }
}
