//! Game engine: the single in-progress game, its scoring and completion.
//!
//! NoActiveGame -> InProgress -> Completed, or InProgress -> Canceled (record removed).

use crate::logic::players::update_players_after_game;
use crate::models::{Game, PlayerSlot, TrackerError};
use crate::storage::{DataStore, KeyValueStore};
use serde::{Deserialize, Serialize};

/// How hard `end_game` should push for completion.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case", tag = "mode", content = "winner")]
pub enum Completion {
    /// Complete only if a player has won by the rules.
    #[default]
    Natural,
    /// Complete anyway; the higher score wins. Fails on a tie.
    Force,
    /// Complete anyway; the higher score wins, a tie goes to the given slot.
    ForceTieBreak(PlayerSlot),
}

/// Result of an `end_game` call.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "status", content = "game")]
pub enum EndOutcome {
    NoActiveGame,
    /// No winner yet and completion was not forced; the game continues.
    InProgress(Game),
    Completed(Game),
}

/// Owns the active-game slot. At most one game is in progress at a time.
#[derive(Clone, Debug, Default)]
pub struct GameEngine {
    current: Option<Game>,
}

impl GameEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_game(&self) -> Option<&Game> {
        self.current.as_ref()
    }

    pub fn has_active_game(&self) -> bool {
        self.current.is_some()
    }

    /// Adopt the most recently created incomplete game from the log, if any.
    pub fn resume<S: KeyValueStore>(&mut self, store: &DataStore<S>) -> Option<&Game> {
        let latest = store
            .games()
            .into_iter()
            .filter(|g| !g.completed)
            .max_by_key(|g| g.created_at);
        if let Some(game) = &latest {
            log::info!(
                "Resuming game {} ({} vs {}, {}-{})",
                game.id,
                game.player1.name,
                game.player2.name,
                game.score1,
                game.score2
            );
        }
        self.current = latest;
        self.current.as_ref()
    }

    /// Start a 0-0 game between two registered players. Callers check that the two ids differ.
    /// A `points_limit` of None or 0 uses the default game type from settings.
    pub fn start_game<S: KeyValueStore>(
        &mut self,
        store: &mut DataStore<S>,
        player1_id: &str,
        player2_id: &str,
        points_limit: Option<u32>,
    ) -> Result<&Game, TrackerError> {
        if self.current.is_some() {
            return Err(TrackerError::GameAlreadyActive);
        }
        let player1 = store
            .player_by_id(player1_id)
            .ok_or_else(|| TrackerError::InvalidPlayer(format!("unknown player {player1_id}")))?;
        let player2 = store
            .player_by_id(player2_id)
            .ok_or_else(|| TrackerError::InvalidPlayer(format!("unknown player {player2_id}")))?;
        let points_limit = points_limit
            .filter(|p| *p > 0)
            .unwrap_or_else(|| store.settings().default_game_type);

        let game = store.add_game(Game::new(player1.snapshot(), player2.snapshot(), points_limit))?;
        log::info!(
            "Started game {}: {} vs {} to {}",
            game.id,
            game.player1.name,
            game.player2.name,
            game.points_limit
        );
        Ok(&*self.current.insert(game))
    }

    /// Set one side's score (negative clamps to 0). Score and winner are stored together.
    /// Ok(None) if there is no active game.
    pub fn update_score<S: KeyValueStore>(
        &mut self,
        store: &mut DataStore<S>,
        slot: PlayerSlot,
        score: i64,
    ) -> Result<Option<&Game>, TrackerError> {
        let Some(current) = &self.current else {
            return Ok(None);
        };
        let score = u32::try_from(score.max(0)).unwrap_or(u32::MAX);
        let id = current.id.clone();
        let updated = store.update_game(&id, |g| {
            g.set_score(slot, score);
            g.winner = g.determine_winner();
        })?;
        match updated {
            Some(game) => Ok(Some(&*self.current.insert(game))),
            None => {
                log::warn!("Active game {} is missing from storage; clearing it", id);
                self.current = None;
                Ok(None)
            }
        }
    }

    /// Complete the active game if it has a winner, or if completion is forced.
    pub fn end_game<S: KeyValueStore>(
        &mut self,
        store: &mut DataStore<S>,
        completion: Completion,
    ) -> Result<EndOutcome, TrackerError> {
        let Some(current) = &self.current else {
            return Ok(EndOutcome::NoActiveGame);
        };

        let winner = match current.winner.clone().or_else(|| current.determine_winner()) {
            Some(winner) => winner,
            None => {
                let slot = match (completion, current.leader()) {
                    (Completion::Natural, _) => {
                        return Ok(EndOutcome::InProgress(current.clone()));
                    }
                    (_, Some(leader)) => leader,
                    (Completion::ForceTieBreak(slot), None) => slot,
                    (Completion::Force, None) => return Err(TrackerError::TiedScore),
                };
                current.player(slot).id.clone()
            }
        };

        let id = current.id.clone();
        let completed = store.update_game(&id, |g| {
            g.completed = true;
            g.winner = Some(winner);
        })?;
        self.current = None;
        let Some(game) = completed else {
            log::warn!("Active game {} is missing from storage; clearing it", id);
            return Ok(EndOutcome::NoActiveGame);
        };
        log::info!(
            "Completed game {}: {} {}-{} {}",
            game.id,
            game.player1.name,
            game.score1,
            game.score2,
            game.player2.name
        );

        // The game is already final; stats are re-derived on the next load if this fails.
        if let Err(e) = update_players_after_game(store, &game.player1.id, &game.player2.id) {
            log::error!("Failed to update stats after game {}: {}", game.id, e);
        }
        Ok(EndOutcome::Completed(game))
    }

    /// Discard the active game entirely. Ok(false) when there is nothing to cancel.
    pub fn cancel_game<S: KeyValueStore>(
        &mut self,
        store: &mut DataStore<S>,
    ) -> Result<bool, TrackerError> {
        let Some(current) = &self.current else {
            log::info!("No active game to cancel");
            return Ok(false);
        };
        let id = current.id.clone();
        store.delete_game(&id)?;
        self.current = None;
        log::info!("Canceled game {}", id);
        Ok(true)
    }
}
