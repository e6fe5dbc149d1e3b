//! Tracker: storage plus the active-game engine, one method per user intent.

use crate::logic::{self, Completion, EndOutcome, GameEngine, GameFilter, GameStats, NewPlayer, PlayerUpdate};
use crate::models::{
    Game, Player, PlayerSlot, PlayerSnapshot, PlayerStats, Settings,
    SettingsUpdate, TrackerError,
};
use crate::storage::{DataStore, KeyValueStore};
use chrono::Local;

/// A player picker's value; blank means nothing was picked.
fn selected(id: Option<&str>) -> Option<&str> {
    id.map(str::trim).filter(|id| !id.is_empty())
}

/// Start-up behaviour for [`Tracker::open`].
#[derive(Clone, Copy, Debug, Default)]
pub struct OpenOptions {
    /// Populate demo players and games when the roster is empty.
    pub seed_sample_data: bool,
}

pub struct Tracker<S> {
    store: DataStore<S>,
    engine: GameEngine,
}

impl<S: KeyValueStore> Tracker<S> {
    /// Load state: write missing default documents, optionally seed demo data, recompute all
    /// player stats from the log, and resume an unfinished game. A stored document that cannot
    /// be parsed is left untouched; the stats pass is skipped and logged instead.
    pub fn open(kv: S, options: OpenOptions) -> Result<Self, TrackerError> {
        let mut tracker = Self {
            store: DataStore::new(kv),
            engine: GameEngine::new(),
        };
        tracker.store.init()?;
        let roster_empty = matches!(tracker.store.load_players(), Ok(players) if players.is_empty());
        if options.seed_sample_data && roster_empty {
            log::info!("Creating sample players...");
            tracker.seed_sample_data()?;
        }
        if let Err(e) = logic::recompute_all_stats(&mut tracker.store) {
            log::error!("Skipping stats recomputation on load: {}", e);
        }
        tracker.engine.resume(&tracker.store);
        Ok(tracker)
    }

    fn seed_sample_data(&mut self) -> Result<(), TrackerError> {
        let samples = [
            ("Alice", "alice@example.com"),
            ("Bob", "bob@example.com"),
            ("Charlie", "charlie@example.com"),
            ("Diana", "diana@example.com"),
        ];
        let mut ids = Vec::with_capacity(samples.len());
        for (name, email) in samples {
            let player = self.create_player(NewPlayer {
                name: name.to_string(),
                email: Some(email.to_string()),
            })?;
            ids.push(player.id);
        }

        let games = [
            (0, 1, 11, 5, 11),
            (2, 3, 9, 11, 11),
            (0, 2, 21, 19, 21),
            (1, 3, 11, 7, 11),
            (0, 3, 8, 11, 11),
        ];
        for (p1, p2, score1, score2, points_limit) in games {
            self.engine
                .start_game(&mut self.store, &ids[p1], &ids[p2], Some(points_limit))?;
            self.engine.update_score(&mut self.store, PlayerSlot::One, score1)?;
            self.engine.update_score(&mut self.store, PlayerSlot::Two, score2)?;
            self.engine.end_game(&mut self.store, Completion::Force)?;
        }
        Ok(())
    }

    // Players

    pub fn create_player(&mut self, new_player: NewPlayer) -> Result<Player, TrackerError> {
        logic::create_player(&mut self.store, new_player)
    }

    pub fn player(&self, id: &str) -> Option<Player> {
        logic::players::get_player(&self.store, id)
    }

    pub fn players(&self) -> Vec<Player> {
        logic::players::all_players(&self.store)
    }

    pub fn players_for_selector(&self) -> Vec<PlayerSnapshot> {
        logic::players_for_selector(&self.store)
    }

    pub fn update_player(
        &mut self,
        id: &str,
        update: PlayerUpdate,
    ) -> Result<Option<Player>, TrackerError> {
        logic::update_player(&mut self.store, id, update)
    }

    pub fn delete_player(&mut self, id: &str) -> Result<bool, TrackerError> {
        logic::delete_player(&mut self.store, id)
    }

    pub fn recompute_stats(&mut self, id: &str) -> Result<Option<PlayerStats>, TrackerError> {
        logic::recompute_stats(&mut self.store, id)
    }

    pub fn recompute_all_stats(&mut self) -> Result<(), TrackerError> {
        logic::recompute_all_stats(&mut self.store)
    }

    pub fn top_players(&self, limit: usize) -> Vec<Player> {
        logic::top_players(&self.store, limit)
    }

    pub fn player_rank(&self, id: &str) -> Option<usize> {
        logic::player_rank(&self.store, id)
    }

    // Active game

    /// Start a game. Both players must be selected (a blank id counts as unselected) and distinct.
    pub fn start_game(
        &mut self,
        player1: Option<&str>,
        player2: Option<&str>,
        points_limit: Option<u32>,
    ) -> Result<&Game, TrackerError> {
        let (Some(player1), Some(player2)) = (selected(player1), selected(player2)) else {
            return Err(TrackerError::InvalidPlayer("please select both players".to_string()));
        };
        if player1 == player2 {
            return Err(TrackerError::InvalidPlayer("please select different players".to_string()));
        }
        self.engine
            .start_game(&mut self.store, player1, player2, points_limit)
    }

    pub fn update_score(&mut self, slot: PlayerSlot, score: i64) -> Result<Option<&Game>, TrackerError> {
        self.engine.update_score(&mut self.store, slot, score)
    }

    pub fn end_game(&mut self, completion: Completion) -> Result<EndOutcome, TrackerError> {
        self.engine.end_game(&mut self.store, completion)
    }

    pub fn cancel_game(&mut self) -> Result<bool, TrackerError> {
        self.engine.cancel_game(&mut self.store)
    }

    pub fn current_game(&self) -> Option<&Game> {
        self.engine.current_game()
    }

    pub fn has_active_game(&self) -> bool {
        self.engine.has_active_game()
    }

    // Game log

    pub fn games(&self) -> Vec<Game> {
        self.store.games()
    }

    pub fn game(&self, id: &str) -> Option<Game> {
        self.store.game_by_id(id)
    }

    /// Filter history with date buckets relative to the local clock.
    pub fn filter_games(&self, filter: &GameFilter) -> Vec<Game> {
        logic::filter_games(self.store.games(), filter, &Local::now())
    }

    pub fn recent_games(&self, limit: usize) -> Vec<Game> {
        logic::recent_games(self.store.games(), limit)
    }

    pub fn game_stats(&self) -> GameStats {
        logic::aggregate_stats(self.store.games(), &Local::now())
    }

    // Settings

    pub fn settings(&self) -> Settings {
        self.store.settings()
    }

    pub fn update_settings(&mut self, update: SettingsUpdate) -> Result<Settings, TrackerError> {
        Ok(self.store.update_settings(update)?)
    }
}
