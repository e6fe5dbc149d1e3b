//! Typed adapter over a [`KeyValueStore`]: players, games and settings documents.

use super::KeyValueStore;
use crate::models::{Game, Player, Settings, SettingsUpdate, StorageError};
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;

pub const PLAYERS_KEY: &str = "pingpong_players";
pub const GAMES_KEY: &str = "pingpong_games";
pub const SETTINGS_KEY: &str = "pingpong_settings";

/// Read-only accessors fall back to defaults (absent key, unreadable or unparseable data is
/// logged). Every write first loads its document strictly, so a document that cannot be parsed
/// is never replaced; the operation fails and the stored text stays as it was.
#[derive(Debug)]
pub struct DataStore<S> {
    kv: S,
}

impl<S: KeyValueStore> DataStore<S> {
    pub fn new(kv: S) -> Self {
        Self { kv }
    }

    pub fn inner(&self) -> &S {
        &self.kv
    }

    /// Write default documents for any key that has never been stored.
    /// Present but unparseable documents are left alone.
    pub fn init(&mut self) -> Result<(), StorageError> {
        if self.kv.get(PLAYERS_KEY)?.is_none() {
            self.write(PLAYERS_KEY, &Vec::<Player>::new())?;
        }
        if self.kv.get(GAMES_KEY)?.is_none() {
            self.write(GAMES_KEY, &Vec::<Game>::new())?;
        }
        if self.kv.get(SETTINGS_KEY)?.is_none() {
            self.write(SETTINGS_KEY, &Settings::default())?;
        }
        Ok(())
    }

    /// Absent key gives the default; unreadable or unparseable data is an error.
    fn read_strict<T: DeserializeOwned>(
        &self,
        key: &str,
        default: impl FnOnce() -> T,
    ) -> Result<T, StorageError> {
        let result = match self.kv.get(key) {
            Ok(Some(text)) => serde_json::from_str(&text).map_err(StorageError::from),
            Ok(None) => Ok(default()),
            Err(e) => Err(e),
        };
        if let Err(e) = &result {
            log::error!("Error loading data for key {}: {}", key, e);
        }
        result
    }

    fn read_or<T: DeserializeOwned>(&self, key: &str, default: impl Fn() -> T) -> T {
        self.read_strict(key, &default).unwrap_or_else(|_| default())
    }

    fn write<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> Result<(), StorageError> {
        let result = serde_json::to_string(value)
            .map_err(StorageError::from)
            .and_then(|text| self.kv.set(key, text));
        if let Err(e) = &result {
            log::error!("Error saving data for key {}: {}", key, e);
        }
        result
    }

    // Players

    pub fn players(&self) -> Vec<Player> {
        self.read_or(PLAYERS_KEY, Vec::new)
    }

    /// The roster, failing instead of defaulting when the stored document is unusable.
    pub fn load_players(&self) -> Result<Vec<Player>, StorageError> {
        self.read_strict(PLAYERS_KEY, Vec::new)
    }

    pub fn player_by_id(&self, id: &str) -> Option<Player> {
        self.players().into_iter().find(|p| p.id == id)
    }

    pub fn add_player(&mut self, player: Player) -> Result<Player, StorageError> {
        let mut players = self.load_players()?;
        players.push(player.clone());
        self.write(PLAYERS_KEY, &players)?;
        Ok(player)
    }

    /// Apply `f` to the player with `id` and store the result. Ok(None) if not found.
    pub fn update_player(
        &mut self,
        id: &str,
        f: impl FnOnce(&mut Player),
    ) -> Result<Option<Player>, StorageError> {
        let mut players = self.load_players()?;
        let Some(player) = players.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        f(player);
        let updated = player.clone();
        self.write(PLAYERS_KEY, &players)?;
        Ok(Some(updated))
    }

    /// Apply `f` to the whole roster and store it in one write.
    pub fn update_players(&mut self, f: impl FnOnce(&mut [Player])) -> Result<(), StorageError> {
        let mut players = self.load_players()?;
        f(&mut players);
        self.write(PLAYERS_KEY, &players)
    }

    pub fn delete_player(&mut self, id: &str) -> Result<bool, StorageError> {
        let mut players = self.load_players()?;
        let before = players.len();
        players.retain(|p| p.id != id);
        if players.len() == before {
            return Ok(false);
        }
        self.write(PLAYERS_KEY, &players)?;
        Ok(true)
    }

    // Games

    pub fn games(&self) -> Vec<Game> {
        self.read_or(GAMES_KEY, Vec::new)
    }

    /// The game log, failing instead of defaulting when the stored document is unusable.
    pub fn load_games(&self) -> Result<Vec<Game>, StorageError> {
        self.read_strict(GAMES_KEY, Vec::new)
    }

    pub fn game_by_id(&self, id: &str) -> Option<Game> {
        self.games().into_iter().find(|g| g.id == id)
    }

    pub fn add_game(&mut self, game: Game) -> Result<Game, StorageError> {
        let mut games = self.load_games()?;
        games.push(game.clone());
        self.write(GAMES_KEY, &games)?;
        Ok(game)
    }

    /// Apply `f` to the game with `id`, refresh `updated_at` and store it. Ok(None) if not found.
    pub fn update_game(
        &mut self,
        id: &str,
        f: impl FnOnce(&mut Game),
    ) -> Result<Option<Game>, StorageError> {
        let mut games = self.load_games()?;
        let Some(game) = games.iter_mut().find(|g| g.id == id) else {
            return Ok(None);
        };
        f(game);
        game.updated_at = Utc::now();
        let updated = game.clone();
        self.write(GAMES_KEY, &games)?;
        Ok(Some(updated))
    }

    pub fn delete_game(&mut self, id: &str) -> Result<bool, StorageError> {
        let mut games = self.load_games()?;
        let before = games.len();
        games.retain(|g| g.id != id);
        if games.len() == before {
            return Ok(false);
        }
        self.write(GAMES_KEY, &games)?;
        Ok(true)
    }

    // Settings

    pub fn settings(&self) -> Settings {
        self.read_or(SETTINGS_KEY, Settings::default)
    }

    pub fn update_settings(&mut self, update: SettingsUpdate) -> Result<Settings, StorageError> {
        let mut settings = self.read_strict(SETTINGS_KEY, Settings::default)?;
        settings.apply(update);
        self.write(SETTINGS_KEY, &settings)?;
        Ok(settings)
    }
}
