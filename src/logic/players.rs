//! Player registry: CRUD over the roster and statistics derived from the game log.

use crate::models::serde_ext::empty_as_none;
use crate::models::{Game, Player, PlayerSnapshot, PlayerStats, TrackerError};
use crate::storage::{DataStore, KeyValueStore};
use serde::Deserialize;

/// Players need at least this many completed games to appear on the leaderboard.
pub const MIN_RANKED_GAMES: u32 = 3;

/// Registration form.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct NewPlayer {
    pub name: String,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub email: Option<String>,
}

/// Edit form; absent fields are left as they are. A blank email clears it.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct PlayerUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
}

fn normalize_email(email: Option<String>) -> Option<String> {
    email
        .map(|e| e.trim().to_string())
        .filter(|e| !e.is_empty())
}

/// Register a player. Name is trimmed and must not be empty.
pub fn create_player<S: KeyValueStore>(
    store: &mut DataStore<S>,
    new_player: NewPlayer,
) -> Result<Player, TrackerError> {
    let name = new_player.name.trim();
    if name.is_empty() {
        return Err(TrackerError::EmptyName);
    }
    let player = store.add_player(Player::new(name, normalize_email(new_player.email)))?;
    log::info!("Registered player {} ({})", player.name, player.id);
    Ok(player)
}

pub fn get_player<S: KeyValueStore>(store: &DataStore<S>, id: &str) -> Option<Player> {
    store.player_by_id(id)
}

pub fn all_players<S: KeyValueStore>(store: &DataStore<S>) -> Vec<Player> {
    store.players()
}

/// Id and name of every player, for pickers.
pub fn players_for_selector<S: KeyValueStore>(store: &DataStore<S>) -> Vec<PlayerSnapshot> {
    store.players().iter().map(Player::snapshot).collect()
}

/// Edit name and/or email. Ok(None) if no such player.
pub fn update_player<S: KeyValueStore>(
    store: &mut DataStore<S>,
    id: &str,
    update: PlayerUpdate,
) -> Result<Option<Player>, TrackerError> {
    let name = match update.name {
        Some(name) => {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(TrackerError::EmptyName);
            }
            Some(name)
        }
        None => None,
    };
    let email = update.email.map(|e| normalize_email(Some(e)));
    let updated = store.update_player(id, |p| {
        if let Some(name) = name {
            p.name = name;
        }
        if let Some(email) = email {
            p.email = email;
        }
    })?;
    Ok(updated)
}

/// Remove a player from the roster. Their games stay in the log.
pub fn delete_player<S: KeyValueStore>(
    store: &mut DataStore<S>,
    id: &str,
) -> Result<bool, TrackerError> {
    let deleted = store.delete_player(id)?;
    if deleted {
        log::info!("Deleted player {}", id);
    }
    Ok(deleted)
}

/// Full scan: completed games the player took part in, and how many of them they won.
pub fn calculate_player_stats(games: &[Game], player_id: &str) -> PlayerStats {
    let (played, wins) = games
        .iter()
        .filter(|g| g.completed && g.involves(player_id))
        .fold((0u32, 0u32), |(played, wins), g| {
            let won = g.winner.as_deref() == Some(player_id);
            (played + 1, wins + u32::from(won))
        });
    PlayerStats::from_counts(wins, played)
}

/// Recompute and store one player's stats. Ok(None) if the player is not registered.
pub fn recompute_stats<S: KeyValueStore>(
    store: &mut DataStore<S>,
    player_id: &str,
) -> Result<Option<PlayerStats>, TrackerError> {
    let stats = calculate_player_stats(&store.load_games()?, player_id);
    let updated = store.update_player(player_id, |p| p.stats = stats)?;
    Ok(updated.map(|p| p.stats))
}

/// Refresh both participants after a game completes.
pub fn update_players_after_game<S: KeyValueStore>(
    store: &mut DataStore<S>,
    player1: &str,
    player2: &str,
) -> Result<(), TrackerError> {
    recompute_stats(store, player1)?;
    recompute_stats(store, player2)?;
    Ok(())
}

/// Recompute every registered player's stats from the log; one roster write.
/// Fails without writing if either document cannot be loaded.
pub fn recompute_all_stats<S: KeyValueStore>(store: &mut DataStore<S>) -> Result<(), TrackerError> {
    let games = store.load_games()?;
    store.update_players(|players| {
        for player in players {
            player.stats = calculate_player_stats(&games, &player.id);
        }
    })?;
    Ok(())
}

/// Players with at least `min_games` completed games, best win percentage first;
/// ties go to whoever played more.
pub fn rank_players(players: &[Player], min_games: u32) -> Vec<Player> {
    let mut ranked: Vec<Player> = players
        .iter()
        .filter(|p| p.stats.games_played >= min_games)
        .cloned()
        .collect();
    ranked.sort_by(|a, b| {
        b.stats
            .win_percentage
            .cmp(&a.stats.win_percentage)
            .then(b.stats.games_played.cmp(&a.stats.games_played))
    });
    ranked
}

/// Leaderboard: the first `limit` ranked players.
pub fn top_players<S: KeyValueStore>(store: &DataStore<S>, limit: usize) -> Vec<Player> {
    let mut ranked = rank_players(&store.players(), MIN_RANKED_GAMES);
    ranked.truncate(limit);
    ranked
}

/// 1-based leaderboard position; None when the player is unranked or unknown.
pub fn player_rank<S: KeyValueStore>(store: &DataStore<S>, player_id: &str) -> Option<usize> {
    rank_players(&store.players(), MIN_RANKED_GAMES)
        .iter()
        .position(|p| p.id == player_id)
        .map(|i| i + 1)
}
