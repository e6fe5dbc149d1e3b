//! Game log queries: filtering and sorting history, recent games, dashboard numbers.

use crate::logic::dates::{is_this_month, is_this_week, is_today};
use crate::models::serde_ext::{empty_as_default, empty_as_none};
use crate::models::{Game, PlayerId};
use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Number of games reported as "closest" by [`aggregate_stats`].
pub const CLOSEST_GAMES: usize = 3;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateFilter {
    Today,
    Week,
    Month,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    /// Newest first.
    #[default]
    DateDesc,
    DateAsc,
}

impl FromStr for DateFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "today" => Ok(DateFilter::Today),
            "week" => Ok(DateFilter::Week),
            "month" => Ok(DateFilter::Month),
            other => Err(format!("unknown date filter {other:?}")),
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "date-desc" => Ok(SortOrder::DateDesc),
            "date-asc" => Ok(SortOrder::DateAsc),
            other => Err(format!("unknown sort order {other:?}")),
        }
    }
}

/// History filter. Every field is optional and they combine with AND.
/// Deserializes from query-string values; an empty value means "not filtered".
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GameFilter {
    #[serde(deserialize_with = "empty_as_none")]
    pub completed: Option<bool>,
    #[serde(deserialize_with = "empty_as_none")]
    pub player_id: Option<PlayerId>,
    #[serde(deserialize_with = "empty_as_none")]
    pub date_filter: Option<DateFilter>,
    /// Case-insensitive substring of either player's name as recorded in the game.
    #[serde(deserialize_with = "empty_as_none")]
    pub search_term: Option<String>,
    #[serde(deserialize_with = "empty_as_default")]
    pub sort_by: SortOrder,
}

/// Dashboard summary over completed games.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStats {
    pub total_games: usize,
    pub games_today: usize,
    pub games_this_week: usize,
    /// Mean of score1 + score2, rounded; 0 without games.
    pub avg_points_per_game: u32,
    pub closest_games: Vec<Game>,
}

fn in_bucket<Tz: TimeZone>(game: &Game, bucket: DateFilter, now: &DateTime<Tz>) -> bool {
    match bucket {
        DateFilter::Today => is_today(&game.created_at, now),
        DateFilter::Week => is_this_week(&game.created_at, now),
        DateFilter::Month => is_this_month(&game.created_at, now),
    }
}

/// Apply `filter` to `games`, date buckets relative to `now`.
pub fn filter_games<Tz: TimeZone>(
    games: Vec<Game>,
    filter: &GameFilter,
    now: &DateTime<Tz>,
) -> Vec<Game> {
    let term = filter
        .search_term
        .as_deref()
        .map(str::to_lowercase)
        .filter(|t| !t.is_empty());

    let mut games: Vec<Game> = games
        .into_iter()
        .filter(|g| filter.completed.map_or(true, |c| g.completed == c))
        .filter(|g| filter.player_id.as_deref().map_or(true, |id| g.involves(id)))
        .filter(|g| filter.date_filter.map_or(true, |d| in_bucket(g, d, now)))
        .filter(|g| {
            term.as_deref().map_or(true, |t| {
                g.player1.name.to_lowercase().contains(t) || g.player2.name.to_lowercase().contains(t)
            })
        })
        .collect();

    match filter.sort_by {
        SortOrder::DateDesc => games.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortOrder::DateAsc => games.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
    }
    games
}

/// Completed games, most recently updated first, at most `limit`.
pub fn recent_games(games: Vec<Game>, limit: usize) -> Vec<Game> {
    let mut games: Vec<Game> = games.into_iter().filter(|g| g.completed).collect();
    games.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    games.truncate(limit);
    games
}

pub fn aggregate_stats<Tz: TimeZone>(games: Vec<Game>, now: &DateTime<Tz>) -> GameStats {
    let games: Vec<Game> = games.into_iter().filter(|g| g.completed).collect();
    let total_games = games.len();
    let games_today = games.iter().filter(|g| is_today(&g.created_at, now)).count();
    let games_this_week = games.iter().filter(|g| is_this_week(&g.created_at, now)).count();

    let total_points: u64 = games.iter().map(|g| u64::from(g.total_points())).sum();
    let avg_points_per_game = match total_games as u64 {
        0 => 0,
        n => ((2 * total_points + n) / (2 * n)) as u32,
    };

    let mut closest_games = games;
    closest_games.sort_by_key(Game::score_difference);
    closest_games.truncate(CLOSEST_GAMES);

    GameStats {
        total_games,
        games_today,
        games_this_week,
        avg_points_per_game,
        closest_games,
    }
}
