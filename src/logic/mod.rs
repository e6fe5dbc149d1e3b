//! Tracker business logic: player registry, game engine, game log queries.

pub mod dates;
pub mod engine;
pub mod players;
pub mod query;

pub use engine::{Completion, EndOutcome, GameEngine};
pub use players::{
    calculate_player_stats, create_player, delete_player, player_rank, players_for_selector,
    rank_players, recompute_all_stats, recompute_stats, top_players, update_player,
    update_players_after_game, NewPlayer, PlayerUpdate, MIN_RANKED_GAMES,
};
pub use query::{
    aggregate_stats, filter_games, recent_games, DateFilter, GameFilter, GameStats, SortOrder,
};
