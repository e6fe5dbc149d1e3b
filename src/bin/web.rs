//! Single binary web server: JSON API over the tracker for a dashboard front end.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. Override with env: HOST, PORT.
//! State lives in DATA_DIR (default ./data); SEED_SAMPLE_DATA=1 adds demo players on first run.

use actix_web::{
    delete, get, post, put,
    web::{Data, Json, Path, Query},
    App, HttpResponse, HttpServer, Responder,
};
use pingpong_tracker::{
    Completion, FileStore, GameFilter, NewPlayer, OpenOptions, PlayerId, PlayerSlot,
    PlayerUpdate, SettingsUpdate, Tracker, TrackerError,
};
use serde::Deserialize;
use std::sync::RwLock;

/// One tracker for the whole process; every request runs under this lock.
type AppState = Data<RwLock<Tracker<FileStore>>>;

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StartGameBody {
    player1: Option<PlayerId>,
    player2: Option<PlayerId>,
    points_limit: Option<u32>,
}

#[derive(Deserialize)]
struct ScoreBody {
    player: PlayerSlot,
    score: i64,
}

#[derive(Deserialize)]
struct LimitQuery {
    limit: Option<usize>,
}

/// Path segment: player id (e.g. /api/players/{id})
#[derive(Deserialize)]
struct PlayerPath {
    id: PlayerId,
}

/// Path segment: game id (e.g. /api/games/{id})
#[derive(Deserialize)]
struct GamePath {
    id: pingpong_tracker::GameId,
}

const DEFAULT_LIST_LIMIT: usize = 5;

fn error_response(e: &TrackerError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string() });
    match e {
        TrackerError::EmptyName | TrackerError::InvalidPlayer(_) | TrackerError::TiedScore => {
            HttpResponse::BadRequest().json(body)
        }
        TrackerError::GameAlreadyActive => HttpResponse::Conflict().json(body),
        TrackerError::Storage(_) => HttpResponse::InternalServerError().json(body),
    }
}

fn not_found(what: &str) -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({ "error": format!("No {what}") }))
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "pingpong-tracker",
    })
}

#[get("/api/players")]
async fn api_list_players(state: AppState) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    HttpResponse::Ok().json(g.players())
}

/// Register a player (name required, email optional).
#[post("/api/players")]
async fn api_create_player(state: AppState, body: Json<NewPlayer>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match g.create_player(body.into_inner()) {
        Ok(player) => HttpResponse::Ok().json(player),
        Err(e) => error_response(&e),
    }
}

/// Id/name pairs for player pickers.
#[get("/api/players/selector")]
async fn api_players_selector(state: AppState) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    HttpResponse::Ok().json(g.players_for_selector())
}

#[get("/api/players/{id}")]
async fn api_get_player(state: AppState, path: Path<PlayerPath>) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match g.player(&path.id) {
        Some(player) => HttpResponse::Ok().json(player),
        None => not_found("player"),
    }
}

#[put("/api/players/{id}")]
async fn api_update_player(
    state: AppState,
    path: Path<PlayerPath>,
    body: Json<PlayerUpdate>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match g.update_player(&path.id, body.into_inner()) {
        Ok(Some(player)) => HttpResponse::Ok().json(player),
        Ok(None) => not_found("player"),
        Err(e) => error_response(&e),
    }
}

/// Delete a player. Their past games stay in history.
#[delete("/api/players/{id}")]
async fn api_delete_player(state: AppState, path: Path<PlayerPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match g.delete_player(&path.id) {
        Ok(true) => HttpResponse::NoContent().finish(),
        Ok(false) => not_found("player"),
        Err(e) => error_response(&e),
    }
}

/// Leaderboard position, or null when the player has too few games.
#[get("/api/players/{id}/rank")]
async fn api_player_rank(state: AppState, path: Path<PlayerPath>) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    if g.player(&path.id).is_none() {
        return not_found("player");
    }
    HttpResponse::Ok().json(serde_json::json!({ "rank": g.player_rank(&path.id) }))
}

#[get("/api/leaderboard")]
async fn api_leaderboard(state: AppState, query: Query<LimitQuery>) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    HttpResponse::Ok().json(g.top_players(query.limit.unwrap_or(DEFAULT_LIST_LIMIT)))
}

/// Game history: ?completed=&playerId=&dateFilter=today|week|month&searchTerm=&sortBy=date-asc|date-desc
#[get("/api/games")]
async fn api_filter_games(state: AppState, query: Query<GameFilter>) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    HttpResponse::Ok().json(g.filter_games(&query))
}

#[get("/api/games/recent")]
async fn api_recent_games(state: AppState, query: Query<LimitQuery>) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    HttpResponse::Ok().json(g.recent_games(query.limit.unwrap_or(DEFAULT_LIST_LIMIT)))
}

#[get("/api/games/stats")]
async fn api_game_stats(state: AppState) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    HttpResponse::Ok().json(g.game_stats())
}

#[get("/api/games/{id}")]
async fn api_get_game(state: AppState, path: Path<GamePath>) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match g.game(&path.id) {
        Some(game) => HttpResponse::Ok().json(game),
        None => not_found("game"),
    }
}

/// The game in progress, or null.
#[get("/api/game/current")]
async fn api_current_game(state: AppState) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    HttpResponse::Ok().json(g.current_game())
}

#[post("/api/game/start")]
async fn api_start_game(state: AppState, body: Json<StartGameBody>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match g.start_game(body.player1.as_deref(), body.player2.as_deref(), body.points_limit) {
        Ok(game) => HttpResponse::Ok().json(game),
        Err(e) => error_response(&e),
    }
}

/// Set one side's score: {"player": 1|2, "score": n}.
#[put("/api/game/score")]
async fn api_update_score(state: AppState, body: Json<ScoreBody>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match g.update_score(body.player, body.score) {
        Ok(Some(game)) => HttpResponse::Ok().json(game),
        Ok(None) => not_found("active game"),
        Err(e) => error_response(&e),
    }
}

/// End the game: {"mode": "natural"|"force"} or {"mode": "force_tie_break", "winner": 1|2}.
#[post("/api/game/end")]
async fn api_end_game(state: AppState, body: Option<Json<Completion>>) -> HttpResponse {
    let completion = body.map(Json::into_inner).unwrap_or_default();
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match g.end_game(completion) {
        Ok(outcome) => HttpResponse::Ok().json(outcome),
        Err(e) => error_response(&e),
    }
}

#[post("/api/game/cancel")]
async fn api_cancel_game(state: AppState) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match g.cancel_game() {
        Ok(canceled) => HttpResponse::Ok().json(serde_json::json!({ "canceled": canceled })),
        Err(e) => error_response(&e),
    }
}

#[get("/api/settings")]
async fn api_get_settings(state: AppState) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    HttpResponse::Ok().json(g.settings())
}

#[put("/api/settings")]
async fn api_update_settings(state: AppState, body: Json<SettingsUpdate>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match g.update_settings(body.into_inner()) {
        Ok(settings) => HttpResponse::Ok().json(settings),
        Err(e) => error_response(&e),
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_data_dir() -> String {
    "data".to_string()
}

fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let host = std::env::var("HOST").unwrap_or_else(|_| default_host());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or_else(default_port);
    let data_dir = std::env::var("DATA_DIR").unwrap_or_else(|_| default_data_dir());
    let options = OpenOptions {
        seed_sample_data: env_flag("SEED_SAMPLE_DATA"),
    };

    let tracker = FileStore::open(&data_dir)
        .map_err(TrackerError::from)
        .and_then(|store| Tracker::open(store, options))
        .map_err(|e| std::io::Error::other(format!("failed to load data from {data_dir}: {e}")))?;
    log::info!(
        "Loaded {} player(s) and {} game(s) from {}",
        tracker.players().len(),
        tracker.games().len(),
        data_dir
    );

    let bind = (host.as_str(), port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let state = Data::new(RwLock::new(tracker));

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .service(api_health)
            .service(api_list_players)
            .service(api_create_player)
            .service(api_players_selector)
            .service(api_get_player)
            .service(api_update_player)
            .service(api_delete_player)
            .service(api_player_rank)
            .service(api_leaderboard)
            .service(api_filter_games)
            .service(api_recent_games)
            .service(api_game_stats)
            .service(api_get_game)
            .service(api_current_game)
            .service(api_start_game)
            .service(api_update_score)
            .service(api_end_game)
            .service(api_cancel_game)
            .service(api_get_settings)
            .service(api_update_settings)
    })
    .bind(bind)?
    .run()
    .await
}
