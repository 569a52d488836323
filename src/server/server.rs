use anyhow::Result;
use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use tracing::info;

use crate::catalog::LevelCatalog;
use crate::checker;
use crate::game_store::{schema_map, QueryRow, SqliteGameStore};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::{log_requests, state::*, ServerConfig};

#[derive(Serialize)]
struct ServerStats {
    pub uptime: String,
    pub levels: usize,
}

fn format_uptime(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

#[derive(Deserialize, Debug)]
struct ExecuteQueryBody {
    /// Missing and empty query text are treated the same: a 400 without
    /// ever calling the engine.
    #[serde(default)]
    pub query: String,
    #[serde(rename = "levelId")]
    pub level_id: Option<u32>,
}

#[derive(Serialize)]
struct ExecuteQuerySuccess {
    results: Vec<QueryRow>,
    /// Pass/fail verdict for the submitted level, when the level id is
    /// known. Additive field; the original game computed this client-side.
    #[serde(skip_serializing_if = "Option::is_none")]
    passed: Option<bool>,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

async fn home(State(state): State<ServerState>) -> impl IntoResponse {
    let stats = ServerStats {
        uptime: format_uptime(state.start_time.elapsed()),
        levels: state.level_catalog.len(),
    };
    Json(stats)
}

async fn get_levels(State(catalog): State<GuardedLevelCatalog>) -> Response {
    Json(serde_json::json!({ "levels": catalog.levels() })).into_response()
}

async fn get_level(
    State(catalog): State<GuardedLevelCatalog>,
    Path(id): Path<u32>,
) -> Response {
    match catalog.get(id) {
        Some(level) => Json(level.clone()).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn get_schema() -> Response {
    let mut schema = serde_json::Map::new();
    for (table, columns) in schema_map() {
        schema.insert(table.to_string(), serde_json::json!(columns));
    }
    Json(serde_json::json!({ "schema": schema })).into_response()
}

async fn execute_query(
    State(state): State<ServerState>,
    Json(body): Json<ExecuteQueryBody>,
) -> Response {
    match state.game_store.execute_query(&body.query) {
        Ok(results) => {
            let passed = body
                .level_id
                .and_then(|id| state.level_catalog.get(id))
                .map(|level| checker::is_correct(&body.query, &level.solution, results.len()));
            Json(ExecuteQuerySuccess { results, passed }).into_response()
        }
        // Both EmptyQuery and Engine errors are client errors.
        Err(err) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: err.to_string(),
            }),
        )
            .into_response(),
    }
}

impl ServerState {
    fn new(
        config: ServerConfig,
        game_store: Arc<SqliteGameStore>,
        level_catalog: Arc<LevelCatalog>,
    ) -> ServerState {
        ServerState {
            config,
            start_time: Instant::now(),
            game_store,
            level_catalog,
        }
    }
}

pub fn make_app(
    config: ServerConfig,
    game_store: Arc<SqliteGameStore>,
    level_catalog: Arc<LevelCatalog>,
) -> Router {
    let state = ServerState::new(config.clone(), game_store, level_catalog);

    let api_routes: Router = Router::new()
        .route("/levels", get(get_levels))
        .route("/levels/{id}", get(get_level))
        .route("/schema", get(get_schema))
        .route("/execute-query", post(execute_query))
        .with_state(state.clone());

    let home_router: Router = match config.frontend_dir_path {
        Some(frontend_path) => {
            let static_files_service =
                ServeDir::new(frontend_path).append_index_html_on_directories(true);
            Router::new().fallback_service(static_files_service)
        }
        None => Router::new()
            .route("/", get(home))
            .with_state(state.clone()),
    };

    home_router
        .nest("/api", api_routes)
        // The game client may be served from anywhere; the original
        // allowed all origins.
        .layer(CorsLayer::permissive())
        .layer(middleware::from_fn_with_state(state, log_requests))
}

pub async fn run_server(
    game_store: Arc<SqliteGameStore>,
    level_catalog: Arc<LevelCatalog>,
    requests_logging_level: super::RequestsLoggingLevel,
    port: u16,
    frontend_dir_path: Option<String>,
) -> Result<()> {
    let config = ServerConfig {
        requests_logging_level,
        port,
        frontend_dir_path,
    };
    let app = make_app(config, game_store, level_catalog);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;
    info!("Ready to serve at port {}!", port);

    Ok(axum::serve(listener, app).await?)
}
