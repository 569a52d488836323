use axum::extract::FromRef;

use crate::catalog::LevelCatalog;
use crate::game_store::SqliteGameStore;
use std::sync::Arc;
use std::time::Instant;

use super::ServerConfig;

pub type GuardedGameStore = Arc<SqliteGameStore>;
pub type GuardedLevelCatalog = Arc<LevelCatalog>;

#[derive(Clone)]
pub struct ServerState {
    pub config: ServerConfig,
    pub start_time: Instant,
    pub game_store: GuardedGameStore,
    pub level_catalog: GuardedLevelCatalog,
}

impl FromRef<ServerState> for GuardedGameStore {
    fn from_ref(input: &ServerState) -> Self {
        input.game_store.clone()
    }
}

impl FromRef<ServerState> for GuardedLevelCatalog {
    fn from_ref(input: &ServerState) -> Self {
        input.level_catalog.clone()
    }
}

impl FromRef<ServerState> for ServerConfig {
    fn from_ref(input: &ServerState) -> Self {
        input.config.clone()
    }
}
