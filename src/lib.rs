//! SQL Beats Server Library
//!
//! This library exposes the internal modules for testing and potential reuse.

pub mod catalog;
pub mod checker;
pub mod game_store;
pub mod server;

// Re-export commonly used types for convenience
pub use catalog::{Level, LevelCatalog};
pub use game_store::{QueryError, SqliteGameStore};
pub use server::{run_server, RequestsLoggingLevel, ServerConfig};
