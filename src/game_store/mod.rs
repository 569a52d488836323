mod error;
mod schema;
mod seed;
mod store;

pub use error::QueryError;
pub use schema::schema_map;
pub use store::{QueryRow, SqliteGameStore};
