use anyhow::{Context, Result};
use clap::Parser;
use sql_beats_server::catalog::LevelCatalog;
use sql_beats_server::game_store::SqliteGameStore;
use sql_beats_server::server::{run_server, RequestsLoggingLevel};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn parse_path(s: &str) -> Result<PathBuf> {
    let path_buf = PathBuf::from(s);
    let original_path = match path_buf.canonicalize() {
        Ok(path) => path,
        Err(msg) => {
            if msg.kind() == std::io::ErrorKind::NotFound {
                path_buf
            } else {
                return Err(msg).with_context(|| format!("Error resolving path: {}", s));
            }
        }
    };
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

#[derive(Parser, Debug)]
struct CliArgs {
    /// Path to the SQLite game database file. Created and seeded on
    /// first boot.
    #[clap(value_parser = parse_path)]
    pub game_db: PathBuf,

    /// The port to listen on.
    #[clap(short, long, default_value_t = 3000)]
    pub port: u16,

    /// The level of logging to perform on each request.
    #[clap(long, default_value = "path")]
    pub logging_level: RequestsLoggingLevel,

    /// Path to the frontend directory to be statically served.
    #[clap(long)]
    pub frontend_dir_path: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .unwrap();

    info!("Opening SQLite game database at {:?}...", cli_args.game_db);
    let game_store = Arc::new(SqliteGameStore::new(&cli_args.game_db)?);

    // Seeding failure leaves an empty (or partial) teaching dataset but
    // the server can still run; see DESIGN.md.
    if let Err(err) = game_store.ensure_seeded() {
        error!("Database seeding failed: {:#}", err);
    }

    let level_catalog = Arc::new(LevelCatalog::load()?);

    run_server(
        game_store,
        level_catalog,
        cli_args.logging_level,
        cli_args.port,
        cli_args.frontend_dir_path,
    )
    .await
}
