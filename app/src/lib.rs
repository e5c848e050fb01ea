pub mod cli;
pub mod commands;
pub mod config;
pub mod database;
pub mod modules;
pub mod services;

use clap::Parser;
use config::app_config;
use tracing_subscriber::EnvFilter;

#[tokio::main]
pub async fn main() {
    let args = cli::Cli::parse();

    let cfg = app_config();

    let default_level = if cfg.is_development { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .init();

    let db = database::db::create_db_conn(&cfg.db_url).await;

    database::db::run_migrations(&db).await;

    if let Err(err) = commands::execute(args, &db).await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}
