//! `article-server` entry point.
//!
//! Loads configuration, starts logging, opens the store once and serves
//! the article API until the process is stopped.

use article_core::db::{open_db, open_db_in_memory};
use article_core::init_logging;
use article_server::config::DbLocation;
use article_server::{build_router, AppState, ServerConfig};
use log::{error, info};
use std::net::SocketAddr;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("config load error: {err}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = init_logging(&config.log_level, config.log_dir.as_deref()) {
        eprintln!("logging init error: {err}");
        return ExitCode::FAILURE;
    }

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=server_exit module=server status=error error={err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let conn = match &config.db {
        DbLocation::Memory => open_db_in_memory()?,
        DbLocation::File(path) => open_db(path)?,
    };

    let app = build_router(AppState::new(conn));
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!(
        "event=server_start module=server status=ok addr={addr} env={} db={:?}",
        config.app_env, config.db
    );
    axum::serve(listener, app).await?;
    Ok(())
}
