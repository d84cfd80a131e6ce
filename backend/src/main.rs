//! Assistant entry-point: loads settings, prepares storage, and serves turns.

mod server;

use std::io;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use campus_assistant::inbound::http::health::HealthState;
use campus_assistant::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use campus_assistant::settings::AssistantSettings;
use server::{ServerConfig, create_server};

/// Apply migrations and open the pool when a database is configured.
async fn attach_database(config: ServerConfig, database_url: Option<&str>) -> io::Result<ServerConfig> {
    let Some(database_url) = database_url else {
        return Ok(config);
    };
    run_pending_migrations(database_url)
        .await
        .map_err(io::Error::other)?;
    let pool = DbPool::new(PoolConfig::new(database_url))
        .await
        .map_err(io::Error::other)?;
    Ok(config.with_db_pool(pool))
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AssistantSettings::load()
        .map_err(|err| io::Error::other(format!("failed to load settings: {err}")))?;
    let config = ServerConfig::from_settings(&settings).map_err(io::Error::other)?;
    let config = attach_database(config, settings.database_url.as_deref()).await?;
    let bind_addr = config.bind_addr();

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    info!(%bind_addr, "campus assistant listening");
    server.await
}
