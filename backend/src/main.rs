//! Backend entry-point: loads settings, selects storage, and serves the API.

use actix_web::web;
use color_eyre::eyre::{Result, WrapErr, eyre};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use bp_backend::inbound::http::health::HealthState;
use bp_backend::outbound::persistence::{DbPool, run_migrations};

mod server;

use server::{ServerConfig, ServerSettings, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }
    color_eyre::install()?;

    let settings =
        ServerSettings::load().map_err(|err| eyre!("failed to load server settings: {err}"))?;

    let mut config = ServerConfig::new(settings.host(), settings.port());
    if let Some(pool_config) = settings.pool_config() {
        run_migrations(pool_config.database_url())
            .await
            .wrap_err("failed to migrate measurement schema")?;
        let pool = DbPool::new(pool_config)
            .await
            .wrap_err("failed to connect to measurement database")?;
        config = config.with_db_pool(pool);
    }

    let health_state = web::Data::new(HealthState::new());
    info!(host = settings.host(), port = settings.port(), "starting server");
    let server = create_server(health_state, config)?;
    server.await?;
    Ok(())
}
