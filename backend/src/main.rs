//! Backend entry-point: configuration, migrations, and server bootstrap.

use actix_web::web;
use diesel::Connection;
use diesel::pg::PgConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use mockable::DefaultEnv;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use voluntarios_backend::config::{BuildMode, app_config_from_env};
use voluntarios_backend::inbound::http::health::HealthState;
use voluntarios_backend::inbound::http::session_config::session_settings_from_env;
use voluntarios_backend::outbound::persistence::{DbPool, PoolConfig};
use voluntarios_backend::server::{ServerConfig, create_server};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

fn run_migrations(database_url: &str) -> std::io::Result<()> {
    let mut conn = PgConnection::establish(database_url)
        .map_err(|err| std::io::Error::other(format!("database connection failed: {err}")))?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|err| std::io::Error::other(format!("migrations failed: {err}")))?;
    if !applied.is_empty() {
        info!(count = applied.len(), "applied pending migrations");
    }
    Ok(())
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let env = DefaultEnv::new();
    let mode = BuildMode::from_debug_assertions();
    let app_config = app_config_from_env(&env, mode).map_err(std::io::Error::other)?;
    let session = session_settings_from_env(&env, mode).map_err(std::io::Error::other)?;

    let mut server_config = ServerConfig::new(session, &app_config);
    if let Some(url) = &app_config.database_url {
        run_migrations(url)?;
        let pool = DbPool::new(PoolConfig::new(url.clone()))
            .await
            .map_err(std::io::Error::other)?;
        server_config = server_config.with_db_pool(pool);
    }

    info!(addr = %server_config.bind_addr(), "starting volunteer registration backend");
    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, server_config)?;
    server.await
}
