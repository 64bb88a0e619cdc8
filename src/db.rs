use anyhow::{Context, Result};
use sea_orm::{DatabaseConnection, SqlxPostgresConnector};
use sqlx::{PgPool, postgres::PgPoolOptions};

use crate::config::AppConfig;

pub type DbPool = PgPool;
pub type OrmConn = DatabaseConnection;

/// Connect the Postgres pool, probing with a fixed backoff until the database
/// answers or the configured attempts run out.
pub async fn create_pool(config: &AppConfig) -> Result<DbPool> {
    let options = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .min_connections(config.db_min_connections);

    let mut attempt = 1;
    loop {
        tracing::info!(attempt, "connecting to database");
        match options.clone().connect(&config.database_url).await {
            Ok(pool) => {
                tracing::info!("connected to database");
                return Ok(pool);
            }
            Err(err) if attempt < config.db_connect_attempts => {
                tracing::warn!(
                    attempt,
                    error = %err,
                    backoff_secs = config.db_connect_backoff.as_secs(),
                    "database not reachable, retrying"
                );
                tokio::time::sleep(config.db_connect_backoff).await;
                attempt += 1;
            }
            Err(err) => {
                return Err(err).with_context(|| {
                    format!("database unreachable after {attempt} attempts")
                });
            }
        }
    }
}

/// Wrap an existing pool in a SeaORM connection so both layers share it.
pub fn create_orm_conn(pool: DbPool) -> OrmConn {
    SqlxPostgresConnector::from_sqlx_postgres_pool(pool)
}

pub async fn run_migrations(pool: &DbPool) -> Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("failed to apply migrations")?;
    Ok(())
}
