use std::time::Duration;

use deadpool_postgres::{Manager, ManagerConfig, Pool, RecyclingMethod};
use thiserror::Error;
use tokio_postgres::NoTls;
use tracing::{info, instrument};

use crate::config::{DbConnectConfig, DbOptionsConfig};

#[derive(Debug, Error)]
pub enum ConnectError {
    #[error("Invalid database url: {0}")]
    InvalidUrl(#[source] tokio_postgres::Error),
    #[error("Failed to build connection pool: {0}")]
    Build(#[from] deadpool_postgres::BuildError),
    #[error("Database unreachable: {0}")]
    Pool(#[from] deadpool_postgres::PoolError),
    #[error("Database error: {0}")]
    Database(#[from] tokio_postgres::Error),
}

/// Builds the process-wide pool and verifies the database answers before
/// returning it, so callers can fail fast at startup.
#[instrument(skip_all, name = "connect-pgsql")]
pub async fn connect_postgres_db<C>(config: &C) -> Result<Pool, ConnectError>
where
    C: DbConnectConfig + DbOptionsConfig,
{
    info!(postgres.max_conn = ?config.max_conn());

    let pg_config = config
        .uri()
        .parse::<tokio_postgres::Config>()
        .map_err(ConnectError::InvalidUrl)?;

    let mgr_config = ManagerConfig {
        recycling_method: RecyclingMethod::Fast,
    };
    let mgr = Manager::from_config(pg_config, NoTls, mgr_config);

    let mut pool_builder = Pool::builder(mgr)
        .runtime(deadpool_postgres::Runtime::Tokio1)
        .wait_timeout(Some(Duration::from_millis(2000)))
        .create_timeout(Some(Duration::from_millis(5000)))
        .recycle_timeout(Some(Duration::from_millis(100)));

    if let Some(max_conn) = config.max_conn() {
        pool_builder = pool_builder.max_size(max_conn as usize);
    }

    let pool = pool_builder.build()?;

    let client = pool.get().await?;
    client.simple_query("SELECT 1").await?;
    drop(client);

    let status = pool.status();
    info!(
        "PostgreSQL pool ready: {}/{} connections available",
        status.available, status.max_size
    );

    Ok(pool)
}
