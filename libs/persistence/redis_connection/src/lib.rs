use deadpool_redis::{Config, Pool, Runtime, redis};
pub use deadpool_redis::{PoolError, redis::RedisError};
use thiserror::Error;
use tracing::{info, instrument};
use url::Url;

pub mod cache;
pub mod config;
pub mod core;
pub mod macros;

pub use cache::{
    CacheError, CacheResult, CacheStore, MemoryCache, RedisCache, SharedCache,
};

#[derive(Debug, Error)]
pub enum RedisConnectError {
    #[error("Invalid redis url: {0}")]
    InvalidUrl(String),
    #[error("Failed to create redis pool: {0}")]
    CreatePool(#[from] deadpool_redis::CreatePoolError),
    #[error("Redis unreachable: {0}")]
    Pool(#[from] PoolError),
    #[error("Redis error: {0}")]
    Redis(#[from] RedisError),
}

pub fn redis_url<C>(config: &C) -> Result<Url, RedisConnectError>
where
    C: config::DbConnectConfig,
{
    let invalid = |what: &str| {
        RedisConnectError::InvalidUrl(format!("{what}: {}", config.host()))
    };

    let mut url = Url::parse("redis://")
        .map_err(|e| RedisConnectError::InvalidUrl(e.to_string()))?;
    url.set_host(Some(config.host()))
        .map_err(|_| invalid("bad host"))?;
    url.set_port(Some(config.port()))
        .map_err(|_| invalid("bad port"))?;
    if let Some(password) = config.password() {
        url.set_password(Some(password))
            .map_err(|_| invalid("cannot carry a password"))?;
    }
    url.set_path(&config.db().to_string());

    Ok(url)
}

/// Creates the pool and issues a `PING` so an unreachable server is
/// reported at startup instead of on the first request.
#[instrument(skip_all, name = "connect-redis")]
pub async fn connect_redis_db<C>(
    config: &C,
) -> Result<Pool, RedisConnectError>
where
    C: config::DbConnectConfig,
{
    let url = redis_url(config)?;

    info!(
        redis.host = config.host(),
        redis.port = config.port(),
        redis.db = config.db(),
        redis.connect = true
    );

    let cfg = Config {
        url: Some(url.to_string()),
        pool: Some(deadpool_redis::PoolConfig::default()),
        connection: None,
    };

    let pool = cfg.create_pool(Some(Runtime::Tokio1))?;

    let mut conn = pool.get().await?;
    redis::cmd("PING").query_async::<()>(&mut conn).await?;

    Ok(pool)
}
