use std::{net::SocketAddr, sync::Arc};

use clap::Parser;
use eventdesk::{AppConfig, AppState, Stores, app::migrations, router};
use redis_connection::{
    MemoryCache, RedisCache, SharedCache, config::MemoryConfig,
    connect_redis_db,
};
use sql_connection::{SqlConnect, SqlMigrator, connect_postgres_db};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    if config.uses_default_secret() {
        warn!("JWT_SECRET is not set, tokens are signed with the default secret");
    }

    let pool = connect_postgres_db(&config.postgres()).await?;
    let applied = SqlMigrator::new(pool.clone())
        .run_all_migrations(&migrations())
        .await?;
    info!("PostgreSQL ready, {applied} migration(s) applied");
    let db = SqlConnect::new(pool);

    let cache = connect_cache(&config).await?;
    info!("Cache backend: {}", cache.kind());

    let state = AppState::new(
        Stores::postgres(db.clone()),
        db,
        cache,
        config.cache_ttl(),
        config.jwt_keys(),
    );
    let app = router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("eventdesk listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Redis when reachable. Without it the process either stops or, when the
/// cache is not required, runs on the in-process cache.
async fn connect_cache(config: &AppConfig) -> anyhow::Result<SharedCache> {
    match connect_redis_db(&config.redis()).await {
        Ok(pool) => Ok(Arc::new(RedisCache::new(pool))),
        Err(e) if !config.cache_required => {
            warn!(
                "Redis unavailable ({e}), falling back to the in-process cache"
            );
            Ok(Arc::new(MemoryCache::new(&MemoryConfig::default())))
        }
        Err(e) => Err(e.into()),
    }
}
