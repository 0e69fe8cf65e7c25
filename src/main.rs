use sqlx::postgres::PgPoolOptions;

use pilgrim_planner::cache::{start_cache_warmer, AppCache};
use pilgrim_planner::config::Config;
use pilgrim_planner::{app, init_tracing, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    init_tracing(config.log_format);

    let db = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .connect(&config.database_url)
        .await?;

    let cache = AppCache::new(config.cache_ttl);
    tokio::spawn(start_cache_warmer(cache.clone(), db.clone(), config.cache_ttl));

    let router = app(AppState { db, cache });

    tracing::info!("Listening on {}", config.listen_addr);
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
