//! Runtime configuration from the environment (and `.env`, via dotenvy).

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub listen_addr: SocketAddr,
    pub db_max_connections: u32,
    pub cache_ttl: Duration,
    pub log_format: LogFormat,
}

impl Config {
    /// Load configuration from the process environment
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url =
            lookup("DATABASE_URL").context("missing DATABASE_URL environment variable")?;

        let listen_addr: SocketAddr = lookup("PLANNER_LISTEN_ADDR")
            .unwrap_or_else(|| "0.0.0.0:3000".to_string())
            .parse()
            .context("PLANNER_LISTEN_ADDR must be a socket address")?;

        let db_max_connections: u32 = match lookup("PLANNER_DB_MAX_CONNECTIONS") {
            Some(v) => v
                .parse()
                .context("PLANNER_DB_MAX_CONNECTIONS must be a positive integer")?,
            None => 5,
        };

        let cache_ttl_secs: u64 = match lookup("PLANNER_CACHE_TTL_SECS") {
            Some(v) => v
                .parse()
                .context("PLANNER_CACHE_TTL_SECS must be a number of seconds")?,
            None => 600,
        };

        let log_format = match lookup("PLANNER_LOG_FORMAT") {
            Some(v) if v.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Text,
        };

        Ok(Self {
            database_url,
            listen_addr,
            db_max_connections,
            cache_ttl: Duration::from_secs(cache_ttl_secs),
            log_format,
        })
    }
}
