use once_cell::sync::Lazy;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::env;
use std::time::Duration;

/// Database URL from the environment, if any. Absence is not an error:
/// the server falls back to the JSON-file item store.
pub static DATABASE_URL: Lazy<Option<String>> = Lazy::new(|| {
    // Load .env if present
    let _ = dotenvy::dotenv();
    env::var("DATABASE_URL").ok().filter(|s| !s.trim().is_empty())
});

/// Connection-pool tuning applied to every Postgres connection.
#[derive(Debug, Clone)]
pub struct PoolSettings {
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout: Duration,
    pub acquire_timeout: Duration,
    pub sqlx_logging: bool,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: 10,
            min_connections: 2,
            connect_timeout: Duration::from_secs(30),
            acquire_timeout: Duration::from_secs(30),
            sqlx_logging: false,
        }
    }
}

fn connect_options(url: &str, pool: &PoolSettings) -> ConnectOptions {
    let mut opts = ConnectOptions::new(url);
    opts.max_connections(pool.max_connections)
        .min_connections(pool.min_connections)
        .connect_timeout(pool.connect_timeout)
        .acquire_timeout(pool.acquire_timeout)
        .sqlx_logging(pool.sqlx_logging);
    opts
}

pub async fn connect(url: &str, pool: &PoolSettings) -> anyhow::Result<DatabaseConnection> {
    let db = Database::connect(connect_options(url, pool)).await?;
    Ok(db)
}
