use std::{env, net::SocketAddr, path::Path, sync::Arc, time::Duration};

use axum::Router;
use common::utils::logging::init_logging_default;
use dotenvy::dotenv;
use migration::MigratorTrait;
use service::item::{ItemFileStore, ItemService, ItemStore, SeaOrmItemStore};
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::routes;
use crate::state::ServerState;

/// Initialize logging via shared common utils
fn init_logging() {
    init_logging_default();
}

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Load configuration, falling back to env vars when no config.toml exists.
fn load_config() -> configs::AppConfig {
    match configs::AppConfig::load_and_validate() {
        Ok(cfg) => cfg,
        Err(_) => {
            let mut cfg = configs::AppConfig::default();
            if let Ok(host) = env::var("SERVER_HOST") {
                cfg.server.host = host;
            }
            if let Ok(port) = env::var("SERVER_PORT") {
                if let Ok(port) = port.parse::<u16>() {
                    cfg.server.port = port;
                }
            }
            cfg.database.normalize_from_env();
            cfg.storage.normalize_from_env();
            cfg
        }
    }
}

fn bind_addr(cfg: &configs::AppConfig) -> anyhow::Result<SocketAddr> {
    Ok(format!("{}:{}", cfg.server.host, cfg.server.port).parse()?)
}

fn pool_settings(db: &configs::DatabaseConfig) -> models::db::PoolSettings {
    models::db::PoolSettings {
        max_connections: db.max_connections,
        min_connections: db.min_connections,
        connect_timeout: Duration::from_secs(db.connect_timeout_secs),
        acquire_timeout: Duration::from_secs(db.acquire_timeout_secs),
        sqlx_logging: db.sqlx_logging,
    }
}

/// Pick the item store backend: Postgres when a database URL is
/// configured, the JSON-file store under the data directory otherwise.
async fn build_store(cfg: &configs::AppConfig) -> anyhow::Result<Arc<dyn ItemStore>> {
    let url = if cfg.database.url.trim().is_empty() {
        models::db::DATABASE_URL.clone()
    } else {
        Some(cfg.database.url.clone())
    };

    match url {
        Some(url) => {
            let db = models::db::connect(&url, &pool_settings(&cfg.database)).await?;
            migration::Migrator::up(&db, None).await?;
            info!(backend = "postgres", "item store ready");
            Ok(Arc::new(SeaOrmItemStore::new(db)) as Arc<dyn ItemStore>)
        }
        None => {
            let path = Path::new(&cfg.storage.data_dir).join("items.json");
            let store = ItemFileStore::new(path).await?;
            info!(backend = "json-file", data_dir = %cfg.storage.data_dir, "item store ready");
            Ok(store as Arc<dyn ItemStore>)
        }
    }
}

/// Public entry: build the app and run the HTTP server
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging();

    let cfg = load_config();
    common::env::ensure_data_dir(&cfg.storage.data_dir).await?;

    let store = build_store(&cfg).await?;
    let state = ServerState { items: Arc::new(ItemService::new(store)) };

    let app: Router = routes::build_router(build_cors(), state);

    let addr = bind_addr(&cfg)?;
    info!(%addr, "starting inventory server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
