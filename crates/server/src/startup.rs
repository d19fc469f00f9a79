use std::{net::SocketAddr, path::Path, sync::Arc};

use axum::Router;
use configs::{AppConfig, StoreBackend, StoreConfig};
use migration::MigratorTrait;
use tower_http::cors::CorsLayer;
use tracing::info;

use service::{
    guard::RefererPolicy,
    posts::PostsService,
    storage::{MemoryPostStore, PostStore, SeaOrmPostStore},
};

use crate::errors::StartupError;
use crate::routes;
use crate::state::ServerState;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn bind_addr(cfg: &AppConfig) -> Result<SocketAddr, StartupError> {
    format!("{}:{}", cfg.server.host, cfg.server.port)
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("bad bind address: {e}")))
}

/// Open the post store selected by `store.backend`.
pub async fn build_store(cfg: &StoreConfig) -> Result<Arc<dyn PostStore>, StartupError> {
    match cfg.backend {
        StoreBackend::Memory => match cfg.path.as_deref() {
            Some(path) => {
                common::env::ensure_data_dir(Some(Path::new(path))).await?;
                info!(%path, "using file-backed memory store");
                Ok(Arc::new(MemoryPostStore::open(path).await?))
            }
            None => {
                info!("using in-memory store; posts are lost on restart");
                Ok(Arc::new(MemoryPostStore::new()))
            }
        },
        StoreBackend::Postgres => {
            let db = models::db::connect(cfg)
                .await
                .map_err(|e| StartupError::Store(e.to_string()))?;
            migration::Migrator::up(&db, None)
                .await
                .map_err(|e| StartupError::Store(format!("migrations failed: {e}")))?;
            info!("using postgres store");
            Ok(Arc::new(SeaOrmPostStore::new(db)))
        }
    }
}

/// Wire a store into the full router according to the config.
pub fn build_app(cfg: &AppConfig, store: Arc<dyn PostStore>) -> Router {
    let policy = RefererPolicy::from_config(&cfg.app);
    if policy.dev_server {
        info!("dev server mode: referer check disabled");
    } else {
        info!(domain = %policy.canonical_domain(), "referer check enabled");
    }
    let state = ServerState::new(PostsService::new(store), policy);
    routes::build_router(state, &cfg.server.base_path, build_cors())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!(event = "shutdown_signal", "received Ctrl+C, shutting down");
    }
}

/// Public entry: build the app and run the HTTP server until Ctrl+C.
pub async fn run(cfg: AppConfig) -> Result<(), StartupError> {
    let store = build_store(&cfg.store).await?;
    let app = build_app(&cfg, store);

    let addr = bind_addr(&cfg)?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, base_path = %cfg.server.base_path, "posts api listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}
