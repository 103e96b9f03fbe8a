use std::net::SocketAddr;

use axum::Router;
use configs::AppConfig;
use sea_orm::DatabaseConnection;
use tower_http::cors::CorsLayer;
use tracing::info;

use models::seed::{seed_if_empty, SeedFixture};

use crate::routes;
use crate::state::ServerState;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Router over an existing connection; `environment` selects the root greeting.
pub fn build_app(db: DatabaseConnection, environment: &str) -> Router {
    let state = ServerState::new(db, environment);
    routes::build_router(state, build_cors())
}

/// Schema creation and fixture loading, each gated by its `[database]` flag.
pub async fn prepare_store(db: &DatabaseConnection, cfg: &configs::DatabaseConfig) -> anyhow::Result<()> {
    if cfg.auto_create_schema {
        models::db::create_schema(db).await?;
    }
    if cfg.seed_on_start {
        if let Some(path) = cfg.seed_path.as_deref() {
            let fixture = SeedFixture::load(path)?;
            let report = seed_if_empty(db, &fixture).await?;
            info!(path, movies = report.movies, comments = report.comments, skipped = report.skipped, "seed step finished");
        }
    }
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!(event = "shutdown_signal", "received Ctrl+C, draining connections");
    }
}

/// Connect the store, prepare it, then serve until Ctrl+C.
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let db = models::db::connect_with_config(&cfg.database).await?;
    prepare_store(&db, &cfg.database).await?;

    let app = build_app(db, &cfg.app.environment);

    let addr: SocketAddr = format!("{}:{}", cfg.server.host, cfg.server.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, environment = %cfg.app.environment, "movie server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}
