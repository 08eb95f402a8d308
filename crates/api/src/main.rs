//! BizLevel API Server

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use engine::Catalog;
use store::memory::MemoryStore;
use store::StoreHandle;

mod error;
mod routes;
mod state;

use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("api=debug".parse()?)
                .add_directive("engine=debug".parse()?)
                .add_directive("store=debug".parse()?),
        )
        .init();

    info!("🎓 Starting BizLevel API");

    // Load configuration
    let config = common::Config::from_env();

    // Initialize the document store
    let store: StoreHandle = Arc::new(MemoryStore::new());
    if config.seed_demo_catalog {
        engine::seed::ensure_seeded(store.as_ref()).await?;
    }

    // Load the level catalog
    let levels = store::levels::list(store.as_ref()).await?;
    let catalog = Arc::new(Catalog::new(levels)?);
    info!("📚 Catalog loaded with {} levels", catalog.len());

    // Create app state
    let state = Arc::new(AppState::new(config.clone(), store, catalog));

    // Build API router with state
    let app = Router::new()
        .route("/health", get(routes::health::health))
        .route("/api/levels", get(routes::levels::list))
        .route("/api/levels/:id", get(routes::levels::get))
        .route(
            "/api/users/:user_id/progress",
            get(routes::progress::get),
        )
        .route(
            "/api/users/:user_id/progress/reset",
            post(routes::progress::reset),
        )
        .route(
            "/api/users/:user_id/videos/:video_id/watch",
            post(routes::progress::watch_video),
        )
        .route(
            "/api/users/:user_id/tests/:test_id/complete",
            post(routes::progress::complete_test),
        )
        .route(
            "/api/users/:user_id/artifacts/:artifact_id/download",
            post(routes::progress::download_artifact),
        )
        .route(
            "/api/users/:user_id/levels/:level_id/complete",
            post(routes::progress::complete_level),
        )
        .route("/api/users/:user_id/profile", get(routes::profile::get))
        .route(
            "/api/users/:user_id/preferences",
            get(routes::settings::get).put(routes::settings::update),
        )
        .route(
            "/api/admin/levels",
            get(routes::admin::list).post(routes::admin::create),
        )
        .route(
            "/api/admin/levels/:id",
            get(routes::admin::get)
                .put(routes::admin::update)
                .delete(routes::admin::remove),
        )
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        );

    // Start server
    let addr = format!("{}:{}", config.host, config.port);
    info!("🚀 Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
