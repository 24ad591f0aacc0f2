//! IWA Web Server
//!
//! Axum-based web front-end: mode selector, file/camera input and the
//! rendered analysis. Handlers are thin adapters over `iwa-core`.

pub mod routes;
pub mod session;
pub mod state;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use iwa_core::Analyzer;
use tower_http::trace::TraceLayer;

use state::AppState;

/// Server settings.
#[derive(Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_upload_bytes: usize,
}

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    let body_limit = DefaultBodyLimit::max(state.max_upload_bytes);

    Router::new()
        .route("/", get(routes::page::index))
        .route("/inputs", get(routes::page::inputs))
        .route("/analyze", post(routes::analyze::analyze))
        .route("/health", get(routes::page::health))
        .layer(body_limit)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run the web server.
///
/// Takes an already-built [`Analyzer`]: without a credential there is
/// nothing to pass here, so no request can reach the analysis path.
pub async fn run_server(analyzer: Analyzer, config: ServerConfig) -> anyhow::Result<()> {
    let state = AppState::new(analyzer).with_max_upload_bytes(config.max_upload_bytes);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port)).await?;
    let addr = listener.local_addr()?;
    tracing::info!("Web server listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
