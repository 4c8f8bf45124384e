mod config;
mod relay;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use axum::extract::{Request, State};
use axum::http::HeaderValue;
use axum::response::{Html, Response};
use axum::routing::{get, post};
use axum::Router;
use satfinder_shared::models::SEARCH_PATH;
use satfinder_shared::results::DOWNLOAD_PROXY_PATH;
use tower_http::compression::CompressionLayer;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tracing_subscriber::EnvFilter;

use config::Config;
use relay::{Relay, RelayError};

struct AppState {
    relay: Relay,
    dist_dir: PathBuf,
}

async fn relay_handler(
    State(state): State<Arc<AppState>>,
    req: Request,
) -> Result<Response, RelayError> {
    state.relay.forward(req).await
}

/// Build a cache-controlled static file router.
///
/// Separated so tests can exercise the caching layer with arbitrary directories.
fn cached_static_router(dir: &Path, cache_header: &'static str) -> Router {
    let layer = SetResponseHeaderLayer::overriding(
        axum::http::header::CACHE_CONTROL,
        HeaderValue::from_static(cache_header),
    );
    Router::new()
        .fallback_service(ServeDir::new(dir))
        .layer(layer)
}

const CACHE_1DAY: &str = "public, max-age=86400, must-revalidate";
const CACHE_IMMUTABLE: &str = "public, max-age=31536000, immutable";

const FALLBACK_INDEX: &str = r#"<!DOCTYPE html>
<html>
<head><title>Satellite Image Search</title></head>
<body>
<h1>Satellite Image Search</h1>
<p>Frontend not built yet. Run <code>dx bundle</code> in <code>crates/frontend</code> and copy the output to the dist directory.</p>
</body>
</html>"#;

/// Build the full application router.
fn build_app(config: &Config) -> Router {
    // Static file routers are stateless, so merge them before adding app state
    let static_files = Router::new()
        .nest(
            "/static",
            cached_static_router(&config.assets_dir, CACHE_1DAY),
        )
        .nest(
            "/dist",
            cached_static_router(&config.dist_dir, CACHE_IMMUTABLE),
        )
        .nest(
            "/assets",
            cached_static_router(&config.dist_dir.join("assets"), CACHE_IMMUTABLE),
        )
        .layer(CompressionLayer::new());

    let state = Arc::new(AppState {
        relay: Relay::new(config.search_backend_url.clone()),
        dist_dir: config.dist_dir.clone(),
    });

    Router::new()
        .route("/", get(serve_index))
        .route(SEARCH_PATH, post(relay_handler))
        .route(DOWNLOAD_PROXY_PATH, get(relay_handler))
        .with_state(state)
        .merge(static_files)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;
    match config.search_backend_url.as_deref() {
        Some(url) => tracing::info!(upstream = url, "Relaying search to backend"),
        None => tracing::warn!("SEARCH_BACKEND_URL not set, search requests will get 503"),
    }

    let app = build_app(&config);
    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!(%addr, "Server running");

    axum::serve(listener, app).await.context("Server stopped")?;
    Ok(())
}

async fn serve_index(State(state): State<Arc<AppState>>) -> Html<String> {
    // Serve the built frontend, or a placeholder until it exists
    let path = state.dist_dir.join("index.html");
    match tokio::fs::read_to_string(&path).await {
        Ok(html) => Html(html),
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "Serving fallback index");
            Html(FALLBACK_INDEX.to_string())
        }
    }
}
