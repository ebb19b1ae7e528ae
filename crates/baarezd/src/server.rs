//! HTTP server for baarezd

use crate::config::{Config, CorsConfig};
use crate::routes;
use anyhow::{Context, Result};
use axum::http::HeaderValue;
use axum::Router;
use baarez_common::FactStore;
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Application state shared across handlers
pub struct AppState {
    pub store: FactStore,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(store: FactStore) -> Self {
        Self {
            store,
            start_time: Instant::now(),
        }
    }
}

/// Build the CORS layer. A "*" entry allows any origin without credentials;
/// an explicit list allows credentials and mirrors requested methods/headers.
pub fn cors_layer(cors: &CorsConfig) -> CorsLayer {
    if cors.allows_any() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = cors
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

/// Assemble the router with all routes and layers
pub fn app(state: AppState, cors: &CorsConfig) -> Router {
    let state = Arc::new(state);

    Router::new()
        .merge(routes::agent_routes())
        .merge(routes::info_routes())
        .with_state(state)
        .layer(cors_layer(cors))
        .layer(TraceLayer::new_for_http())
}

/// Run the HTTP server until Ctrl-C
pub async fn run(config: Config) -> Result<()> {
    let store = FactStore::open_with_timeout(&config.storage.db_path, config.storage.busy_timeout())
        .with_context(|| format!("Failed to open fact store {:?}", config.storage.db_path))?;
    info!("  Fact store at {}", store.path().display());

    let app = app(AppState::new(store), &config.cors);

    let listener = tokio::net::TcpListener::bind(&config.server.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.bind))?;
    info!("  Listening on http://{}", config.server.bind);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down gracefully");
}
