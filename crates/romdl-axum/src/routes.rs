//! Route definitions and router construction.

use std::sync::Arc;

use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::bootstrap::{AxumContext, CorsConfig, ServerConfig};
use crate::state::AppState;
use crate::{handlers, middleware, ws};

/// Build CORS layer from configuration.
fn build_cors_layer(config: &CorsConfig) -> CorsLayer {
    match config {
        CorsConfig::AllowAll => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
        CorsConfig::AllowOrigins(origins) => {
            use axum::http::HeaderValue;
            let allowed: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
            CorsLayer::new()
                .allow_origin(allowed)
                .allow_methods(Any)
                .allow_headers(Any)
        }
    }
}

/// All API routes without the `/api` prefix.
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/status", get(handlers::status::get))
        .route("/platforms", get(handlers::catalog::platforms))
        .route("/platforms/{id}/games", get(handlers::catalog::games))
        .route("/search", get(handlers::search::search))
        .route("/download", post(handlers::downloads::submit))
        .route("/downloads/batch", post(handlers::downloads::submit_batch))
        .route("/cancel", post(handlers::downloads::cancel))
        .route("/history", get(handlers::history::list))
        .route("/history/redownload", post(handlers::downloads::redownload))
        .route("/progress", get(handlers::progress::get))
        .route("/tasks/{id}", get(handlers::tasks::get))
        .route(
            "/settings/gated-key",
            get(handlers::settings::get_gated_key).post(handlers::settings::set_gated_key),
        )
}

/// Create the application router.
///
/// `/api/*` carries CORS, API key auth and rate limiting. `/health` is
/// open; `/ws/progress` authenticates inside the upgrade. The static UI is
/// mounted at `/web` when configured.
pub fn create_router(ctx: AxumContext, config: &ServerConfig) -> Router {
    let state: AppState = Arc::new(ctx);

    let api = api_routes()
        .route_layer(from_fn_with_state(state.clone(), middleware::rate_limit))
        .route_layer(from_fn_with_state(state.clone(), middleware::require_api_key))
        .layer(build_cors_layer(&config.cors));

    let mut router = Router::new()
        .route("/health", get(health_check))
        .route("/ws/progress", get(ws::progress_ws))
        .nest("/api", api)
        .with_state(state);

    if let Some(dir) = config.served_static_dir() {
        router = router.nest_service("/web", ServeDir::new(dir));
    }
    router.layer(TraceLayer::new_for_http())
}

/// Health check endpoint.
pub(crate) async fn health_check() -> &'static str {
    "OK"
}
