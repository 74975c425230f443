use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handlers::{health_handler, redirect_handler, shorten_handler};
use crate::state::AppState;

pub const DEFAULT_API_PATH: &str = "/api/v1/shorten";

/// Segments of `api_path` that `GET /{code}` would never reach.
///
/// Only a single-segment path overlaps the redirect route.
pub fn shadowed_segments(api_path: &str) -> Vec<String> {
    let trimmed = api_path.trim_matches('/');
    if trimmed.is_empty() || trimmed.contains('/') {
        return Vec::new();
    }
    vec![trimmed.to_string()]
}

pub struct App;

impl App {
    pub fn router(state: AppState) -> Router {
        Self::router_with_api_path(state, DEFAULT_API_PATH)
    }

    /// Mounts the create endpoint at `api_path` instead of the default.
    pub fn router_with_api_path(state: AppState, api_path: &str) -> Router {
        Router::new()
            .route("/health", get(health_handler))
            .route(api_path, post(shorten_handler))
            .route("/{code}", get(redirect_handler))
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }
}
