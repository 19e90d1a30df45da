//! HTTP routes for the signaling service.
//!
//! Defines the Axum router and application state.

use crate::auth::{require_auth, AuthState};
use crate::config::Config;
use crate::handlers;
use crate::live_class::LiveClassDirectory;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use signaling_store::SignalingStore;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

/// Application state shared across all handlers.
pub struct AppState {
    /// The in-memory signaling session store.
    pub store: Arc<SignalingStore>,

    /// Seam to the platform's live-class aggregate.
    pub directory: Arc<dyn LiveClassDirectory>,

    /// Service configuration.
    pub config: Config,
}

/// Build the application routes.
///
/// Creates an Axum router with:
/// - `/health` - Liveness probe - public
/// - `/api/v1/live-classes/{id}/offer` - publish (POST) / poll (GET)
/// - `/api/v1/live-classes/{id}/answer` - publish (POST) / poll (GET)
/// - `/api/v1/live-classes/{id}/ice-candidate` - publish (POST)
/// - `/api/v1/live-classes/{id}/ice-candidates` - poll (GET)
/// - `/api/v1/live-classes/{id}/join` / `/leave` - participant list
/// - TraceLayer for request logging
/// - 30 second request timeout
///
/// Everything under `/api/v1` requires a valid bearer token.
pub fn build_routes(state: Arc<AppState>) -> Router {
    let auth_state = Arc::new(AuthState::new(&state.config));

    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/health", get(handlers::health_check))
        .with_state(state.clone());

    // Protected routes (authentication required)
    let protected_routes = Router::new()
        .route(
            "/api/v1/live-classes/:class_id/offer",
            post(handlers::publish_offer).get(handlers::fetch_offer),
        )
        .route(
            "/api/v1/live-classes/:class_id/answer",
            post(handlers::publish_answer).get(handlers::fetch_answer),
        )
        .route(
            "/api/v1/live-classes/:class_id/ice-candidate",
            post(handlers::publish_ice_candidate),
        )
        .route(
            "/api/v1/live-classes/:class_id/ice-candidates",
            get(handlers::fetch_ice_candidates),
        )
        .route(
            "/api/v1/live-classes/:class_id/join",
            post(handlers::join_live_class),
        )
        .route(
            "/api/v1/live-classes/:class_id/leave",
            post(handlers::leave_live_class),
        )
        .route_layer(middleware::from_fn_with_state(auth_state, require_auth))
        .with_state(state);

    public_routes
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_is_clone() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<Config>();
    }
}
