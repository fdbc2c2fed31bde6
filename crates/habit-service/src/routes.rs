//! Router configuration.
//!
//! This module sets up the Axum router with all routes and middleware.

use std::sync::Arc;
use std::time::Duration;

use axum::routing::{get, post};
use axum::Router;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{habits, health, logs, users};
use crate::state::AppState;

/// Maximum concurrent requests for API endpoints.
const API_MAX_CONCURRENT_REQUESTS: usize = 50;

/// Create the service router with all routes and middleware.
///
/// # Routes
///
/// - `GET /health` - Health check
///
/// ## Habits
/// - `POST /v1/habits` - Create habit
/// - `GET|PUT|DELETE /v1/habits/:id` - Fetch, edit or delete a habit
/// - `GET /v1/habits/:id/progress` - Refresh and return streak and progress
///
/// ## Logs
/// - `POST /v1/habits/:id/log` - Record one completion (`?date=YYYY-MM-DD`)
/// - `POST /v1/habits/:id/log/:count` - Set today's completed count
/// - `GET /v1/habits/:id/logs` - Log history
/// - `GET /v1/habits/:id/today` - Today's log or `null`
///
/// ## Users
/// - `GET /v1/users/:user_id/habits` - List habits with today's status
/// - `POST /v1/users/:user_id/daily-reset` - Reset habits and check streak
/// - `GET /v1/users/:user_id/streak` - Cross-habit streak
pub fn create_router(state: AppState) -> Router {
    let cors = build_cors_layer(&state.config.cors_origins);
    let max_body_bytes = state.config.max_body_bytes;
    let request_timeout_seconds = state.config.request_timeout_seconds;

    let state = Arc::new(state);

    let api_routes = Router::new()
        // Habits
        .route("/habits", post(habits::create_habit))
        .route(
            "/habits/:id",
            get(habits::get_habit)
                .put(habits::update_habit)
                .delete(habits::delete_habit),
        )
        .route("/habits/:id/progress", get(habits::get_progress))
        // Logs
        .route("/habits/:id/log", post(logs::record_completion))
        .route("/habits/:id/log/:count", post(logs::record_partial))
        .route("/habits/:id/logs", get(logs::list_logs))
        .route("/habits/:id/today", get(logs::today_log))
        // Users
        .route("/users/:user_id/habits", get(users::list_habits))
        .route("/users/:user_id/daily-reset", post(users::daily_reset))
        .route("/users/:user_id/streak", get(users::get_streak))
        .layer(ConcurrencyLimitLayer::new(API_MAX_CONCURRENT_REQUESTS));

    Router::new()
        .route("/health", get(health::health))
        .nest("/v1", api_routes)
        // Global middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(TimeoutLayer::new(Duration::from_secs(
            request_timeout_seconds,
        )))
        .with_state(state)
}

/// Build the CORS layer from configured origins.
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
