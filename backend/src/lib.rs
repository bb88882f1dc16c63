pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod services;
pub mod state;
pub mod types;
pub mod utils;
pub mod validation;

use axum::{
    http::{header, HeaderValue, Method},
    middleware as axum_middleware,
    routing::{delete, get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;

/// Builds the full HTTP surface over `state`.
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/api/health", get(handlers::health::health))
        .route("/api/status", get(handlers::health::status))
        .route("/api/auth/signup", post(handlers::auth::signup))
        .route("/api/auth/login", post(handlers::auth::login))
        .route("/api/auth/refresh", post(handlers::auth::refresh))
        .route("/api/auth/logout", post(handlers::auth::logout));

    let user_routes = Router::new()
        .route(
            "/api/flashcards",
            post(handlers::flashcards::save_flashcards).get(handlers::flashcards::list_flashcards),
        )
        .route(
            "/api/flashcards/{id}",
            delete(handlers::flashcards::delete_flashcard),
        )
        .route(
            "/api/flashcards/{id}/review",
            post(handlers::flashcards::review_flashcard),
        )
        .route(
            "/api/study-sessions",
            post(handlers::study_sessions::log_study_session),
        )
        .route("/api/tasks/complete", post(handlers::tasks::complete_task))
        .route("/api/me/progress", get(handlers::progress::my_progress))
        .route("/api/me/xp-events", get(handlers::progress::my_xp_events))
        .route("/api/stats", get(handlers::progress::stats))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::auth,
        ));

    let cors = cors_layer(&state.config.cors_allow_origins);

    Router::new()
        .merge(public_routes)
        .merge(user_routes)
        .layer(
            ServiceBuilder::new()
                .layer(axum_middleware::from_fn(middleware::request_id))
                .layer(TraceLayer::new_for_http())
                .layer(axum_middleware::from_fn(middleware::log_error_responses))
                .layer(cors),
        )
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .max_age(std::time::Duration::from_secs(24 * 60 * 60))
}
