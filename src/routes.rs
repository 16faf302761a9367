// src/routes.rs

use axum::{Router, http::Method, routing::get};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    handlers::{health, insights},
    state::AppState,
};

/// Assembles the application router.
///
/// * Read-only endpoints over the startup snapshot.
/// * Applies global middleware (Trace, CORS).
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET]);

    Router::new()
        .route("/insights", get(insights::get_insights))
        .route("/comparison", get(insights::get_comparison))
        .route("/visualization", get(insights::get_visualization))
        .route("/health", get(health::health))
        .fallback(insights::not_found)
        // Global Middleware (applied from outside in)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
