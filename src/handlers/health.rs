// src/handlers/health.rs

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};

use crate::{models::insights::HealthResponse, snapshot::Snapshot};

/// Reports whether the snapshot built cleanly. 503 when degraded.
pub async fn health(State(snapshot): State<Arc<Snapshot>>) -> impl IntoResponse {
    let (status, body) = match snapshot.degraded_reason() {
        None => (
            StatusCode::OK,
            HealthResponse {
                status: "ready",
                generated_at: snapshot.generated_at,
                error: None,
            },
        ),
        Some(reason) => (
            StatusCode::SERVICE_UNAVAILABLE,
            HealthResponse {
                status: "degraded",
                generated_at: snapshot.generated_at,
                error: Some(reason.to_string()),
            },
        ),
    };

    (status, Json(body))
}
