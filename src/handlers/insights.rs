// src/handlers/insights.rs

use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    http::header,
    response::IntoResponse,
};

use crate::{
    error::AppError,
    models::insights::{ComparisonResponse, InsightsResponse},
    snapshot::Snapshot,
};

/// Mean submission score and accuracy.
pub async fn get_insights(
    State(snapshot): State<Arc<Snapshot>>,
) -> Result<impl IntoResponse, AppError> {
    let summary = &snapshot.report()?.summary;

    Ok(Json(InsightsResponse {
        average_score: summary.average_score,
        average_accuracy: summary.accuracy_label(),
    }))
}

/// Current quiz marks against the historical mean score.
pub async fn get_comparison(
    State(snapshot): State<Arc<Snapshot>>,
) -> Result<impl IntoResponse, AppError> {
    let summary = &snapshot.report()?.summary;

    Ok(Json(ComparisonResponse {
        current_avg_score: summary.current_avg_score,
        historical_avg_score: summary.historical_avg_score,
    }))
}

/// Score distribution histogram as PNG.
///
/// Served from memory; the same bytes were written to `CHART_PATH` at startup.
pub async fn get_visualization(
    State(snapshot): State<Arc<Snapshot>>,
) -> Result<impl IntoResponse, AppError> {
    let chart = snapshot.report()?.chart.clone();

    Ok(([(header::CONTENT_TYPE, "image/png")], chart))
}

/// Fallback for unknown paths.
pub async fn not_found() -> AppError {
    AppError::NotFound("Not Found".to_string())
}
