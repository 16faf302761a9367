// src/models/insights.rs

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Response body for `GET /insights`.
#[derive(Debug, Serialize)]
pub struct InsightsResponse {
    pub average_score: f64,
    /// Two decimals followed by "%", e.g. "81.83%".
    pub average_accuracy: String,
}

/// Response body for `GET /comparison`.
#[derive(Debug, Serialize)]
pub struct ComparisonResponse {
    pub current_avg_score: f64,
    pub historical_avg_score: f64,
}

/// Response body for `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub generated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
