// src/models/historical.rs

use serde::{Deserialize, Serialize};

/// A past attempt from the historical feed. Only the score is used.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoricalRecord {
    pub score: f64,
}
