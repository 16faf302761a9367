// src/models/submission.rs

use serde::{Deserialize, Serialize};

use crate::utils::de::lenient_i64_opt;

/// Placeholder topic for submissions with no matching quiz metadata.
pub const UNKNOWN_TOPIC: &str = "Unknown";

/// One quiz attempt as shipped by the submission feed.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmissionRecord {
    /// Foreign key into the quiz metadata. A null id never matches.
    #[serde(default, deserialize_with = "lenient_i64_opt")]
    pub quiz_id: Option<i64>,

    pub score: f64,

    /// Percentage string such as "90.00%" or " 90 %".
    pub accuracy: String,
}

/// A submission left-joined with its quiz metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergedSubmission {
    pub quiz_id: Option<i64>,
    pub score: f64,
    /// Accuracy in percent, already parsed.
    pub accuracy: f64,
    pub topic: String,
}
