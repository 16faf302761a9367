// src/models/quiz.rs

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::utils::de::{lenient_f64_opt, lenient_i64};

/// One row of the current-quiz feed, read from its `quiz.*` columns.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct QuizMetadata {
    #[serde(deserialize_with = "lenient_i64")]
    pub id: i64,

    /// Topic label, e.g. "Structural Organisation in Animals".
    #[serde(default)]
    pub topic: Option<String>,

    /// Marks awarded per correct answer. The feed ships it as a string.
    #[serde(default, deserialize_with = "lenient_f64_opt")]
    #[validate(range(min = 0.0))]
    pub correct_answer_marks: Option<f64>,
}
