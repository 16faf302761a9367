// src/analysis/stats.rs

use thiserror::Error;

use crate::{
    analysis::table::ParseError,
    models::{historical::HistoricalRecord, quiz::QuizMetadata, submission::MergedSubmission},
};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum StatsError {
    #[error("cannot average '{0}': the column has no values")]
    EmptyColumn(&'static str),
}

/// Arithmetic mean. An empty column is an error rather than NaN.
pub fn mean(column: &'static str, values: &[f64]) -> Result<f64, StatsError> {
    if values.is_empty() {
        return Err(StatsError::EmptyColumn(column));
    }
    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// Parses "NN.NN%" (surrounding whitespace allowed) into NN.NN.
pub fn parse_accuracy(raw: &str) -> Result<f64, ParseError> {
    let invalid = || ParseError::Accuracy {
        value: raw.to_string(),
    };

    let number = raw.trim().strip_suffix('%').ok_or_else(invalid)?.trim();

    match number.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(invalid()),
    }
}

/// The four headline numbers of one snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    /// Mean submission score.
    pub average_score: f64,
    /// Mean submission accuracy, in percent.
    pub average_accuracy: f64,
    pub historical_avg_score: f64,
    /// Mean of the current quiz's `correct_answer_marks`.
    pub current_avg_score: f64,
}

impl Summary {
    pub fn compute(
        merged: &[MergedSubmission],
        quizzes: &[QuizMetadata],
        historical: &[HistoricalRecord],
    ) -> Result<Self, StatsError> {
        let scores: Vec<f64> = merged.iter().map(|m| m.score).collect();
        let accuracies: Vec<f64> = merged.iter().map(|m| m.accuracy).collect();
        let historical_scores: Vec<f64> = historical.iter().map(|h| h.score).collect();
        let marks: Vec<f64> = quizzes
            .iter()
            .filter_map(|q| q.correct_answer_marks)
            .collect();

        Ok(Self {
            average_score: mean("score", &scores)?,
            average_accuracy: mean("accuracy", &accuracies)?,
            historical_avg_score: mean("historical score", &historical_scores)?,
            current_avg_score: mean("quiz.correct_answer_marks", &marks)?,
        })
    }

    pub fn accuracy_label(&self) -> String {
        format!("{:.2}%", self.average_accuracy)
    }
}
