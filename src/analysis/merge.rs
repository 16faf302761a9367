// src/analysis/merge.rs

//! Left join of submissions onto quiz metadata.

use std::collections::HashMap;

use thiserror::Error;

use crate::{
    analysis::{
        stats::parse_accuracy,
        table::{ParseError, Table},
    },
    models::{
        quiz::QuizMetadata,
        submission::{MergedSubmission, SubmissionRecord, UNKNOWN_TOPIC},
    },
};

pub const SUBMISSION_KEY: &str = "quiz_id";
pub const METADATA_KEY: &str = "id";

#[derive(Debug, Error)]
pub enum JoinError {
    #[error("{table} has no '{column}' column to join on")]
    MissingColumn { table: String, column: &'static str },

    #[error("quiz id {id} appears more than once in the quiz metadata")]
    DuplicateKey { id: i64 },
}

#[derive(Debug, Error)]
pub enum MergeError {
    #[error(transparent)]
    Join(#[from] JoinError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Joins every submission to at most one quiz by `quiz_id == id`.
///
/// Every submission shows up exactly once in the output, in input order.
/// Unmatched submissions and quizzes without a topic get [`UNKNOWN_TOPIC`].
pub fn left_join(
    submissions: &Table,
    metadata: &Table,
) -> Result<Vec<MergedSubmission>, MergeError> {
    let quizzes = load_quizzes(metadata)?;
    join_quizzes(submissions, &quizzes)
}

/// Reads and validates the right-hand side of the join.
pub fn load_quizzes(metadata: &Table) -> Result<Vec<QuizMetadata>, MergeError> {
    if !metadata.has_column(METADATA_KEY) {
        return Err(JoinError::MissingColumn {
            table: metadata.name().to_string(),
            column: METADATA_KEY,
        }
        .into());
    }
    if !metadata.has_column("topic") {
        tracing::warn!(
            table = metadata.name(),
            "No topic column in quiz metadata, using '{}'",
            UNKNOWN_TOPIC
        );
    }

    Ok(metadata.validated_records()?)
}

/// Joins the submission table against already loaded quizzes.
pub fn join_quizzes(
    submissions: &Table,
    quizzes: &[QuizMetadata],
) -> Result<Vec<MergedSubmission>, MergeError> {
    if !submissions.has_column(SUBMISSION_KEY) {
        return Err(JoinError::MissingColumn {
            table: submissions.name().to_string(),
            column: SUBMISSION_KEY,
        }
        .into());
    }

    let by_id = index_by_id(quizzes)?;
    let records: Vec<SubmissionRecord> = submissions.records()?;

    let mut merged = Vec::with_capacity(records.len());
    let mut unmatched = 0usize;

    for record in records {
        let quiz = record.quiz_id.and_then(|id| by_id.get(&id));
        if quiz.is_none() {
            unmatched += 1;
        }

        let topic = quiz
            .and_then(|q| q.topic.clone())
            .unwrap_or_else(|| UNKNOWN_TOPIC.to_string());

        merged.push(MergedSubmission {
            quiz_id: record.quiz_id,
            score: record.score,
            accuracy: parse_accuracy(&record.accuracy)?,
            topic,
        });
    }

    tracing::debug!(rows = merged.len(), unmatched, "Submissions merged with quiz metadata");

    Ok(merged)
}

fn index_by_id(quizzes: &[QuizMetadata]) -> Result<HashMap<i64, &QuizMetadata>, JoinError> {
    let mut by_id = HashMap::with_capacity(quizzes.len());
    for quiz in quizzes {
        if by_id.insert(quiz.id, quiz).is_some() {
            return Err(JoinError::DuplicateKey { id: quiz.id });
        }
    }
    Ok(by_id)
}
