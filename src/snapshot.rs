// src/snapshot.rs

//! One full fetch → merge → summarize → render pass.
//!
//! A [`Snapshot`] is built once and never mutated. A refresh would build a
//! new one and swap the `Arc` held by the app state.

use std::path::Path;

use axum::body::Bytes;
use chrono::{DateTime, Utc};
use serde_json::Value;
use thiserror::Error;

use crate::{
    analysis::{
        chart::{self, BINS, ChartError, Histogram},
        merge::{self, MergeError},
        stats::{StatsError, Summary},
        table::{ParseError, Table},
    },
    config::Config,
    error::AppError,
    fetch::{FetchError, HttpClient, fetch_json},
    models::{historical::HistoricalRecord, quiz::QuizMetadata, submission::MergedSubmission},
};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Merge(#[from] MergeError),

    #[error(transparent)]
    Stats(#[from] StatsError),

    #[error(transparent)]
    Chart(#[from] ChartError),
}

/// The three feeds, flattened.
#[derive(Debug, Clone)]
pub struct Sources {
    pub current: Table,
    pub submissions: Table,
    pub historical: Table,
}

impl Sources {
    /// Fetches the feeds one after another. The first failure aborts the pass.
    pub async fn fetch<C: HttpClient>(client: &C, config: &Config) -> Result<Self, PipelineError> {
        let current = fetch_json(client, &config.current_quiz_url).await?;
        let submissions = fetch_json(client, &config.submission_url).await?;
        let historical = fetch_json(client, &config.historical_url).await?;

        Ok(Self::from_payloads(&current, &submissions, &historical)?)
    }

    pub fn from_payloads(
        current: &Value,
        submissions: &Value,
        historical: &Value,
    ) -> Result<Self, ParseError> {
        Ok(Self {
            current: Table::flatten("current", current)?,
            submissions: Table::flatten("submissions", submissions)?,
            historical: Table::flatten("historical", historical)?,
        })
    }

    pub fn tables(&self) -> [&Table; 3] {
        [&self.current, &self.submissions, &self.historical]
    }
}

/// Everything the endpoints serve.
#[derive(Debug, Clone)]
pub struct Report {
    pub summary: Summary,
    pub merged: Vec<MergedSubmission>,
    pub quizzes: Vec<QuizMetadata>,
    pub historical: Vec<HistoricalRecord>,
    pub histogram: Histogram,
    /// PNG bytes, also persisted to the configured chart path.
    pub chart: Bytes,
}

impl Report {
    pub fn build(sources: &Sources, chart_path: &Path) -> Result<Self, PipelineError> {
        // The live feed nests quiz fields under `quiz`.
        let metadata = sources.current.scoped("quiz");
        let quizzes = merge::load_quizzes(&metadata)?;
        let merged = merge::join_quizzes(&sources.submissions, &quizzes)?;
        let historical: Vec<HistoricalRecord> = sources.historical.records()?;

        let summary = Summary::compute(&merged, &quizzes, &historical)?;

        let scores: Vec<f64> = historical.iter().map(|h| h.score).collect();
        let histogram = Histogram::build(&scores, BINS)?;
        let png = chart::render_histogram(&histogram, summary.average_score)?;
        chart::write_chart(chart_path, &png)?;

        Ok(Self {
            summary,
            merged,
            quizzes,
            historical,
            histogram,
            chart: Bytes::from(png),
        })
    }
}

#[derive(Debug)]
enum State {
    Ready(Box<Report>),
    Degraded { reason: String },
}

#[derive(Debug)]
pub struct Snapshot {
    pub generated_at: DateTime<Utc>,
    state: State,
}

impl Snapshot {
    /// Runs one pass. Failures are logged and kept as a degraded snapshot.
    pub async fn build<C: HttpClient>(client: &C, config: &Config) -> Self {
        let result = async {
            let sources = Sources::fetch(client, config).await?;
            for table in sources.tables() {
                tracing::debug!("{}", table.info());
            }
            Report::build(&sources, &config.chart_path)
        }
        .await;

        Self::from_result(result)
    }

    pub fn from_result(result: Result<Report, PipelineError>) -> Self {
        let state = match result {
            Ok(report) => {
                tracing::info!(
                    submissions = report.merged.len(),
                    historical = report.historical.len(),
                    average_score = report.summary.average_score,
                    "Snapshot ready"
                );
                State::Ready(Box::new(report))
            }
            Err(e) => {
                tracing::error!(error = %e, "Snapshot build failed, serving degraded state");
                State::Degraded {
                    reason: e.to_string(),
                }
            }
        };

        Self {
            generated_at: Utc::now(),
            state,
        }
    }

    /// The report, or 503 when the pass failed.
    pub fn report(&self) -> Result<&Report, AppError> {
        match &self.state {
            State::Ready(report) => Ok(&**report),
            State::Degraded { reason } => Err(AppError::ServiceUnavailable(format!(
                "quiz data unavailable: {reason}"
            ))),
        }
    }

    pub fn degraded_reason(&self) -> Option<&str> {
        match &self.state {
            State::Ready(_) => None,
            State::Degraded { reason } => Some(reason.as_str()),
        }
    }
}
