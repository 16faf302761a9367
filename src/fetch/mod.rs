//! Outbound fetching of the quiz feeds.
//!
//! One GET per feed, JSON body or a typed failure. No retries.

mod basic;
mod client;

pub use basic::BasicClient;
pub use client::HttpClient;

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("request to {url} failed: {source}")]
    Transport { url: Url, source: reqwest::Error },

    #[error("{url} answered with status {status}")]
    Status { url: Url, status: StatusCode },

    #[error("{url} did not return valid JSON: {source}")]
    Json { url: Url, source: serde_json::Error },

    #[error("{url} returned an empty payload")]
    Empty { url: Url },
}

/// Fetches `url` and parses the body as JSON.
///
/// # Errors
///
/// Fails on transport errors, non-2xx statuses, bodies that are not JSON and
/// payloads with no data in them (`null`, `[]` or `{}`).
#[tracing::instrument(skip_all, fields(url = %url))]
pub async fn fetch_json<C: HttpClient>(client: &C, url: &Url) -> Result<Value, FetchError> {
    let req = reqwest::Request::new(reqwest::Method::GET, url.clone());
    tracing::debug!(method = %req.method(), "Fetching feed");

    let resp = client.execute(req).await.map_err(|source| {
        tracing::error!(error = %source, "Feed request failed");
        FetchError::Transport {
            url: url.clone(),
            source,
        }
    })?;

    let status = resp.status();
    if !status.is_success() {
        tracing::error!(%status, "Feed answered with an error status");
        return Err(FetchError::Status {
            url: url.clone(),
            status,
        });
    }

    let bytes = resp.bytes().await.map_err(|source| FetchError::Transport {
        url: url.clone(),
        source,
    })?;
    tracing::debug!(bytes = bytes.len(), "Feed body received");

    let value: Value = serde_json::from_slice(&bytes).map_err(|source| {
        tracing::error!(error = %source, "Feed body is not JSON");
        FetchError::Json {
            url: url.clone(),
            source,
        }
    })?;

    if is_empty_payload(&value) {
        tracing::error!("Feed returned no data");
        return Err(FetchError::Empty { url: url.clone() });
    }

    Ok(value)
}

fn is_empty_payload(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}
