use async_trait::async_trait;
use reqwest::{Request, Response};

/// Executes outbound requests for the feed fetcher.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}
