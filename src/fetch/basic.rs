use super::{FetchError, client::HttpClient};
use async_trait::async_trait;

/// Plain `reqwest` client with no auth and no timeout.
pub struct BasicClient(reqwest::Client);

impl BasicClient {
    pub fn new(accept_invalid_certs: bool) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .danger_accept_invalid_certs(accept_invalid_certs)
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self(client))
    }
}

#[async_trait]
impl HttpClient for BasicClient {
    async fn execute(&self, req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        self.0.execute(req).await
    }
}
