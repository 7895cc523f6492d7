//! HTTP client helpers for tests.

use rerank::gateway::{ErrorResponse, HealthResponse, ReadyResponse, RerankResponse};
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(DEFAULT_TIMEOUT_SECS);

pub struct TestClient {
    client: reqwest::Client,
    base_url: String,
}

impl TestClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        format!("{}/{}", self.base_url, path)
    }

    /// Posts a raw JSON body to `/v1/rerank`.
    pub async fn rerank_raw(
        &self,
        body: &serde_json::Value,
    ) -> Result<reqwest::Response, TestClientError> {
        Ok(self
            .client
            .post(self.url("/v1/rerank"))
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await?)
    }

    pub async fn rerank(
        &self,
        model: &str,
        query: &str,
        documents: &[&str],
        top_n: Option<i64>,
    ) -> Result<RerankResponse, TestClientError> {
        let body = serde_json::json!({
            "model": model,
            "query": query,
            "top_n": top_n,
            "documents": documents,
        });

        let resp = self.rerank_raw(&body).await?;
        let status = resp.status().as_u16();

        match status {
            200 => Ok(resp.json().await?),
            _ => {
                let error: ErrorResponse = resp.json().await?;
                Err(TestClientError::Rejected(status, error.detail))
            }
        }
    }

    pub async fn health(&self) -> Result<HealthResponse, TestClientError> {
        let resp = self.client.get(self.url("/healthz")).send().await?;

        if resp.status().is_success() {
            Ok(resp.json().await?)
        } else {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            Err(TestClientError::UnexpectedStatus(status, body))
        }
    }

    pub async fn ready(&self) -> Result<ReadyResponse, TestClientError> {
        let resp = self.client.get(self.url("/ready")).send().await?;

        if resp.status().is_success() {
            Ok(resp.json().await?)
        } else {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            Err(TestClientError::UnexpectedStatus(status, body))
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TestClientError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("Unexpected HTTP status: {0} - Body: {1}")]
    UnexpectedStatus(u16, String),

    #[error("Rejected with {0}: {1}")]
    Rejected(u16, String),
}

impl TestClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            TestClientError::UnexpectedStatus(status, _) | TestClientError::Rejected(status, _) => {
                Some(*status)
            }
            TestClientError::RequestFailed(e) => e.status().map(|s| s.as_u16()),
        }
    }
}
