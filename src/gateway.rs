// src/gateway.rs
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::types::AnalysisRequest;

pub const FALLBACK_ERROR: &str = "Error analyzing news";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnalysisError {
    #[error("{0}")]
    RequestFailed(String),
}

impl AnalysisError {
    fn fallback() -> Self {
        AnalysisError::RequestFailed(FALLBACK_ERROR.to_string())
    }
}

#[async_trait::async_trait]
pub trait Analyzer: Send + Sync {
    /// One best-effort call. No retry, no caching.
    async fn analyze(&self, req: &AnalysisRequest) -> Result<Value, AnalysisError>;
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// `POST {base}/analyze` over HTTP.
#[derive(Clone)]
pub struct HttpGateway {
    http: Client,
    endpoint: String,
}

impl HttpGateway {
    pub fn new(api_base: &str) -> Self {
        Self::with_client(Client::new(), api_base)
    }

    pub fn with_client(http: Client, api_base: &str) -> Self {
        let endpoint = format!("{}/analyze", api_base.trim_end_matches('/'));
        Self { http, endpoint }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait::async_trait]
impl Analyzer for HttpGateway {
    async fn analyze(&self, req: &AnalysisRequest) -> Result<Value, AnalysisError> {
        debug!(endpoint = %self.endpoint, mode = %req.mode(), "sending analysis request");
        let resp = self.http.post(&self.endpoint).json(req).send().await.map_err(|err| {
            warn!(error = %err, "analysis request could not be sent");
            AnalysisError::fallback()
        })?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(|b| b.error)
                .filter(|m| !m.trim().is_empty());
            warn!(%status, server_message = ?message, "analysis service returned an error");
            return Err(message.map(AnalysisError::RequestFailed).unwrap_or_else(AnalysisError::fallback));
        }

        resp.json::<Value>().await.map_err(|err| {
            warn!(error = %err, "analysis response was not valid JSON");
            AnalysisError::fallback()
        })
    }
}
