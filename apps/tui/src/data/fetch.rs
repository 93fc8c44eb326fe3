use crate::config::Config;
use serde_json::Value;
use thiserror::Error;

/// Load-level failures. The message of whichever variant occurred is what
/// the error view shows verbatim.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("API returned {status}: {reason}")]
    Http { status: u16, reason: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Failed to decode response body: {0}")]
    Decode(String),

    #[error("Invalid data format received from API")]
    BadPayload,
}

/// Thin wrapper around the HTTP client for the sheet endpoint. The endpoint
/// is an opaque collaborator: one GET, one JSON document back.
#[derive(Debug, Clone)]
pub struct Fetcher {
    http: reqwest::Client,
    url: String,
}

impl Fetcher {
    pub fn new(config: &Config) -> Result<Self, DataError> {
        let http = reqwest::Client::builder()
            .user_agent(format!("sheetdeck/{}", env!("CARGO_PKG_VERSION")))
            .timeout(config.fetch_timeout)
            .build()
            .map_err(|err| DataError::Network(err.to_string()))?;

        Ok(Self {
            http,
            url: config.api_url.clone(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Issues the single fetch. Non-2xx statuses and undecodable bodies are
    /// load-level errors; interpretation of the document is the store's job.
    pub async fn fetch_payload(&self) -> Result<Value, DataError> {
        let response = self
            .http
            .get(&self.url)
            .send()
            .await
            .map_err(|err| DataError::Network(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DataError::Http {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("unknown").to_string(),
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|err| DataError::Decode(err.to_string()))
    }
}
