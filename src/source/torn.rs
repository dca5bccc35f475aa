//! Torn API client
//!
//! Blocking HTTP client for the `user` endpoint.

use std::time::Duration;

use thiserror::Error;

use super::snapshot::Snapshot;
use crate::config::ApiConfig;

/// User-Agent string for all requests
pub const USER_AGENT: &str = concat!("barwatch/", env!("CARGO_PKG_VERSION"));

/// Anything that can produce a snapshot on demand.
///
/// Implementations block; the poller calls them from a worker thread.
pub trait DataSource: Send + Sync {
    fn fetch(&self) -> Result<Snapshot, SourceError>;
}

/// Failures while fetching or decoding a snapshot
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected HTTP status {0}")]
    Status(u16),
    #[error("malformed payload: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("API error {code}: {message}")]
    Api { code: i64, message: String },
    #[error("poll worker failed: {0}")]
    Worker(String),
}

/// Client for `https://api.torn.com/user/`
pub struct TornApi {
    client: reqwest::blocking::Client,
    base_url: String,
    selections: String,
    api_key: String,
}

impl TornApi {
    /// Build a client from configuration
    pub fn new(config: &ApiConfig, api_key: impl Into<String>) -> Result<Self, SourceError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            selections: config.selections.join(","),
            api_key: api_key.into(),
        })
    }

    /// Endpoint without the key, safe to log
    pub fn endpoint(&self) -> String {
        format!("{}/user/?selections={}", self.base_url, self.selections)
    }

    /// Decode a response body, turning API error bodies into errors
    pub fn decode(body: &str) -> Result<Snapshot, SourceError> {
        let snapshot: Snapshot = serde_json::from_str(body)?;
        if let Some(error) = snapshot.error {
            return Err(SourceError::Api {
                code: error.code,
                message: error.message,
            });
        }
        Ok(snapshot)
    }
}

impl DataSource for TornApi {
    fn fetch(&self) -> Result<Snapshot, SourceError> {
        let response = self
            .client
            .get(format!("{}/user/", self.base_url))
            .query(&[("selections", self.selections.as_str()), ("key", self.api_key.as_str())])
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status(status.as_u16()));
        }

        let body = response.text()?;
        Self::decode(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_api_error() {
        let result = TornApi::decode(r#"{"error": {"code": 2, "error": "Incorrect key"}}"#);
        match result {
            Err(SourceError::Api { code, message }) => {
                assert_eq!(code, 2);
                assert_eq!(message, "Incorrect key");
            }
            other => panic!("expected API error, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_malformed_body() {
        assert!(matches!(TornApi::decode("<html>busy</html>"), Err(SourceError::Decode(_))));
        assert!(matches!(
            TornApi::decode(r#"{"bars": {"energy": {"current": "lots"}}}"#),
            Err(SourceError::Decode(_))
        ));
    }

    #[test]
    fn test_endpoint_hides_key() {
        let config = ApiConfig {
            base_url: "https://api.torn.com/".to_string(),
            selections: vec!["bars".to_string(), "cooldowns".to_string()],
            timeout_secs: 5,
        };
        let api = TornApi::new(&config, "secret").unwrap();
        assert_eq!(api.endpoint(), "https://api.torn.com/user/?selections=bars,cooldowns");
        assert!(!api.endpoint().contains("secret"));
    }

    #[test]
    fn test_default_endpoint_requests_racing() {
        let api = TornApi::new(&ApiConfig::default(), "secret").unwrap();
        assert_eq!(
            api.endpoint(),
            "https://api.torn.com/user/?selections=bars,cooldowns,racing"
        );
    }
}
