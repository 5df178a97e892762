//! Fraud API Client
//!
//! HTTP client for the fraud-scoring backend.

use std::time::Duration;

use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::logic::config::DashboardConfig;
use crate::logic::transactions::{ScoredTransaction, Summary};

/// Backend connection settings
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
}

impl From<&DashboardConfig> for ApiConfig {
    fn from(config: &DashboardConfig) -> Self {
        Self {
            base_url: config.api_url.trim_end_matches('/').to_string(),
            timeout_seconds: config.timeout_seconds,
        }
    }
}

// Response types

#[derive(Debug, Deserialize)]
pub struct QueryResponse {
    pub results: Vec<ScoredTransaction>,
}

#[derive(Debug, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Fraud API client
#[derive(Debug, Clone)]
pub struct FraudApiClient {
    config: ApiConfig,
    http_client: reqwest::Client,
}

impl FraudApiClient {
    /// Create new client
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| ApiError::Client(e.to_string()))?;

        Ok(Self { config, http_client })
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Check server health
    pub async fn health_check(&self) -> Result<HealthResponse, ApiError> {
        self.get_json(&["health"], &[]).await
    }

    /// Fetch up to `limit` scored transactions, skipping the first `skip`
    pub async fn query_transactions(&self, limit: usize, skip: usize) -> Result<Vec<ScoredTransaction>, ApiError> {
        let query = [("limit", limit.to_string()), ("skip", skip.to_string())];
        let response: QueryResponse = self.get_json(&["transactions", "query"], &query).await?;

        log::debug!("Fetched {} transactions (limit={}, skip={})", response.results.len(), limit, skip);
        Ok(response.results)
    }

    /// Fetch aggregate fraud counts
    pub async fn summary(&self) -> Result<Summary, ApiError> {
        self.get_json(&["transactions", "summary"], &[]).await
    }

    /// Fetch the raw explanation payload for one transaction.
    ///
    /// Field names vary between backend versions, so the body is returned as
    /// untyped JSON for `logic::explain` to normalize. A body carrying an
    /// `error` field is reported as [`ApiError::Backend`].
    pub async fn explain(&self, transaction_id: &str) -> Result<serde_json::Value, ApiError> {
        let body: serde_json::Value = self
            .get_json(&["transactions", transaction_id, "explain"], &[])
            .await?;

        if let Some(error) = body.get("error").and_then(|e| e.as_str()) {
            return Err(ApiError::Backend(error.to_string()));
        }
        Ok(body)
    }

    /// Base URL plus `segments`, each percent-encoded as a single path segment
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = Url::parse(&self.config.base_url)
            .map_err(|e| ApiError::Client(format!("invalid base URL '{}': {}", self.config.base_url, e)))?;

        url.path_segments_mut()
            .map_err(|_| ApiError::Client(format!("base URL '{}' cannot carry a path", self.config.base_url)))?
            .pop_if_empty()
            .extend(segments);

        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, segments: &[&str], query: &[(&str, String)]) -> Result<T, ApiError> {
        let url = self.endpoint(segments)?;

        let response = self.http_client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        if response.status().is_success() {
            response.json().await
                .map_err(|e| ApiError::Parse(e.to_string()))
        } else {
            Err(ApiError::Status(response.status().as_u16()))
        }
    }
}

/// Backend client errors.
///
/// Callers treat every variant the same way ("backend unavailable"); the
/// distinction only matters for logs.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Server error: {0}")]
    Status(u16),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Backend error: {0}")]
    Backend(String),
    #[error("HTTP client error: {0}")]
    Client(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> FraudApiClient {
        FraudApiClient::new(ApiConfig {
            base_url: server.uri(),
            timeout_seconds: 5,
        })
        .unwrap()
    }

    fn make_results(count: usize) -> serde_json::Value {
        let results: Vec<serde_json::Value> = (0..count)
            .map(|i| {
                serde_json::json!({
                    "tx": {
                        "transaction_id": format!("t{}", i),
                        "user_id": format!("u{}", i),
                        "amount": 100.0 + i as f64,
                        "country": "US",
                        "device": "desktop",
                        "merchant": "grocery",
                        "timestamp": "2024-04-02T08:00:00Z"
                    },
                    "score": 0.2,
                    "label": false
                })
            })
            .collect();
        serde_json::json!({ "results": results })
    }

    #[tokio::test]
    async fn query_sends_limit_and_skip() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/transactions/query"))
            .and(query_param("limit", "100"))
            .and(query_param("skip", "0"))
            .respond_with(ResponseTemplate::new(200).set_body_json(make_results(3)))
            .expect(1)
            .mount(&server)
            .await;

        let records = client_for(&server).query_transactions(100, 0).await.unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[2].id(), "t2");
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/transactions/summary"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = client_for(&server).summary().await.unwrap_err();
        assert_eq!(err, ApiError::Status(503));
    }

    #[tokio::test]
    async fn malformed_body_is_a_parse_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/transactions/query"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = client_for(&server).query_transactions(10, 0).await.unwrap_err();
        assert!(matches!(err, ApiError::Parse(_)));
    }

    #[tokio::test]
    async fn unreachable_server_is_a_network_error() {
        let client = FraudApiClient::new(ApiConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            timeout_seconds: 2,
        })
        .unwrap();

        let err = client.health_check().await.unwrap_err();
        assert!(matches!(err, ApiError::Network(_)));
    }

    #[tokio::test]
    async fn explain_error_body_is_reported() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/transactions/abc/explain"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "error": "model not loaded" })),
            )
            .mount(&server)
            .await;

        let err = client_for(&server).explain("abc").await.unwrap_err();
        assert_eq!(err, ApiError::Backend("model not loaded".to_string()));
    }

    #[tokio::test]
    async fn explain_id_is_escaped_as_one_segment() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/transactions/a%2Fb%3Fc%23d/explain"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "explanations": [] })))
            .expect(1)
            .mount(&server)
            .await;

        let body = client_for(&server).explain("a/b?c#d").await.unwrap();
        assert!(body.get("explanations").is_some());
    }

    #[tokio::test]
    async fn base_url_path_prefix_is_kept() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/health"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "status": "ok" })))
            .mount(&server)
            .await;

        let client = FraudApiClient::new(ApiConfig {
            base_url: format!("{}/api", server.uri()),
            timeout_seconds: 5,
        })
        .unwrap();
        assert_eq!(client.health_check().await.unwrap().status, "ok");
    }

    #[tokio::test]
    async fn invalid_base_url_is_a_client_error() {
        let client = FraudApiClient::new(ApiConfig {
            base_url: "not a url".to_string(),
            timeout_seconds: 1,
        })
        .unwrap();

        let err = client.summary().await.unwrap_err();
        assert!(matches!(err, ApiError::Client(_)));
    }

    #[tokio::test]
    async fn summary_parses_backend_shape() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/transactions/summary"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "fraud_vs_nonfraud": { "fraud": 12, "nonfraud": 88 },
                "total_transactions": 100,
                "fraud_percentage": 12.0
            })))
            .mount(&server)
            .await;

        let summary = client_for(&server).summary().await.unwrap();
        assert_eq!(summary.fraud_vs_nonfraud.fraud, 12);
        assert_eq!(summary.fraud_percentage(), 12.0);
    }
}
