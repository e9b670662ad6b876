//! HTTP role source.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use url::Url;

use adjutant_core::constants::{DEFAULT_HTTP_TIMEOUT_SECONDS, DEFAULT_USER_AGENT};
use adjutant_core::error::{AdjutantError, Result};
use adjutant_core::traits::RoleSource;
use adjutant_core::types::RawRole;

use crate::payload::parse_payload;

/// HTTP source configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Role table endpoint
    pub url: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// User agent header
    pub user_agent: String,
}

impl SourceConfig {
    /// Creates a config for the given endpoint with default timeout.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout_seconds: DEFAULT_HTTP_TIMEOUT_SECONDS,
            user_agent: DEFAULT_USER_AGENT.into(),
        }
    }

    /// Overrides the request timeout.
    pub fn with_timeout(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = timeout_seconds;
        self
    }

    /// Parses and checks the endpoint URL.
    pub fn endpoint(&self) -> Result<Url> {
        let url = Url::parse(self.url.trim())?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(AdjutantError::Config(format!(
                "unsupported role source scheme '{}'",
                other
            ))),
        }
    }
}

/// Fetches the role table from an HTTP endpoint.
pub struct HttpRoleSource {
    endpoint: Url,
    http_client: reqwest::Client,
}

impl HttpRoleSource {
    /// Creates a source from the given config.
    pub fn with_config(config: SourceConfig) -> Result<Self> {
        let endpoint = config.endpoint()?;
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(config.user_agent)
            .build()
            .map_err(|e| AdjutantError::Config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            endpoint,
            http_client,
        })
    }

    /// Creates a source for the given endpoint with default settings.
    pub fn new(url: impl Into<String>) -> Result<Self> {
        Self::with_config(SourceConfig::new(url))
    }

    /// The endpoint this source reads.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl RoleSource for HttpRoleSource {
    #[instrument(skip(self), fields(url = %self.endpoint))]
    async fn fetch_roles(&self) -> Result<Vec<RawRole>> {
        let response = self
            .http_client
            .get(self.endpoint.clone())
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AdjutantError::Timeout(e.to_string())
                } else {
                    AdjutantError::TransportFailure(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            return Err(AdjutantError::HttpStatus {
                status: response.status().as_u16(),
                url: self.endpoint.to_string(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| AdjutantError::TransportFailure(e.to_string()))?;

        let roles = parse_payload(&body)?;
        debug!(records = roles.len(), bytes = body.len(), "Fetched role table");
        Ok(roles)
    }

    fn describe(&self) -> String {
        self.endpoint.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn source_for(server: &MockServer) -> HttpRoleSource {
        HttpRoleSource::new(format!("{}/roles", server.uri())).unwrap()
    }

    #[test]
    fn test_config_rejects_bad_url() {
        assert!(HttpRoleSource::new("not a url").is_err());
        assert!(matches!(
            HttpRoleSource::new("ftp://roles.example.com/table"),
            Err(AdjutantError::Config(_))
        ));
    }

    #[test]
    fn test_config_builder() {
        let config = SourceConfig::new("https://roles.example.com/table").with_timeout(3);
        assert_eq!(config.timeout_seconds, 3);
        assert!(config.user_agent.starts_with("adjutant/"));
        assert!(config.endpoint().is_ok());
    }

    #[tokio::test]
    async fn test_fetch_roles() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/roles"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "roles": [
                    {"name": "Project Manager", "isActive": true, "isDeliverable": true},
                    {"name": "Reviewer", "isActive": false}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let roles = source_for(&server).await.fetch_roles().await.unwrap();

        assert_eq!(roles.len(), 2);
        assert_eq!(roles[0].is_deliverable, Some(true));
    }

    #[tokio::test]
    async fn test_fetch_non_success_is_transport_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/roles"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = source_for(&server).await.fetch_roles().await.unwrap_err();

        assert!(err.is_transport_failure());
        assert!(matches!(err, AdjutantError::HttpStatus { status: 503, .. }));
    }

    #[tokio::test]
    async fn test_fetch_malformed_body_is_parse_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/roles"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{\"roles\": [oops"))
            .mount(&server)
            .await;

        let err = source_for(&server).await.fetch_roles().await.unwrap_err();
        assert!(err.is_parse_failure());
    }

    #[tokio::test]
    async fn test_fetch_unreachable() {
        // Nothing listens on port 9 on a test host.
        let source = HttpRoleSource::with_config(SourceConfig::new("http://127.0.0.1:9/roles").with_timeout(2)).unwrap();
        let err = source.fetch_roles().await.unwrap_err();
        assert!(err.is_transport_failure());
    }
}
