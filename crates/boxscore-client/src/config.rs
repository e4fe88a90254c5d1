//! Scoring client configuration.

use std::time::Duration;

/// Configuration for the scoring client.
///
/// Explicit and passed in at construction; the client keeps no ambient
/// global state.
#[derive(Debug, Clone)]
pub struct ScoringConfig {
    /// URL of the scoring endpoint (the full POST target)
    pub endpoint: String,
    /// Bearer token for the `Authorization` header, if the service needs one
    pub auth_token: Option<String>,
    /// Request timeout, applied to both scoring and image fetches
    pub timeout: Duration,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8080/score".to_string(),
            auth_token: None,
            timeout: Duration::from_secs(30),
        }
    }
}

impl ScoringConfig {
    /// Create a config for the given endpoint with default timeout.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Self::default()
        }
    }

    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            endpoint: std::env::var("BOXSCORE_ENDPOINT")
                .unwrap_or_else(|_| "http://localhost:8080/score".to_string()),
            auth_token: std::env::var("BOXSCORE_AUTH_TOKEN").ok(),
            timeout: Duration::from_secs(
                std::env::var("BOXSCORE_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(30),
            ),
        }
    }

    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = ScoringConfig::default();
        assert_eq!(config.endpoint, "http://localhost:8080/score");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.auth_token.is_none());
    }

    #[test]
    fn test_builder_helpers() {
        let config = ScoringConfig::new("https://scoring.example/score")
            .with_auth_token("secret")
            .with_timeout(Duration::from_secs(5));
        assert_eq!(config.endpoint, "https://scoring.example/score");
        assert_eq!(config.auth_token.as_deref(), Some("secret"));
        assert_eq!(config.timeout, Duration::from_secs(5));
    }
}
