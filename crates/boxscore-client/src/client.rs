//! Scoring service HTTP client.

use std::path::Path;

use reqwest::Client;
use tracing::debug;
use url::Url;

use boxscore_models::RawDetections;

use crate::config::ScoringConfig;
use crate::envelope::{decode_envelope, Parameters, ScoreRequestItem};
use crate::error::{ClientError, ClientResult};

/// Client for the remote scoring endpoint.
///
/// Stateless between calls; cloning shares the underlying connection pool,
/// so independent scoring calls may run concurrently on clones.
#[derive(Debug, Clone)]
pub struct ScoringClient {
    http: Client,
    config: ScoringConfig,
}

impl ScoringClient {
    /// Create a new scoring client.
    pub fn new(config: ScoringConfig) -> ClientResult<Self> {
        Url::parse(&config.endpoint).map_err(|source| ClientError::InvalidEndpoint {
            url: config.endpoint.clone(),
            source,
        })?;

        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(ClientError::Transport)?;

        Ok(Self { http, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> ClientResult<Self> {
        Self::new(ScoringConfig::from_env())
    }

    /// Score an image stored on the local filesystem.
    pub async fn score_file(
        &self,
        path: impl AsRef<Path>,
        parameters: Parameters,
    ) -> ClientResult<RawDetections> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| ClientError::ImageRead {
                path: path.to_path_buf(),
                source,
            })?;
        self.score_bytes(&bytes, parameters).await
    }

    /// Fetch an image over HTTP and score it.
    pub async fn score_url(&self, url: &str, parameters: Parameters) -> ClientResult<RawDetections> {
        let bytes = self.fetch_image_bytes(url).await?;
        self.score_bytes(&bytes, parameters).await
    }

    /// Score raw image bytes.
    ///
    /// Posts the base64-wrapped request envelope and unwraps the
    /// double-encoded response into a typed payload.
    pub async fn score_bytes(
        &self,
        image: &[u8],
        parameters: Parameters,
    ) -> ClientResult<RawDetections> {
        let body = self.score_bytes_raw(image, parameters).await?;
        Ok(RawDetections::from_json(&body)?)
    }

    /// Score raw image bytes, returning the inner payload text verbatim.
    pub async fn score_bytes_raw(
        &self,
        image: &[u8],
        parameters: Parameters,
    ) -> ClientResult<String> {
        let item = ScoreRequestItem::from_image_bytes(image, parameters);

        debug!(
            endpoint = %self.config.endpoint,
            image_bytes = image.len(),
            "Sending scoring request"
        );

        let mut request = self
            .http
            .post(&self.config.endpoint)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .json(&[item]);

        if let Some(token) = &self.config.auth_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(ClientError::Transport)?;

        let status = response.status();
        let body = response.text().await.map_err(ClientError::Transport)?;
        if !status.is_success() {
            return Err(ClientError::Status { status, body });
        }

        decode_envelope(&body)
    }

    /// Download image bytes from a URL, failing loudly on non-2xx status.
    pub async fn fetch_image_bytes(&self, url: &str) -> ClientResult<Vec<u8>> {
        debug!(url, "Fetching image");

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(ClientError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::ImageFetch {
                url: url.to_string(),
                status,
            });
        }

        let bytes = response.bytes().await.map_err(ClientError::Transport)?;
        Ok(bytes.to_vec())
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }
}
