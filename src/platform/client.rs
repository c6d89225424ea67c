//! HTTP client for the tikwm metadata API

use crate::core::media_info::{ApiResponse, MediaRecord};
use crate::error::TtError;
use reqwest::{Client, ClientBuilder};
use std::time::Duration;
use tracing::{debug, info};

/// Public tikwm endpoint
pub const DEFAULT_API_ENDPOINT: &str = "https://www.tikwm.com/api/";

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Connect timeout, transport default when unset
    pub connect_timeout: Option<Duration>,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            connect_timeout: None,
            user_agent: format!("ttget/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpClientConfig {
    /// Build a reqwest client from this configuration
    pub fn build(&self) -> Result<Client, TtError> {
        let mut builder = ClientBuilder::new()
            .user_agent(&self.user_agent)
            .gzip(true)
            .brotli(true);

        // No total timeout here: the client also streams media bodies
        if let Some(timeout) = self.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }

        Ok(builder.build()?)
    }
}

/// Client for the tikwm lookup endpoint
#[derive(Debug, Clone)]
pub struct TikwmClient {
    client: Client,
    endpoint: String,
    timeout: Option<Duration>,
}

impl TikwmClient {
    /// Create a client for the public endpoint
    pub fn new() -> Result<Self, TtError> {
        Self::with_config(DEFAULT_API_ENDPOINT, &HttpClientConfig::default())
    }

    /// Create a client for a custom endpoint
    pub fn with_config(endpoint: &str, config: &HttpClientConfig) -> Result<Self, TtError> {
        Ok(Self::with_client(endpoint, config.build()?))
    }

    /// Reuse an existing reqwest client
    pub fn with_client(endpoint: &str, client: Client) -> Self {
        Self {
            client,
            endpoint: endpoint.to_string(),
            timeout: None,
        }
    }

    /// Bound each lookup, response body included
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Lookup endpoint in use
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Resolve a link into its media record.
    ///
    /// The link is sent as is; only the API decides whether it is valid.
    pub async fn resolve(&self, link: &str) -> Result<MediaRecord, TtError> {
        info!("Resolving {}", link);

        let mut request = self
            .client
            .post(&self.endpoint)
            .form(&[("url", link), ("hd", "1")]);
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }
        let response = request.send().await?;

        let status = response.status();
        let body = response.bytes().await?;
        debug!("Lookup answered {} with {} bytes", status, body.len());

        let envelope = ApiResponse::from_slice(&body)?;
        debug!(
            "Envelope code={} msg={:?} processed_time={}",
            envelope.code, envelope.msg, envelope.processed_time
        );

        envelope.into_record()
    }
}
