/*
[INPUT]:  HTTP configuration (base URL, timeouts) and per-call credentials
[OUTPUT]: Configured reqwest client ready for API calls
[POS]:    HTTP layer - core client implementation
[UPDATE]: When adding connection options or changing client behavior
*/

use crate::auth::Credentials;
use crate::http::{AtiError, Result};
use reqwest::{Client, Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;
use uuid::Uuid;

/// Header carrying a per-request correlation id
const REQUEST_ID_HEADER: &str = "x-request-id";

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

/// HTTP client for the ATI backend API routes
#[derive(Debug, Clone)]
pub struct AtiClient {
    http_client: Client,
    base_url: Url,
}

impl AtiClient {
    /// Create a new client with default configuration
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_config(base_url, ClientConfig::default())
    }

    /// Create a new client with custom configuration
    pub fn with_config(base_url: &str, config: ClientConfig) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()?;

        let mut base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(AtiError::Config(format!(
                "server url cannot be used as a base: {base_url}"
            )));
        }
        // Routes are joined relative to the base, so a path prefix must end in '/'.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            http_client,
            base_url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build full URL for an API route
    fn url(&self, endpoint: &str) -> Result<Url> {
        Ok(self.base_url.join(endpoint)?)
    }

    /// Build an authenticated request builder for an API route
    pub(crate) fn request(
        &self,
        method: Method,
        endpoint: &str,
        credentials: &Credentials,
    ) -> Result<RequestBuilder> {
        let url = self.url(endpoint)?;
        tracing::debug!(%method, %url, "building request");
        let builder = self
            .http_client
            .request(method, url)
            .header(REQUEST_ID_HEADER, Uuid::new_v4().to_string());
        Ok(credentials.apply(builder))
    }

    /// Send a request and decode a JSON body from a 2xx response.
    pub(crate) async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let body = self.send_checked(builder).await?;
        serde_json::from_str(&body).map_err(|err| {
            tracing::warn!(error = %err, "response body did not match expected shape");
            AtiError::InvalidResponse(format!("unexpected response body: {err}"))
        })
    }

    /// Send a request whose response body is irrelevant.
    pub(crate) async fn send_empty(&self, builder: RequestBuilder) -> Result<()> {
        self.send_checked(builder).await.map(|_| ())
    }

    async fn send_checked(&self, builder: RequestBuilder) -> Result<String> {
        let response = builder.send().await?;
        let status = response.status();
        let url = response.url().clone();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::debug!(%url, status = status.as_u16(), "request failed");
            return Err(AtiError::from_response(status, &body));
        }

        tracing::debug!(%url, status = status.as_u16(), bytes = body.len(), "request succeeded");
        Ok(body)
    }
}
