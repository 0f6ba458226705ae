//! Keystone console API client

pub mod error;
pub mod memberships;
pub mod resources;
pub mod users;

use error::ClientError;
use reqwest::{Client, ClientBuilder, Method, RequestBuilder, header};
use std::time::Duration;
use url::Url;

const DEFAULT_USER_AGENT: &str = concat!("keystone-client/", env!("CARGO_PKG_VERSION"));

/// Console API client
#[derive(Clone)]
pub struct ConsoleClient {
    client: Client,
    base_url: String,
    base: Url,
    api_key: Option<String>,
}

impl std::fmt::Debug for ConsoleClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsoleClient")
            .field("base_url", &self.base_url)
            .field("authenticated", &self.api_key.is_some())
            .finish_non_exhaustive()
    }
}

impl ConsoleClient {
    /// Create a new client with default configuration
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::builder().base_url(base_url).build()
    }

    /// Create a new client builder
    pub fn builder() -> ConsoleClientBuilder {
        ConsoleClientBuilder::default()
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Create an authenticated request for the path built from `segments`.
    ///
    /// Each segment is percent-encoded on its own, so an id can never add,
    /// remove or climb out of path segments.
    pub fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder, ClientError> {
        let url = self.endpoint(segments)?;
        let mut request = self.client.request(method, url);

        if let Some(api_key) = &self.api_key {
            request = request.header(header::AUTHORIZATION, format!("Bearer {api_key}"));
        }

        Ok(request)
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        // Url drops dot segments and an empty one would hit the parent collection
        if let Some(segment) = segments.iter().find(|s| matches!(**s, "" | "." | "..")) {
            return Err(ClientError::InvalidPathSegment((*segment).to_string()));
        }

        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| {
                ClientError::Configuration(format!("{} cannot be a base URL", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments.iter().copied());
        Ok(url)
    }

    /// Execute a request and decode the JSON body
    pub async fn execute<T: serde::de::DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, ClientError> {
        let response = Self::send(request).await?;
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Execute a request whose response body carries nothing of interest
    pub async fn execute_empty(&self, request: RequestBuilder) -> Result<(), ClientError> {
        Self::send(request).await.map(drop)
    }

    async fn send(request: RequestBuilder) -> Result<reqwest::Response, ClientError> {
        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            Ok(response)
        } else {
            let message = response.text().await.unwrap_or_else(|_| status.to_string());
            tracing::debug!(status = status.as_u16(), %message, "request rejected");
            Err(ClientError::from_status(status, message))
        }
    }
}

/// Builder for ConsoleClient
#[derive(Default)]
pub struct ConsoleClientBuilder {
    base_url: Option<String>,
    api_key: Option<String>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl ConsoleClientBuilder {
    /// Set the base URL
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the bearer token sent with every request
    #[must_use]
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the request timeout
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the user agent
    #[must_use]
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Build the client
    pub fn build(self) -> Result<ConsoleClient, ClientError> {
        let base_url = self
            .base_url
            .ok_or_else(|| ClientError::Configuration("base_url is required".into()))?;

        let base = Url::parse(&base_url)
            .map_err(|e| ClientError::Configuration(format!("invalid base_url {base_url}: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(ClientError::Configuration(format!(
                "base_url {base_url} cannot carry a path"
            )));
        }

        let base_url = base_url.trim_end_matches('/').to_string();

        let mut client_builder = ClientBuilder::new()
            .user_agent(self.user_agent.unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()));

        if let Some(timeout) = self.timeout {
            client_builder = client_builder.timeout(timeout);
        }

        let client = client_builder.build()?;

        Ok(ConsoleClient {
            client,
            base_url,
            base,
            api_key: self.api_key,
        })
    }
}
