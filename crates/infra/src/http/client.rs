use std::time::Duration;

use reqwest::{Client as ReqwestClient, Method, RequestBuilder, Response};
use slotwise_domain::constants::DEFAULT_PROVIDER_TIMEOUT_SECS;
use slotwise_domain::SlotwiseError;
use tracing::debug;

use crate::errors::conversions::status_error;
use crate::errors::InfraError;

/// HTTP client with a per-request timeout. Requests are sent exactly once.
#[derive(Clone)]
pub struct HttpClient {
    client: ReqwestClient,
}

impl HttpClient {
    /// Start building a new HTTP client.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Convenience constructor with default configuration.
    pub fn new() -> Result<Self, SlotwiseError> {
        Self::builder().build()
    }

    /// Create a request builder using the underlying reqwest client.
    pub fn request<U>(&self, method: Method, url: U) -> RequestBuilder
    where
        U: reqwest::IntoUrl,
    {
        self.client.request(method, url)
    }

    /// Execute the request once and return the raw response.
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response, SlotwiseError> {
        let request = builder.build().map_err(|err| SlotwiseError::from(InfraError::from(err)))?;

        let method = request.method().clone();
        let url = request.url().clone();
        debug!(%method, url = %redact_query(&url), "sending HTTP request");

        match self.client.execute(request).await {
            Ok(response) => {
                debug!(%method, url = %redact_query(&url), status = %response.status(), "received HTTP response");
                Ok(response)
            }
            Err(err) => {
                debug!(%method, url = %redact_query(&url), error = %err, "HTTP request failed");
                Err(SlotwiseError::from(InfraError::from(err)))
            }
        }
    }

    /// Execute the request and turn any non-success status into a domain
    /// error carrying the response body.
    pub async fn send_checked(&self, builder: RequestBuilder) -> Result<Response, SlotwiseError> {
        let response = self.send(builder).await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(status_error(status, Some(&body)))
    }
}

fn redact_query(url: &reqwest::Url) -> String {
    let mut shown = url.clone();
    shown.set_query(None);
    shown.to_string()
}

/// Builder for [`HttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder {
    timeout: Duration,
    user_agent: Option<String>,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_PROVIDER_TIMEOUT_SECS),
            user_agent: None,
        }
    }
}

impl HttpClientBuilder {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    pub fn build(self) -> Result<HttpClient, SlotwiseError> {
        let mut builder = ReqwestClient::builder().timeout(self.timeout).no_proxy();

        if let Some(agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }

        let client = builder.build().map_err(|err| SlotwiseError::from(InfraError::from(err)))?;

        Ok(HttpClient { client })
    }
}
