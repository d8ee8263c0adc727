//! Reqwest-backed dispatcher.
//!
//! Resolves descriptors against the configured base URL, injects the
//! `x-token` header and serializes JSON bodies. Any HTTP status comes back as
//! an `HttpResponse`; only failures to obtain a response are errors.

use async_trait::async_trait;
use reqwest::Method;
use tracing::debug;

use crate::config::ClientConfig;
use crate::dispatch::Dispatch;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpResponse, RequestDescriptor};

pub const TOKEN_HEADER: &str = "x-token";

#[derive(Debug, Clone)]
pub struct ReqwestDispatcher {
    client: reqwest::Client,
    config: ClientConfig,
}

impl ReqwestDispatcher {
    /// # Errors
    ///
    /// Returns `ApiError::Transport` if the underlying client cannot be
    /// built (e.g. TLS backend initialization fails).
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            config,
        })
    }

    /// Build a dispatcher from `BOOK_API__*` environment variables.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::new(ClientConfig::load()?)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The token to send, if any. An empty token is treated as unset.
    fn token(&self) -> Option<&str> {
        self.config.token.as_deref().filter(|token| !token.is_empty())
    }
}

#[async_trait]
impl Dispatch for ReqwestDispatcher {
    type Output = HttpResponse;
    type Error = ApiError;

    async fn dispatch(&self, request: RequestDescriptor) -> Result<HttpResponse, ApiError> {
        let url = request.resolve_url(&self.config.base_url)?;
        debug!(method = %request.method, %url, "dispatching book request");

        let mut builder = self.client.request(to_reqwest_method(request.method), url);
        if let Some(token) = self.token() {
            builder = builder.header(TOKEN_HEADER, token);
        }
        if let Some(data) = &request.data {
            builder = builder.json(data);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();
        let body = response.text().await?;
        debug!(status, bytes = body.len(), "book request completed");

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

fn to_reqwest_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Delete => Method::DELETE,
    }
}
