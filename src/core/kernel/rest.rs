use crate::core::errors::{ExchangeError, TransientKind};
use crate::core::types::Exchange;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{instrument, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Delete,
}

impl HttpMethod {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Delete => "DELETE",
        }
    }

    fn as_reqwest(self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
            Self::Post => reqwest::Method::POST,
            Self::Delete => reqwest::Method::DELETE,
        }
    }
}

/// A fully-resolved outbound request: absolute URL, auth headers attached,
/// signature already in place where one is required.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub exchange: Exchange,
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub query: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    pub fn new(exchange: Exchange, method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            exchange,
            method,
            url: url.into(),
            headers: Vec::new(),
            query: Vec::new(),
            body: None,
        }
    }

    #[must_use]
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    #[must_use]
    pub fn with_query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self
    }
}

/// Transport-only HTTP interface. One implementation talks to the real
/// exchanges; tests substitute a recorder.
#[async_trait]
pub trait RestClient: Send + Sync {
    /// Issue the request and return the parsed JSON body.
    ///
    /// # Errors
    /// * `TransientNetwork` for DNS/connect/timeout failures
    /// * `ApiError` for any non-2xx status (left to the adapter to classify)
    /// * `MalformedResponse` for a 2xx with an empty or non-JSON body
    async fn execute(&self, request: &HttpRequest) -> Result<Value, ExchangeError>;
}

/// Configuration for the REST client
#[derive(Clone, Debug)]
pub struct RestClientConfig {
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// User agent string to include in requests
    pub user_agent: String,
}

impl Default for RestClientConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            user_agent: "exlink/0.1".to_string(),
        }
    }
}

impl RestClientConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the request timeout
    #[must_use]
    pub const fn with_timeout(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = timeout_seconds;
        self
    }

    /// Set the user agent string
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: String) -> Self {
        self.user_agent = user_agent;
        self
    }
}

/// Builder for creating REST client instances
pub struct RestClientBuilder {
    config: RestClientConfig,
}

impl RestClientBuilder {
    #[must_use]
    pub fn new(config: RestClientConfig) -> Self {
        Self { config }
    }

    /// Build the REST client
    pub fn build(self) -> Result<ReqwestRest, ExchangeError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(self.config.timeout_seconds))
            .user_agent(&self.config.user_agent)
            .build()
            .map_err(|e| {
                ExchangeError::InvalidParameters(format!("failed to build HTTP client: {e}"))
            })?;

        Ok(ReqwestRest {
            client,
            config: self.config,
        })
    }
}

/// Implementation of `RestClient` using reqwest
#[derive(Clone, Debug)]
pub struct ReqwestRest {
    client: Client,
    config: RestClientConfig,
}

impl ReqwestRest {
    pub fn new() -> Result<Self, ExchangeError> {
        RestClientBuilder::new(RestClientConfig::default()).build()
    }

    pub fn with_config(config: RestClientConfig) -> Result<Self, ExchangeError> {
        RestClientBuilder::new(config).build()
    }

    pub const fn config(&self) -> &RestClientConfig {
        &self.config
    }
}

fn classify_transport_error(e: &reqwest::Error) -> ExchangeError {
    let kind = if e.is_timeout() {
        TransientKind::Timeout
    } else {
        TransientKind::Connect
    };
    ExchangeError::TransientNetwork {
        kind,
        detail: e.to_string(),
    }
}

#[async_trait]
impl RestClient for ReqwestRest {
    #[instrument(
        skip(self, request),
        fields(exchange = %request.exchange, method = request.method.as_str(), url = %request.url)
    )]
    async fn execute(&self, request: &HttpRequest) -> Result<Value, ExchangeError> {
        let mut builder = self
            .client
            .request(request.method.as_reqwest(), &request.url);

        for (key, value) in &request.headers {
            builder = builder.header(key, value);
        }
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder
                .header("Content-Type", "application/json")
                .body(body.clone());
        }

        let response = builder
            .send()
            .await
            .map_err(|e| classify_transport_error(&e))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| classify_transport_error(&e))?;

        trace!(status = status.as_u16(), "exchange response received");

        if status.is_success() {
            if text.trim().is_empty() {
                return Err(ExchangeError::MalformedResponse {
                    exchange: request.exchange,
                    detail: "empty body on success status".to_string(),
                });
            }
            serde_json::from_str(&text).map_err(|e| ExchangeError::MalformedResponse {
                exchange: request.exchange,
                detail: format!("non-JSON body: {e}"),
            })
        } else {
            Err(ExchangeError::ApiError {
                status: status.as_u16(),
                body: text,
            })
        }
    }
}
