use crate::core::config::ExchangeCredentials;
use crate::core::endpoints::EndpointSet;
use crate::core::errors::ExchangeError;
use crate::core::kernel::rest::{HttpMethod, HttpRequest};
use crate::core::types::{
    AccountSnapshot, Exchange, Network, OrderAck, OrderRequest, PriceQuote, ProductType,
};
use serde_json::Value;

/// An outbound call before authentication is attached. Built fresh per call
/// and never shared across exchanges; every exchange canonicalizes its own
/// way.
#[derive(Debug, Clone)]
pub struct RequestSpec {
    pub method: HttpMethod,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    pub requires_signature: bool,
}

impl RequestSpec {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Get,
            path: path.into(),
            query: Vec::new(),
            body: None,
            requires_signature: false,
        }
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: HttpMethod::Post,
            path: path.into(),
            query: Vec::new(),
            body: Some(body),
            requires_signature: false,
        }
    }

    #[must_use]
    pub const fn signed(mut self) -> Self {
        self.requires_signature = true;
        self
    }

    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Build the request without authentication, for public endpoints.
    #[must_use]
    pub fn build_unsigned(&self, exchange: Exchange, base_url: &str) -> HttpRequest {
        let mut request = HttpRequest::new(
            exchange,
            self.method,
            format!("{base_url}{}", self.path),
        )
        .with_query(self.query.clone());
        if let Some(body) = &self.body {
            request = request.with_body(serde_json::to_vec(body).unwrap_or_default());
        }
        request
    }
}

/// Everything that differs between exchanges: which requests to build, how
/// to authenticate them, how to spot a business error inside a 2xx body,
/// and how to fold responses into the common schema.
///
/// Normalization dispatches on the caller-declared product type, never on
/// response-shape sniffing.
pub trait ExchangeAdapter: Send + Sync {
    fn exchange(&self) -> Exchange;

    /// Extra request that must run before the account request, when the
    /// exchange needs a discovered value (an account id) in the path.
    /// Treated as part of the primary attempt by the caller.
    fn account_prelude(
        &self,
        _endpoints: &EndpointSet,
        _product: ProductType,
    ) -> Option<RequestSpec> {
        None
    }

    /// Fold the prelude response into the account spec.
    fn apply_prelude(
        &self,
        spec: RequestSpec,
        _prelude: &Value,
    ) -> Result<RequestSpec, ExchangeError> {
        Ok(spec)
    }

    fn account_spec(&self, endpoints: &EndpointSet, product: ProductType) -> RequestSpec;

    fn price_spec(&self, endpoints: &EndpointSet, symbol: &str, product: ProductType)
        -> RequestSpec;

    fn order_spec(
        &self,
        endpoints: &EndpointSet,
        product: ProductType,
        network: Network,
        order: &OrderRequest,
    ) -> Result<RequestSpec, ExchangeError>;

    /// Attach authentication: inject `timestamp` and `recvWindow`, build the
    /// exchange's canonical payload, and place the signature where the
    /// exchange expects it.
    fn sign(
        &self,
        credentials: &ExchangeCredentials,
        endpoints: &EndpointSet,
        spec: &RequestSpec,
        timestamp_ms: u64,
        recv_window_ms: u64,
    ) -> Result<HttpRequest, ExchangeError>;

    /// Business-level error surfaced inside a 2xx body. Exchanges with a
    /// bare payload (no envelope) keep the default.
    fn check_envelope(&self, _raw: &Value) -> Result<(), ExchangeError> {
        Ok(())
    }

    /// Reclassify a non-2xx response using exchange-reported error codes.
    /// Codes that do not match a known authorization failure stay `ApiError`;
    /// free-text guessing is deliberately not done here.
    fn classify_api_error(&self, status: u16, body: &str) -> ExchangeError;

    fn normalize_account(
        &self,
        product: ProductType,
        network: Network,
        raw: &Value,
    ) -> Result<AccountSnapshot, ExchangeError>;

    fn parse_price(
        &self,
        symbol: &str,
        product: ProductType,
        network: Network,
        raw: &Value,
    ) -> Result<PriceQuote, ExchangeError>;

    fn parse_order_ack(&self, order: &OrderRequest, raw: &Value)
        -> Result<OrderAck, ExchangeError>;
}
