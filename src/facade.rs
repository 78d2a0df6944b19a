use crate::core::config::{ExchangeCredentials, FacadeConfig};
use crate::core::endpoints;
use crate::core::errors::ExchangeError;
use crate::core::fallback::{self, FallbackCoordinator};
use crate::core::kernel::rest::{ReqwestRest, RestClient, RestClientBuilder, RestClientConfig};
use crate::core::kernel::signer::timestamp_ms;
use crate::core::traits::ExchangeAdapter;
use crate::core::types::{
    AccountSnapshot, BotRequest, Exchange, Network, OrderAck, OrderRequest, PriceQuote,
    ProductType, QuoteSource,
};
use crate::exchanges;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// One bot's view of one exchange account: price, account snapshot, and
/// order passthrough. Wires resolver, signer, transport, fallback
/// coordinator, and normalizer; one call in, one result out.
pub struct BotFacade<R: RestClient = ReqwestRest> {
    rest: R,
    adapter: Arc<dyn ExchangeAdapter>,
    credentials: ExchangeCredentials,
    product: ProductType,
    network: Network,
    config: FacadeConfig,
}

impl BotFacade<ReqwestRest> {
    /// Build a facade from an inbound request, using the real HTTP client.
    pub fn from_request(request: &BotRequest, config: FacadeConfig) -> Result<Self, ExchangeError> {
        let rest = RestClientBuilder::new(
            RestClientConfig::new().with_timeout(config.timeout_seconds),
        )
        .build()?;
        Ok(Self::with_rest(rest, request, config))
    }
}

impl<R: RestClient> BotFacade<R> {
    /// Build a facade over an injected transport. Tests use this to record
    /// requests and serve canned responses.
    pub fn with_rest(rest: R, request: &BotRequest, config: FacadeConfig) -> Self {
        Self {
            rest,
            adapter: exchanges::adapter_for(request.exchange),
            credentials: ExchangeCredentials::new(
                request.api_key.clone(),
                request.api_secret.clone(),
            ),
            product: request.product(),
            network: request.network(),
            config,
        }
    }

    pub fn exchange(&self) -> Exchange {
        self.adapter.exchange()
    }

    pub const fn product(&self) -> ProductType {
        self.product
    }

    pub const fn network(&self) -> Network {
        self.network
    }

    /// Fetch the normalized account snapshot, falling back futures-to-spot
    /// once on an authorization failure or primary-path timeout. Never
    /// fails when no credentials were supplied; serves the demo snapshot
    /// instead.
    #[instrument(
        skip(self),
        fields(exchange = %self.adapter.exchange(), key = %self.credentials.masked_key())
    )]
    pub async fn get_account_snapshot(&self) -> Result<AccountSnapshot, ExchangeError> {
        let coordinator = FallbackCoordinator::new(&self.rest, self.adapter.as_ref(), &self.config);
        let outcome = coordinator
            .run(&self.credentials, self.product, self.network)
            .await;
        if let Some(reason) = outcome.fallback_reason {
            debug!(?reason, terminal = ?outcome.state, "account fetch took the fallback path");
        }
        outcome.result
    }

    /// Fetch the latest price for a symbol. When a fallback price is
    /// configured, a transient transport failure degrades to a clearly
    /// tagged fallback quote instead of an error.
    #[instrument(skip(self), fields(exchange = %self.adapter.exchange(), %symbol))]
    pub async fn get_price(&self, symbol: &str) -> Result<PriceQuote, ExchangeError> {
        let endpoints = endpoints::resolve(self.adapter.exchange(), self.product, self.network)?;
        let spec = self.adapter.price_spec(&endpoints, symbol, self.product);

        let result = fallback::execute_spec(
            &self.rest,
            self.adapter.as_ref(),
            &self.credentials,
            &endpoints,
            &spec,
            self.config.recv_window_ms,
        )
        .await;

        match result {
            Ok(raw) => self
                .adapter
                .parse_price(symbol, self.product, self.network, &raw),
            Err(err @ ExchangeError::TransientNetwork { .. }) => {
                if let Some(price) = self.config.fallback_price {
                    warn!(%err, "price fetch failed, serving the configured fallback quote");
                    Ok(PriceQuote {
                        symbol: symbol.to_string(),
                        price,
                        timestamp_ms: timestamp_ms().map_or(0, |t| t as i64),
                        source_network: self.network,
                        product_type: self.product,
                        source: QuoteSource::Fallback,
                    })
                } else {
                    Err(err)
                }
            }
            Err(err) => Err(err),
        }
    }

    /// Pass an order through to the exchange. Requires credentials; the
    /// demo snapshot never trades.
    #[instrument(
        skip(self, order),
        fields(exchange = %self.adapter.exchange(), symbol = %order.symbol)
    )]
    pub async fn place_order(&self, order: &OrderRequest) -> Result<OrderAck, ExchangeError> {
        if !self.credentials.has_credentials() {
            return Err(ExchangeError::PermissionDenied {
                message: "order placement requires API credentials".to_string(),
                code: "NO_CREDENTIALS".to_string(),
                instructions: fallback::remediation_instructions(self.adapter.exchange()),
            });
        }

        let endpoints = endpoints::resolve(self.adapter.exchange(), self.product, self.network)?;
        let spec = self
            .adapter
            .order_spec(&endpoints, self.product, self.network, order)?;

        let raw = fallback::execute_spec(
            &self.rest,
            self.adapter.as_ref(),
            &self.credentials,
            &endpoints,
            &spec,
            self.config.recv_window_ms,
        )
        .await?;

        self.adapter.parse_order_ack(order, &raw)
    }
}
