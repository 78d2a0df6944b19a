pub mod convert;
pub mod types;

use crate::core::config::ExchangeCredentials;
use crate::core::endpoints::EndpointSet;
use crate::core::errors::ExchangeError;
use crate::core::kernel::rest::HttpRequest;
use crate::core::kernel::signer::{build_query_string, hmac_sha256_hex, timestamp_ms};
use crate::core::traits::{ExchangeAdapter, RequestSpec};
use crate::core::types::{
    conversion::dec_from_f64, AccountSnapshot, Exchange, Network, OrderAck, OrderRequest,
    PriceQuote, ProductType, QuoteSource,
};
use self::types::{
    KrakenFuturesEnvelope, KrakenFuturesTickersEnvelope, KrakenSpotEnvelope, KrakenTickerResult,
};
use rust_decimal::Decimal;
use serde_json::Value;

/// Error strings Kraken reports for key, signature, and permission
/// problems. These are stable identifiers, not free text.
const AUTH_ERRORS: &[&str] = &[
    "EAPI:Invalid key",
    "EAPI:Invalid signature",
    "EAPI:Invalid nonce",
    "EGeneral:Permission denied",
];

pub struct KrakenAdapter;

impl KrakenAdapter {
    fn malformed(detail: impl Into<String>) -> ExchangeError {
        ExchangeError::MalformedResponse {
            exchange: Exchange::Kraken,
            detail: detail.into(),
        }
    }

    fn classify_error_string(error: &str) -> Option<ExchangeError> {
        AUTH_ERRORS
            .contains(&error)
            .then(|| ExchangeError::AuthorizationError {
                exchange: Exchange::Kraken,
                code: error.to_string(),
                message: error.to_string(),
            })
    }
}

impl ExchangeAdapter for KrakenAdapter {
    fn exchange(&self) -> Exchange {
        Exchange::Kraken
    }

    fn account_spec(&self, endpoints: &EndpointSet, _product: ProductType) -> RequestSpec {
        RequestSpec::get(endpoints.balance_path).signed()
    }

    fn price_spec(
        &self,
        endpoints: &EndpointSet,
        symbol: &str,
        product: ProductType,
    ) -> RequestSpec {
        if product.is_futures() {
            // The futures ticker endpoint returns every symbol; filtering
            // happens client-side in parse_price.
            RequestSpec::get(endpoints.price_path)
        } else {
            RequestSpec::get(endpoints.price_path).with_param("pair", symbol)
        }
    }

    fn order_spec(
        &self,
        _endpoints: &EndpointSet,
        product: ProductType,
        network: Network,
        _order: &OrderRequest,
    ) -> Result<RequestSpec, ExchangeError> {
        Err(ExchangeError::UnsupportedCombination {
            exchange: Exchange::Kraken,
            product,
            network,
        })
    }

    fn sign(
        &self,
        credentials: &ExchangeCredentials,
        endpoints: &EndpointSet,
        spec: &RequestSpec,
        timestamp_ms: u64,
        recv_window_ms: u64,
    ) -> Result<HttpRequest, ExchangeError> {
        let mut query = spec.query.clone();
        query.push(("timestamp".to_string(), timestamp_ms.to_string()));
        query.push(("recvWindow".to_string(), recv_window_ms.to_string()));

        let canonical = format!("{}{timestamp_ms}{}", spec.path, build_query_string(&query));
        let signature = hmac_sha256_hex(credentials.api_secret(), &canonical)?;

        Ok(HttpRequest::new(
            Exchange::Kraken,
            spec.method,
            format!("{}{}", endpoints.base_url, spec.path),
        )
        .with_header("API-Key", credentials.api_key())
        .with_header("API-Sign", signature)
        .with_query(query))
    }

    fn check_envelope(&self, raw: &Value) -> Result<(), ExchangeError> {
        // Spot envelope: non-empty error array.
        if let Some(errors) = raw.get("error").and_then(Value::as_array) {
            if let Some(first) = errors.first().and_then(Value::as_str) {
                return Err(Self::classify_error_string(first).unwrap_or_else(|| {
                    ExchangeError::ApiError {
                        status: 200,
                        body: first.to_string(),
                    }
                }));
            }
        }
        // Futures envelope: result != "success" with an error string.
        if raw.get("result").and_then(Value::as_str) == Some("error") {
            let error = raw
                .get("error")
                .and_then(Value::as_str)
                .unwrap_or("unknown error");
            return Err(
                Self::classify_error_string(error).unwrap_or_else(|| ExchangeError::ApiError {
                    status: 200,
                    body: error.to_string(),
                }),
            );
        }
        Ok(())
    }

    fn classify_api_error(&self, status: u16, body: &str) -> ExchangeError {
        if let Ok(parsed) = serde_json::from_str::<Value>(body) {
            if let Some(first) = parsed
                .get("error")
                .and_then(Value::as_array)
                .and_then(|errors| errors.first())
                .and_then(Value::as_str)
            {
                if let Some(err) = Self::classify_error_string(first) {
                    return err;
                }
            }
        }
        ExchangeError::ApiError {
            status,
            body: body.to_string(),
        }
    }

    fn normalize_account(
        &self,
        product: ProductType,
        network: Network,
        raw: &Value,
    ) -> Result<AccountSnapshot, ExchangeError> {
        if product.is_futures() {
            let envelope: KrakenFuturesEnvelope = serde_json::from_value(raw.clone())
                .map_err(|e| Self::malformed(format!("futures accounts: {e}")))?;
            Ok(convert::normalize_futures_accounts(network, envelope))
        } else {
            let envelope: KrakenSpotEnvelope<self::types::KrakenSpotBalances> =
                serde_json::from_value(raw.clone())
                    .map_err(|e| Self::malformed(format!("spot balance: {e}")))?;
            convert::normalize_spot_balances(network, envelope)
        }
    }

    fn parse_price(
        &self,
        symbol: &str,
        product: ProductType,
        network: Network,
        raw: &Value,
    ) -> Result<PriceQuote, ExchangeError> {
        let (resolved_symbol, price) = if product.is_futures() {
            let envelope: KrakenFuturesTickersEnvelope = serde_json::from_value(raw.clone())
                .map_err(|e| Self::malformed(format!("futures tickers: {e}")))?;
            let ticker = envelope
                .tickers
                .into_iter()
                .find(|t| t.symbol.eq_ignore_ascii_case(symbol))
                .ok_or_else(|| Self::malformed(format!("no ticker for symbol {symbol}")))?;
            (ticker.symbol, dec_from_f64(ticker.last))
        } else {
            let envelope: KrakenSpotEnvelope<KrakenTickerResult> =
                serde_json::from_value(raw.clone())
                    .map_err(|e| Self::malformed(format!("ticker: {e}")))?;
            let result = envelope
                .result
                .ok_or_else(|| Self::malformed("ticker response has no result"))?;
            let (pair, info) = result
                .into_iter()
                .next()
                .ok_or_else(|| Self::malformed(format!("no ticker pair for {symbol}")))?;
            let last = info
                .c
                .first()
                .ok_or_else(|| Self::malformed("ticker has no last-trade field"))?;
            let price: Decimal = last
                .trim()
                .parse()
                .map_err(|e| Self::malformed(format!("unparseable price: {e}")))?;
            (pair, price)
        };

        Ok(PriceQuote {
            symbol: resolved_symbol,
            price,
            timestamp_ms: timestamp_ms().map_or(0, |t| t as i64),
            source_network: network,
            product_type: product,
            source: QuoteSource::Live,
        })
    }

    fn parse_order_ack(
        &self,
        _order: &OrderRequest,
        _raw: &Value,
    ) -> Result<OrderAck, ExchangeError> {
        Err(Self::malformed("order routing is not provisioned"))
    }
}
