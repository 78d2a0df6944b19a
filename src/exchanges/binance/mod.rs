pub mod convert;
pub mod types;

use crate::core::config::ExchangeCredentials;
use crate::core::endpoints::EndpointSet;
use crate::core::errors::ExchangeError;
use crate::core::kernel::rest::HttpRequest;
use crate::core::kernel::signer::{build_query_string, hmac_sha256_hex, timestamp_ms};
use crate::core::traits::{ExchangeAdapter, RequestSpec};
use crate::core::types::{
    AccountSnapshot, Exchange, Network, OrderAck, OrderRequest, OrderType, PriceQuote, ProductType,
    QuoteSource,
};
use rust_decimal::Decimal;
use self::types::{BinanceErrorBody, BinanceOrderAck, BinanceTickerPrice};
use serde_json::Value;

/// Error codes Binance reports for key, signature, and permission problems.
/// -1022 bad signature, -2014 malformed key, -2015 rejected key/IP/perms.
const AUTH_ERROR_CODES: &[i64] = &[-1022, -2014, -2015];

pub struct BinanceAdapter;

impl BinanceAdapter {
    fn order_side(side: crate::core::types::OrderSide) -> &'static str {
        match side {
            crate::core::types::OrderSide::Buy => "BUY",
            crate::core::types::OrderSide::Sell => "SELL",
        }
    }

    fn malformed(detail: impl Into<String>) -> ExchangeError {
        ExchangeError::MalformedResponse {
            exchange: Exchange::Binance,
            detail: detail.into(),
        }
    }
}

impl ExchangeAdapter for BinanceAdapter {
    fn exchange(&self) -> Exchange {
        Exchange::Binance
    }

    fn account_spec(&self, endpoints: &EndpointSet, _product: ProductType) -> RequestSpec {
        RequestSpec::get(endpoints.balance_path).signed()
    }

    fn price_spec(
        &self,
        endpoints: &EndpointSet,
        symbol: &str,
        _product: ProductType,
    ) -> RequestSpec {
        RequestSpec::get(endpoints.price_path).with_param("symbol", symbol)
    }

    fn order_spec(
        &self,
        endpoints: &EndpointSet,
        _product: ProductType,
        _network: Network,
        order: &OrderRequest,
    ) -> Result<RequestSpec, ExchangeError> {
        // Binance accepts order parameters in the query string for POSTs.
        let mut spec = RequestSpec {
            method: crate::core::kernel::rest::HttpMethod::Post,
            path: endpoints.order_path.to_string(),
            query: Vec::new(),
            body: None,
            requires_signature: true,
        }
        .with_param("symbol", &order.symbol)
        .with_param("side", Self::order_side(order.side))
        .with_param(
            "type",
            match order.order_type {
                OrderType::Market => "MARKET",
                OrderType::Limit => "LIMIT",
            },
        )
        .with_param("quantity", order.quantity.to_string());

        if order.order_type == OrderType::Limit {
            let price = order.price.ok_or_else(|| {
                ExchangeError::InvalidParameters("limit order requires a price".to_string())
            })?;
            spec = spec.with_param("price", price.to_string()).with_param(
                "timeInForce",
                order
                    .time_in_force
                    .unwrap_or(crate::core::types::TimeInForce::Gtc)
                    .as_str(),
            );
        }

        Ok(spec)
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

        let canonical = build_query_string(&query);
        let signature = hmac_sha256_hex(credentials.api_secret(), &canonical)?;
        query.push(("signature".to_string(), signature));

        Ok(HttpRequest::new(
            Exchange::Binance,
            spec.method,
            format!("{}{}", endpoints.base_url, spec.path),
        )
        .with_header("X-MBX-APIKEY", credentials.api_key())
        .with_query(query))
    }

    fn classify_api_error(&self, status: u16, body: &str) -> ExchangeError {
        if let Ok(parsed) = serde_json::from_str::<BinanceErrorBody>(body) {
            if AUTH_ERROR_CODES.contains(&parsed.code) {
                return ExchangeError::AuthorizationError {
                    exchange: Exchange::Binance,
                    code: parsed.code.to_string(),
                    message: parsed.msg,
                };
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
            let account = serde_json::from_value(raw.clone())
                .map_err(|e| Self::malformed(format!("futures account: {e}")))?;
            Ok(convert::normalize_futures_account(network, account))
        } else {
            let account = serde_json::from_value(raw.clone())
                .map_err(|e| Self::malformed(format!("spot account: {e}")))?;
            Ok(convert::normalize_spot_account(network, account))
        }
    }

    fn parse_price(
        &self,
        _symbol: &str,
        product: ProductType,
        network: Network,
        raw: &Value,
    ) -> Result<PriceQuote, ExchangeError> {
        let ticker: BinanceTickerPrice = serde_json::from_value(raw.clone())
            .map_err(|e| Self::malformed(format!("ticker: {e}")))?;
        let price: Decimal = ticker
            .price
            .trim()
            .parse()
            .map_err(|e| Self::malformed(format!("unparseable price {:?}: {e}", ticker.price)))?;

        Ok(PriceQuote {
            symbol: ticker.symbol,
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
        raw: &Value,
    ) -> Result<OrderAck, ExchangeError> {
        let ack: BinanceOrderAck = serde_json::from_value(raw.clone())
            .map_err(|e| Self::malformed(format!("order ack: {e}")))?;
        Ok(OrderAck {
            order_id: ack.order_id.to_string(),
            client_order_id: ack.client_order_id,
            status: ack.status,
            symbol: ack.symbol,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::endpoints;

    #[test]
    fn signed_request_appends_timestamp_window_and_signature() {
        let endpoints =
            endpoints::resolve(Exchange::Binance, ProductType::Spot, Network::Mainnet).unwrap();
        let credentials = ExchangeCredentials::new("key", "secret");
        let spec = BinanceAdapter.account_spec(&endpoints, ProductType::Spot);

        let request = BinanceAdapter
            .sign(&credentials, &endpoints, &spec, 1_700_000_000_000, 50_000)
            .unwrap();

        assert_eq!(request.url, "https://api.binance.com/api/v3/account");
        assert!(request
            .headers
            .iter()
            .any(|(k, v)| k == "X-MBX-APIKEY" && v == "key"));
        let keys: Vec<&str> = request.query.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["timestamp", "recvWindow", "signature"]);
    }

    #[test]
    fn auth_error_codes_classify_as_authorization() {
        let err = BinanceAdapter
            .classify_api_error(401, r#"{"code":-2015,"msg":"Invalid API-key, IP, or permissions for action."}"#);
        assert!(err.is_authorization());

        let other = BinanceAdapter.classify_api_error(400, r#"{"code":-1121,"msg":"Invalid symbol."}"#);
        assert!(matches!(other, ExchangeError::ApiError { status: 400, .. }));
    }
}
