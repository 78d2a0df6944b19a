pub mod convert;
pub mod types;

use crate::core::config::ExchangeCredentials;
use crate::core::endpoints::EndpointSet;
use crate::core::errors::ExchangeError;
use crate::core::kernel::rest::HttpRequest;
use crate::core::kernel::signer::{build_query_string, hmac_sha256_hex, timestamp_ms};
use crate::core::traits::{ExchangeAdapter, RequestSpec};
use crate::core::types::{
    AccountSnapshot, Exchange, Network, OrderAck, OrderRequest, PriceQuote, ProductType,
    QuoteSource,
};
use self::types::{CoinbaseAccount, CoinbaseErrorBody, CoinbaseTicker};
use rust_decimal::Decimal;
use serde_json::Value;

const SYMBOL_PLACEHOLDER: &str = "{symbol}";

pub struct CoinbaseAdapter;

impl CoinbaseAdapter {
    fn malformed(detail: impl Into<String>) -> ExchangeError {
        ExchangeError::MalformedResponse {
            exchange: Exchange::Coinbase,
            detail: detail.into(),
        }
    }
}

impl ExchangeAdapter for CoinbaseAdapter {
    fn exchange(&self) -> Exchange {
        Exchange::Coinbase
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
        RequestSpec::get(endpoints.price_path.replace(SYMBOL_PLACEHOLDER, symbol))
    }

    fn order_spec(
        &self,
        _endpoints: &EndpointSet,
        product: ProductType,
        network: Network,
        _order: &OrderRequest,
    ) -> Result<RequestSpec, ExchangeError> {
        Err(ExchangeError::UnsupportedCombination {
            exchange: Exchange::Coinbase,
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

        let canonical = format!(
            "{timestamp_ms}{}{}{}",
            spec.method.as_str(),
            spec.path,
            build_query_string(&query)
        );
        let signature = hmac_sha256_hex(credentials.api_secret(), &canonical)?;

        Ok(HttpRequest::new(
            Exchange::Coinbase,
            spec.method,
            format!("{}{}", endpoints.base_url, spec.path),
        )
        .with_header("CB-ACCESS-KEY", credentials.api_key())
        .with_header("CB-ACCESS-SIGN", signature)
        .with_header("CB-ACCESS-TIMESTAMP", timestamp_ms.to_string())
        .with_query(query))
    }

    fn classify_api_error(&self, status: u16, body: &str) -> ExchangeError {
        // This venue carries no stable error codes; the status line is the
        // exchange-reported authorization signal.
        if status == 401 || status == 403 {
            let message = serde_json::from_str::<CoinbaseErrorBody>(body)
                .map(|b| b.message)
                .unwrap_or_else(|_| body.to_string());
            return ExchangeError::AuthorizationError {
                exchange: Exchange::Coinbase,
                code: status.to_string(),
                message,
            };
        }
        ExchangeError::ApiError {
            status,
            body: body.to_string(),
        }
    }

    fn normalize_account(
        &self,
        _product: ProductType,
        network: Network,
        raw: &Value,
    ) -> Result<AccountSnapshot, ExchangeError> {
        let accounts: Vec<CoinbaseAccount> = serde_json::from_value(raw.clone())
            .map_err(|e| Self::malformed(format!("accounts: {e}")))?;
        Ok(convert::normalize_accounts(network, accounts))
    }

    fn parse_price(
        &self,
        symbol: &str,
        product: ProductType,
        network: Network,
        raw: &Value,
    ) -> Result<PriceQuote, ExchangeError> {
        let ticker: CoinbaseTicker = serde_json::from_value(raw.clone())
            .map_err(|e| Self::malformed(format!("ticker: {e}")))?;
        let price: Decimal = ticker
            .price
            .trim()
            .parse()
            .map_err(|e| Self::malformed(format!("unparseable price: {e}")))?;

        Ok(PriceQuote {
            symbol: symbol.to_string(),
            price,
            timestamp_ms: timestamp_ms().map_or(0, |t| t as i64),
            source_network: network,
            product_type: product,
            source: QuoteSource::Live,
        })
    }

    fn parse_order_ack(
        &self,
        order: &OrderRequest,
        raw: &Value,
    ) -> Result<OrderAck, ExchangeError> {
        let ack: self::types::CoinbaseOrderAck = serde_json::from_value(raw.clone())
            .map_err(|e| Self::malformed(format!("order ack: {e}")))?;
        Ok(OrderAck {
            order_id: ack.id,
            client_order_id: None,
            status: ack.status,
            symbol: if ack.product_id.is_empty() {
                order.symbol.clone()
            } else {
                ack.product_id
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthorized_status_classifies_as_authorization() {
        let err = CoinbaseAdapter.classify_api_error(401, r#"{"message":"Invalid API Key"}"#);
        assert!(err.is_authorization());

        let other = CoinbaseAdapter.classify_api_error(404, r#"{"message":"NotFound"}"#);
        assert!(matches!(other, ExchangeError::ApiError { status: 404, .. }));
    }

    #[test]
    fn price_path_substitutes_the_product_symbol() {
        let endpoints = crate::core::endpoints::resolve(
            Exchange::Coinbase,
            ProductType::Spot,
            Network::Mainnet,
        )
        .unwrap();
        let spec = CoinbaseAdapter.price_spec(&endpoints, "BTC-USD", ProductType::Spot);
        assert_eq!(spec.path, "/products/BTC-USD/ticker");
    }
}
