pub mod convert;
pub mod types;

use crate::core::config::ExchangeCredentials;
use crate::core::endpoints::EndpointSet;
use crate::core::errors::ExchangeError;
use crate::core::kernel::rest::HttpRequest;
use crate::core::kernel::signer::{build_query_string, hmac_sha256_hex, timestamp_ms};
use crate::core::traits::{ExchangeAdapter, RequestSpec};
use crate::core::types::{
    AccountSnapshot, Exchange, Network, OrderAck, OrderRequest, OrderSide, OrderType, PriceQuote,
    ProductType, QuoteSource,
};
use self::types::{BybitEnvelope, BybitOrderResult, BybitTickerResult, BybitWalletResult};
use rust_decimal::Decimal;
use serde_json::{json, Value};

/// retCodes Bybit reports for key, signature, and permission problems.
/// 10003 invalid key, 10004 bad signature, 10005 missing permission,
/// 10010 IP not allowed, 33004 key expired.
const AUTH_RET_CODES: &[i64] = &[10003, 10004, 10005, 10010, 33004];

pub struct BybitAdapter;

impl BybitAdapter {
    fn category(product: ProductType) -> &'static str {
        if product.is_futures() {
            "linear"
        } else {
            "spot"
        }
    }

    fn malformed(detail: impl Into<String>) -> ExchangeError {
        ExchangeError::MalformedResponse {
            exchange: Exchange::Bybit,
            detail: detail.into(),
        }
    }

    fn classify_ret_code(code: i64, message: String) -> Option<ExchangeError> {
        AUTH_RET_CODES
            .contains(&code)
            .then(|| ExchangeError::AuthorizationError {
                exchange: Exchange::Bybit,
                code: code.to_string(),
                message,
            })
    }
}

impl ExchangeAdapter for BybitAdapter {
    fn exchange(&self) -> Exchange {
        Exchange::Bybit
    }

    fn account_spec(&self, endpoints: &EndpointSet, _product: ProductType) -> RequestSpec {
        // The unified account serves both spot and linear balances.
        RequestSpec::get(endpoints.balance_path)
            .with_param("accountType", "UNIFIED")
            .signed()
    }

    fn price_spec(
        &self,
        endpoints: &EndpointSet,
        symbol: &str,
        product: ProductType,
    ) -> RequestSpec {
        RequestSpec::get(endpoints.price_path)
            .with_param("category", Self::category(product))
            .with_param("symbol", symbol)
    }

    fn order_spec(
        &self,
        endpoints: &EndpointSet,
        product: ProductType,
        _network: Network,
        order: &OrderRequest,
    ) -> Result<RequestSpec, ExchangeError> {
        let mut body = json!({
            "category": Self::category(product),
            "symbol": order.symbol,
            "side": match order.side {
                OrderSide::Buy => "Buy",
                OrderSide::Sell => "Sell",
            },
            "orderType": match order.order_type {
                OrderType::Market => "Market",
                OrderType::Limit => "Limit",
            },
            "qty": order.quantity.to_string(),
        });

        if order.order_type == OrderType::Limit {
            let price = order.price.ok_or_else(|| {
                ExchangeError::InvalidParameters("limit order requires a price".to_string())
            })?;
            body["price"] = Value::String(price.to_string());
            body["timeInForce"] = Value::String(
                order
                    .time_in_force
                    .unwrap_or(crate::core::types::TimeInForce::Gtc)
                    .as_str()
                    .to_string(),
            );
        }

        Ok(RequestSpec::post(endpoints.order_path, body).signed())
    }

    fn sign(
        &self,
        credentials: &ExchangeCredentials,
        endpoints: &EndpointSet,
        spec: &RequestSpec,
        timestamp_ms: u64,
        recv_window_ms: u64,
    ) -> Result<HttpRequest, ExchangeError> {
        // Canonical payload: timestamp + key + recvWindow + query (or body).
        let payload_tail = spec.body.as_ref().map_or_else(
            || build_query_string(&spec.query),
            |body| body.to_string(),
        );
        let canonical = format!(
            "{timestamp_ms}{}{recv_window_ms}{payload_tail}",
            credentials.api_key()
        );
        let signature = hmac_sha256_hex(credentials.api_secret(), &canonical)?;

        let mut request = HttpRequest::new(
            Exchange::Bybit,
            spec.method,
            format!("{}{}", endpoints.base_url, spec.path),
        )
        .with_header("X-BAPI-API-KEY", credentials.api_key())
        .with_header("X-BAPI-TIMESTAMP", timestamp_ms.to_string())
        .with_header("X-BAPI-RECV-WINDOW", recv_window_ms.to_string())
        .with_header("X-BAPI-SIGN", signature)
        .with_query(spec.query.clone());

        if let Some(body) = &spec.body {
            request = request.with_body(serde_json::to_vec(body)?);
        }
        Ok(request)
    }

    fn check_envelope(&self, raw: &Value) -> Result<(), ExchangeError> {
        let code = raw.get("retCode").and_then(Value::as_i64).unwrap_or(0);
        if code == 0 {
            return Ok(());
        }
        let message = raw
            .get("retMsg")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        Err(
            Self::classify_ret_code(code, message.clone()).unwrap_or_else(|| {
                ExchangeError::ApiError {
                    status: 200,
                    body: format!("retCode {code}: {message}"),
                }
            }),
        )
    }

    fn classify_api_error(&self, status: u16, body: &str) -> ExchangeError {
        if let Ok(parsed) = serde_json::from_str::<Value>(body) {
            if let Some(code) = parsed.get("retCode").and_then(Value::as_i64) {
                let message = parsed
                    .get("retMsg")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string();
                if let Some(err) = Self::classify_ret_code(code, message) {
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
        let envelope: BybitEnvelope<BybitWalletResult> = serde_json::from_value(raw.clone())
            .map_err(|e| Self::malformed(format!("wallet-balance: {e}")))?;
        convert::normalize_wallet(product, network, envelope)
    }

    fn parse_price(
        &self,
        symbol: &str,
        product: ProductType,
        network: Network,
        raw: &Value,
    ) -> Result<PriceQuote, ExchangeError> {
        let envelope: BybitEnvelope<BybitTickerResult> = serde_json::from_value(raw.clone())
            .map_err(|e| Self::malformed(format!("tickers: {e}")))?;
        let ticker = envelope
            .result
            .list
            .into_iter()
            .find(|t| t.symbol.eq_ignore_ascii_case(symbol))
            .ok_or_else(|| Self::malformed(format!("no ticker for symbol {symbol}")))?;
        let price: Decimal = ticker
            .last_price
            .trim()
            .parse()
            .map_err(|e| Self::malformed(format!("unparseable lastPrice: {e}")))?;

        Ok(PriceQuote {
            symbol: ticker.symbol,
            price,
            timestamp_ms: if envelope.time > 0 {
                envelope.time
            } else {
                timestamp_ms().map_or(0, |t| t as i64)
            },
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
        let envelope: BybitEnvelope<BybitOrderResult> = serde_json::from_value(raw.clone())
            .map_err(|e| Self::malformed(format!("order ack: {e}")))?;
        Ok(OrderAck {
            order_id: envelope.result.order_id,
            client_order_id: envelope.result.order_link_id,
            status: "NEW".to_string(),
            symbol: order.symbol.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_auth_ret_codes_classify_as_authorization() {
        let raw = json!({"retCode": 10003, "retMsg": "API key is invalid.", "result": {}});
        let err = BybitAdapter.check_envelope(&raw).unwrap_err();
        assert!(err.is_authorization());
    }

    #[test]
    fn envelope_business_errors_stay_api_errors() {
        let raw = json!({"retCode": 170213, "retMsg": "Order does not exist.", "result": {}});
        let err = BybitAdapter.check_envelope(&raw).unwrap_err();
        assert!(matches!(err, ExchangeError::ApiError { status: 200, .. }));
    }

    #[test]
    fn signature_canonical_includes_key_timestamp_and_window() {
        let endpoints = crate::core::endpoints::resolve(
            Exchange::Bybit,
            ProductType::Spot,
            Network::Mainnet,
        )
        .unwrap();
        let credentials = ExchangeCredentials::new("key", "secret");
        let spec = BybitAdapter.account_spec(&endpoints, ProductType::Spot);

        let request = BybitAdapter
            .sign(&credentials, &endpoints, &spec, 1_700_000_000_000, 50_000)
            .unwrap();

        let expected = hmac_sha256_hex(
            "secret",
            "1700000000000key50000accountType=UNIFIED",
        )
        .unwrap();
        assert!(request
            .headers
            .iter()
            .any(|(k, v)| k == "X-BAPI-SIGN" && *v == expected));
    }
}
