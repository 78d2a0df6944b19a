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
use self::types::{OkxBalanceData, OkxEnvelope, OkxOrderData, OkxTicker};
use rust_decimal::Decimal;
use serde_json::{json, Value};

/// Error codes OKX reports for key, signature, and permission problems.
/// 50102 timestamp expired, 50111 invalid key, 50113 invalid signature,
/// 50030 no permission for this endpoint.
const AUTH_ERROR_CODES: &[&str] = &["50102", "50111", "50113", "50030"];

pub struct OkxAdapter;

impl OkxAdapter {
    fn malformed(detail: impl Into<String>) -> ExchangeError {
        ExchangeError::MalformedResponse {
            exchange: Exchange::Okx,
            detail: detail.into(),
        }
    }

    fn classify_code(code: &str, message: String) -> Option<ExchangeError> {
        AUTH_ERROR_CODES
            .contains(&code)
            .then(|| ExchangeError::AuthorizationError {
                exchange: Exchange::Okx,
                code: code.to_string(),
                message,
            })
    }
}

impl ExchangeAdapter for OkxAdapter {
    fn exchange(&self) -> Exchange {
        Exchange::Okx
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
        RequestSpec::get(endpoints.price_path).with_param("instId", symbol)
    }

    fn order_spec(
        &self,
        endpoints: &EndpointSet,
        product: ProductType,
        _network: Network,
        order: &OrderRequest,
    ) -> Result<RequestSpec, ExchangeError> {
        let mut body = json!({
            "instId": order.symbol,
            "tdMode": if product.is_futures() { "cross" } else { "cash" },
            "side": match order.side {
                OrderSide::Buy => "buy",
                OrderSide::Sell => "sell",
            },
            "ordType": match order.order_type {
                OrderType::Market => "market",
                OrderType::Limit => "limit",
            },
            "sz": order.quantity.to_string(),
        });

        if order.order_type == OrderType::Limit {
            let price = order.price.ok_or_else(|| {
                ExchangeError::InvalidParameters("limit order requires a price".to_string())
            })?;
            body["px"] = Value::String(price.to_string());
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
        let mut query = spec.query.clone();
        query.push(("timestamp".to_string(), timestamp_ms.to_string()));
        query.push(("recvWindow".to_string(), recv_window_ms.to_string()));

        let query_string = build_query_string(&query);
        let request_path = if query_string.is_empty() {
            spec.path.clone()
        } else {
            format!("{}?{query_string}", spec.path)
        };
        let body_text = spec
            .body
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default();
        let canonical = format!(
            "{timestamp_ms}{}{request_path}{body_text}",
            spec.method.as_str()
        );
        let signature = hmac_sha256_hex(credentials.api_secret(), &canonical)?;

        let mut request = HttpRequest::new(
            Exchange::Okx,
            spec.method,
            format!("{}{}", endpoints.base_url, spec.path),
        )
        .with_header("OK-ACCESS-KEY", credentials.api_key())
        .with_header("OK-ACCESS-SIGN", signature)
        .with_header("OK-ACCESS-TIMESTAMP", timestamp_ms.to_string())
        .with_query(query);

        if let Some(body) = &spec.body {
            request = request.with_body(serde_json::to_vec(body)?);
        }
        Ok(request)
    }

    fn check_envelope(&self, raw: &Value) -> Result<(), ExchangeError> {
        let code = raw.get("code").and_then(Value::as_str).unwrap_or("0");
        if code == "0" {
            return Ok(());
        }
        let message = raw
            .get("msg")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        Err(
            Self::classify_code(code, message.clone()).unwrap_or_else(|| {
                ExchangeError::ApiError {
                    status: 200,
                    body: format!("code {code}: {message}"),
                }
            }),
        )
    }

    fn classify_api_error(&self, status: u16, body: &str) -> ExchangeError {
        if let Ok(parsed) = serde_json::from_str::<Value>(body) {
            if let Some(code) = parsed.get("code").and_then(Value::as_str) {
                let message = parsed
                    .get("msg")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string();
                if let Some(err) = Self::classify_code(code, message) {
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
        let envelope: OkxEnvelope<OkxBalanceData> = serde_json::from_value(raw.clone())
            .map_err(|e| Self::malformed(format!("balance: {e}")))?;
        convert::normalize_balance(product, network, envelope)
    }

    fn parse_price(
        &self,
        symbol: &str,
        product: ProductType,
        network: Network,
        raw: &Value,
    ) -> Result<PriceQuote, ExchangeError> {
        let envelope: OkxEnvelope<OkxTicker> = serde_json::from_value(raw.clone())
            .map_err(|e| Self::malformed(format!("ticker: {e}")))?;
        let ticker = envelope
            .data
            .into_iter()
            .next()
            .ok_or_else(|| Self::malformed(format!("no ticker data for {symbol}")))?;
        let price: Decimal = ticker
            .last
            .trim()
            .parse()
            .map_err(|e| Self::malformed(format!("unparseable last price: {e}")))?;

        Ok(PriceQuote {
            symbol: ticker.inst_id,
            price,
            timestamp_ms: ticker
                .ts
                .trim()
                .parse()
                .unwrap_or_else(|_| timestamp_ms().map_or(0, |t| t as i64)),
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
        let envelope: OkxEnvelope<OkxOrderData> = serde_json::from_value(raw.clone())
            .map_err(|e| Self::malformed(format!("order ack: {e}")))?;
        let data = envelope
            .data
            .into_iter()
            .next()
            .ok_or_else(|| Self::malformed("order ack data array is empty"))?;

        if !data.s_code.is_empty() && data.s_code != "0" {
            return Err(ExchangeError::ApiError {
                status: 200,
                body: format!("order rejected, sCode {}: {}", data.s_code, data.s_msg),
            });
        }

        Ok(OrderAck {
            order_id: data.ord_id,
            client_order_id: data.cl_ord_id.filter(|id| !id.is_empty()),
            status: "NEW".to_string(),
            symbol: order.symbol.clone(),
        })
    }
}
