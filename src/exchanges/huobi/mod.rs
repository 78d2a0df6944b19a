pub mod convert;
pub mod types;

use crate::core::config::ExchangeCredentials;
use crate::core::endpoints::EndpointSet;
use crate::core::errors::ExchangeError;
use crate::core::kernel::rest::HttpRequest;
use crate::core::kernel::signer::{build_query_string, hmac_sha256_hex};
use crate::core::traits::{ExchangeAdapter, RequestSpec};
use crate::core::types::{
    conversion::dec_from_f64, AccountSnapshot, Exchange, Network, OrderAck, OrderRequest,
    PriceQuote, ProductType, QuoteSource,
};
use self::types::{HuobiAccount, HuobiBalanceData, HuobiEnvelope, HuobiMergedTicker};
use serde_json::Value;

/// err-codes Huobi reports for key and signature problems.
const AUTH_ERROR_CODES: &[&str] = &[
    "api-key-invalid",
    "api-signature-not-valid",
    "api-key-expired",
];

const ACCOUNT_ID_PLACEHOLDER: &str = "{account-id}";

pub struct HuobiAdapter;

impl HuobiAdapter {
    fn malformed(detail: impl Into<String>) -> ExchangeError {
        ExchangeError::MalformedResponse {
            exchange: Exchange::Huobi,
            detail: detail.into(),
        }
    }

    fn classify_err_code(code: &str, message: String) -> Option<ExchangeError> {
        AUTH_ERROR_CODES
            .contains(&code)
            .then(|| ExchangeError::AuthorizationError {
                exchange: Exchange::Huobi,
                code: code.to_string(),
                message,
            })
    }

    fn host(endpoints: &EndpointSet) -> &str {
        endpoints
            .base_url
            .trim_start_matches("https://")
            .trim_start_matches("http://")
    }
}

impl ExchangeAdapter for HuobiAdapter {
    fn exchange(&self) -> Exchange {
        Exchange::Huobi
    }

    fn account_prelude(
        &self,
        endpoints: &EndpointSet,
        _product: ProductType,
    ) -> Option<RequestSpec> {
        // The balance path needs an account id only the account list knows.
        Some(RequestSpec::get(endpoints.account_path).signed())
    }

    fn apply_prelude(
        &self,
        mut spec: RequestSpec,
        prelude: &Value,
    ) -> Result<RequestSpec, ExchangeError> {
        let envelope: HuobiEnvelope<Vec<HuobiAccount>> = serde_json::from_value(prelude.clone())
            .map_err(|e| Self::malformed(format!("account list: {e}")))?;
        let accounts = envelope.data.unwrap_or_default();
        let account = accounts
            .iter()
            .find(|a| a.account_type == "spot" && a.state == "working")
            .or_else(|| accounts.first())
            .ok_or_else(|| Self::malformed("account list is empty"))?;

        spec.path = spec
            .path
            .replace(ACCOUNT_ID_PLACEHOLDER, &account.id.to_string());
        Ok(spec)
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
        RequestSpec::get(endpoints.price_path).with_param("symbol", symbol.to_lowercase())
    }

    fn order_spec(
        &self,
        _endpoints: &EndpointSet,
        product: ProductType,
        network: Network,
        _order: &OrderRequest,
    ) -> Result<RequestSpec, ExchangeError> {
        // Order routing is not provisioned for this venue.
        Err(ExchangeError::UnsupportedCombination {
            exchange: Exchange::Huobi,
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
        query.push(("AccessKeyId".to_string(), credentials.api_key().to_string()));
        query.push(("SignatureMethod".to_string(), "HmacSHA256".to_string()));
        query.push(("SignatureVersion".to_string(), "2".to_string()));
        query.push(("Timestamp".to_string(), timestamp_ms.to_string()));
        query.push(("recvWindow".to_string(), recv_window_ms.to_string()));

        // This venue requires the canonical query sorted by key. The sort
        // happens here, not in the signer, because it is this venue's quirk.
        query.sort_by(|a, b| a.0.cmp(&b.0));

        let canonical = format!(
            "{}\n{}\n{}\n{}",
            spec.method.as_str(),
            Self::host(endpoints),
            spec.path,
            build_query_string(&query)
        );
        let signature = hmac_sha256_hex(credentials.api_secret(), &canonical)?;
        query.push(("Signature".to_string(), signature));

        Ok(HttpRequest::new(
            Exchange::Huobi,
            spec.method,
            format!("{}{}", endpoints.base_url, spec.path),
        )
        .with_query(query))
    }

    fn check_envelope(&self, raw: &Value) -> Result<(), ExchangeError> {
        let status = raw.get("status").and_then(Value::as_str).unwrap_or("ok");
        if status != "error" {
            return Ok(());
        }
        let code = raw
            .get("err-code")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let message = raw
            .get("err-msg")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        Err(
            Self::classify_err_code(&code, message.clone()).unwrap_or_else(|| {
                ExchangeError::ApiError {
                    status: 200,
                    body: format!("err-code {code}: {message}"),
                }
            }),
        )
    }

    fn classify_api_error(&self, status: u16, body: &str) -> ExchangeError {
        if let Ok(parsed) = serde_json::from_str::<Value>(body) {
            if let Some(code) = parsed.get("err-code").and_then(Value::as_str) {
                let message = parsed
                    .get("err-msg")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string();
                if let Some(err) = Self::classify_err_code(code, message) {
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
        _product: ProductType,
        network: Network,
        raw: &Value,
    ) -> Result<AccountSnapshot, ExchangeError> {
        let envelope: HuobiEnvelope<HuobiBalanceData> = serde_json::from_value(raw.clone())
            .map_err(|e| Self::malformed(format!("balance: {e}")))?;
        convert::normalize_balance(network, envelope)
    }

    fn parse_price(
        &self,
        symbol: &str,
        product: ProductType,
        network: Network,
        raw: &Value,
    ) -> Result<PriceQuote, ExchangeError> {
        let ticker: HuobiMergedTicker = serde_json::from_value(raw.clone())
            .map_err(|e| Self::malformed(format!("merged ticker: {e}")))?;
        let tick = ticker
            .tick
            .ok_or_else(|| Self::malformed(format!("no tick for symbol {symbol}")))?;

        Ok(PriceQuote {
            symbol: symbol.to_string(),
            price: dec_from_f64(tick.close),
            timestamp_ms: ticker.ts,
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
