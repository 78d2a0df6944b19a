mod common;

use common::MockRest;
use exlink::core::config::FacadeConfig;
use exlink::core::errors::{ExchangeError, TransientKind};
use exlink::core::types::{
    BotRequest, Exchange, OrderRequest, OrderSide, OrderType, QuoteSource, TimeInForce,
};
use exlink::facade::BotFacade;
use rust_decimal::Decimal;
use serde_json::json;

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn request(exchange: Exchange, testnet: bool, product: &str, key: &str, secret: &str) -> BotRequest {
    BotRequest {
        exchange,
        api_key: key.to_string(),
        api_secret: secret.to_string(),
        testnet,
        product_type: product.to_string(),
        symbol: None,
    }
}

#[tokio::test]
async fn bybit_testnet_spot_snapshot_is_tagged_and_filtered() {
    common::init_tracing();
    let mock = MockRest::new();
    mock.enqueue_ok(json!({
        "retCode": 0,
        "retMsg": "OK",
        "time": 1_700_000_000_000_i64,
        "result": {
            "list": [{
                "accountType": "UNIFIED",
                "coin": [
                    {"coin": "USDT", "walletBalance": "250.0", "locked": "50.0"},
                    {"coin": "DOGE", "walletBalance": "0", "locked": "0"}
                ]
            }]
        }
    }));

    let facade = BotFacade::with_rest(
        mock,
        &request(Exchange::Bybit, true, "SPOT", "X", "Y"),
        FacadeConfig::default(),
    );

    let snapshot = facade.get_account_snapshot().await.unwrap();

    assert!(snapshot.account_type.contains("TESTNET"));
    assert!(!snapshot.demo_mode);
    assert_eq!(snapshot.balances.len(), 1);
    assert_eq!(snapshot.balances[0].asset, "USDT");
    assert_eq!(snapshot.asset_total("USDT"), dec("250.0"));
}

#[tokio::test]
async fn bybit_requests_carry_signature_headers_and_testnet_host() {
    let mock = MockRest::new();
    mock.enqueue_ok(json!({
        "retCode": 0,
        "retMsg": "OK",
        "result": {"list": [{"accountType": "UNIFIED", "coin": []}]}
    }));

    let facade = BotFacade::with_rest(
        mock.clone(),
        &request(Exchange::Bybit, true, "SPOT", "X", "Y"),
        FacadeConfig::default(),
    );
    facade.get_account_snapshot().await.unwrap();

    let requests = mock.requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert!(request.url.starts_with("https://api-testnet.bybit.com"));
    for header in ["X-BAPI-API-KEY", "X-BAPI-TIMESTAMP", "X-BAPI-RECV-WINDOW", "X-BAPI-SIGN"] {
        assert!(
            request.headers.iter().any(|(k, _)| k == header),
            "missing header {header}"
        );
    }
    assert!(request
        .headers
        .iter()
        .any(|(k, v)| k == "X-BAPI-RECV-WINDOW" && v == "50000"));
}

#[tokio::test]
async fn no_credentials_yield_demo_mode_and_no_outbound_calls() {
    let mock = MockRest::new();
    let facade = BotFacade::with_rest(
        mock.clone(),
        &request(Exchange::Binance, false, "SPOT", "", ""),
        FacadeConfig::default(),
    );

    let snapshot = facade.get_account_snapshot().await.unwrap();
    assert!(snapshot.demo_mode);
    assert_eq!(snapshot.account_type, "DEMO");
    assert_eq!(snapshot.balances[0].free, dec("10000"));
    assert_eq!(mock.request_count(), 0);
}

#[tokio::test]
async fn get_price_returns_a_live_quote() {
    let mock = MockRest::new();
    mock.enqueue_ok(json!({"symbol": "BTCUSDT", "price": "50000.10"}));

    let facade = BotFacade::with_rest(
        mock,
        &request(Exchange::Binance, false, "SPOT", "", ""),
        FacadeConfig::default(),
    );

    let quote = facade.get_price("BTCUSDT").await.unwrap();
    assert_eq!(quote.symbol, "BTCUSDT");
    assert_eq!(quote.price, dec("50000.10"));
    assert_eq!(quote.source, QuoteSource::Live);
}

#[tokio::test]
async fn transient_price_failure_degrades_to_the_configured_fallback_quote() {
    let mock = MockRest::new();
    mock.enqueue_err(ExchangeError::TransientNetwork {
        kind: TransientKind::Timeout,
        detail: "deadline exceeded".to_string(),
    });

    let config = FacadeConfig::default().with_fallback_price(dec("42000"));
    let facade = BotFacade::with_rest(
        mock,
        &request(Exchange::Binance, false, "SPOT", "", ""),
        config,
    );

    let quote = facade.get_price("BTCUSDT").await.unwrap();
    assert_eq!(quote.price, dec("42000"));
    assert_eq!(quote.source, QuoteSource::Fallback);
}

#[tokio::test]
async fn transient_price_failure_without_fallback_price_is_an_error() {
    let mock = MockRest::new();
    mock.enqueue_err(ExchangeError::TransientNetwork {
        kind: TransientKind::Timeout,
        detail: "deadline exceeded".to_string(),
    });

    let facade = BotFacade::with_rest(
        mock,
        &request(Exchange::Binance, false, "SPOT", "", ""),
        FacadeConfig::default(),
    );

    let err = facade.get_price("BTCUSDT").await.unwrap_err();
    assert!(err.is_timeout());
}

#[tokio::test]
async fn unsupported_combination_surfaces_before_any_call() {
    let mock = MockRest::new();
    let facade = BotFacade::with_rest(
        mock,
        &request(Exchange::Okx, true, "SPOT", "k", "s"),
        FacadeConfig::default(),
    );

    let err = facade.get_account_snapshot().await.unwrap_err();
    assert!(matches!(
        err,
        ExchangeError::UnsupportedCombination { .. }
    ));
}

#[tokio::test]
async fn binance_limit_order_round_trips_to_an_ack() {
    let mock = MockRest::new();
    mock.enqueue_ok(json!({
        "orderId": 12345_u64,
        "clientOrderId": "abc-1",
        "status": "NEW",
        "symbol": "BTCUSDT"
    }));

    let facade = BotFacade::with_rest(
        mock.clone(),
        &request(Exchange::Binance, false, "SPOT", "k", "s"),
        FacadeConfig::default(),
    );

    let order = OrderRequest {
        symbol: "BTCUSDT".to_string(),
        side: OrderSide::Buy,
        order_type: OrderType::Limit,
        quantity: dec("0.5"),
        price: Some(dec("30000")),
        time_in_force: Some(TimeInForce::Gtc),
    };

    let ack = facade.place_order(&order).await.unwrap();
    assert_eq!(ack.order_id, "12345");
    assert_eq!(ack.client_order_id.as_deref(), Some("abc-1"));
    assert_eq!(ack.status, "NEW");

    let requests = mock.requests();
    assert_eq!(requests.len(), 1);
    let query = &requests[0].query;
    assert!(query.contains(&("side".to_string(), "BUY".to_string())));
    assert!(query.contains(&("timeInForce".to_string(), "GTC".to_string())));
    assert_eq!(query.last().map(|(k, _)| k.as_str()), Some("signature"));
}

#[tokio::test]
async fn orders_without_credentials_are_refused_with_instructions() {
    let mock = MockRest::new();
    let facade = BotFacade::with_rest(
        mock,
        &request(Exchange::Binance, false, "SPOT", "", ""),
        FacadeConfig::default(),
    );

    let order = OrderRequest {
        symbol: "BTCUSDT".to_string(),
        side: OrderSide::Sell,
        order_type: OrderType::Market,
        quantity: dec("1"),
        price: None,
        time_in_force: None,
    };

    match facade.place_order(&order).await.unwrap_err() {
        ExchangeError::PermissionDenied {
            code, instructions, ..
        } => {
            assert_eq!(code, "NO_CREDENTIALS");
            assert!(!instructions.is_empty());
        }
        other => panic!("expected PermissionDenied, got {other}"),
    }
}

#[tokio::test]
async fn order_routing_to_an_unprovisioned_venue_is_refused() {
    let mock = MockRest::new();
    let facade = BotFacade::with_rest(
        mock,
        &request(Exchange::Kraken, false, "SPOT", "k", "s"),
        FacadeConfig::default(),
    );

    let order = OrderRequest {
        symbol: "XBTUSD".to_string(),
        side: OrderSide::Buy,
        order_type: OrderType::Market,
        quantity: dec("1"),
        price: None,
        time_in_force: None,
    };

    assert!(matches!(
        facade.place_order(&order).await.unwrap_err(),
        ExchangeError::UnsupportedCombination { .. }
    ));
}

#[tokio::test]
async fn bybit_envelope_auth_error_on_2xx_falls_back_for_futures_bots() {
    let mock = MockRest::new();
    // HTTP 200 with a business-level auth rejection in the envelope.
    mock.enqueue_ok(json!({
        "retCode": 10005,
        "retMsg": "Permission denied for current apikey",
        "result": {}
    }));
    mock.enqueue_ok(json!({
        "retCode": 0,
        "retMsg": "OK",
        "result": {
            "list": [{
                "accountType": "UNIFIED",
                "coin": [{"coin": "USDT", "walletBalance": "9.0", "locked": "0"}]
            }]
        }
    }));

    let facade = BotFacade::with_rest(
        mock,
        &request(Exchange::Bybit, false, "FUTURES", "k", "s"),
        FacadeConfig::default(),
    );

    let snapshot = facade.get_account_snapshot().await.unwrap();
    assert_eq!(snapshot.account_type, "SPOT_FALLBACK");
    assert_eq!(snapshot.asset_total("USDT"), dec("9.0"));
}
