use exlink::core::traits::ExchangeAdapter;
use exlink::core::types::{Network, ProductType};
use exlink::exchanges::binance::BinanceAdapter;
use exlink::exchanges::bybit::BybitAdapter;
use exlink::exchanges::coinbase::CoinbaseAdapter;
use exlink::exchanges::huobi::HuobiAdapter;
use exlink::exchanges::kraken::KrakenAdapter;
use exlink::exchanges::okx::OkxAdapter;
use rust_decimal::Decimal;
use serde_json::json;

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

#[test]
fn binance_spot_drops_zero_balances_and_keeps_nonzero_ones() {
    let raw = json!({
        "accountType": "SPOT",
        "canTrade": true,
        "canWithdraw": false,
        "canDeposit": true,
        "updateTime": 1_700_000_000_123_i64,
        "balances": [
            {"asset": "BTC", "free": "1", "locked": "0"},
            {"asset": "ETH", "free": "0", "locked": "0.5"},
            {"asset": "XRP", "free": "0", "locked": "0"}
        ]
    });

    let snapshot = BinanceAdapter
        .normalize_account(ProductType::Spot, Network::Mainnet, &raw)
        .unwrap();

    assert_eq!(snapshot.account_type, "SPOT");
    assert!(snapshot.can_trade);
    assert!(!snapshot.can_withdraw);
    assert_eq!(snapshot.update_time_ms, 1_700_000_000_123);
    let assets: Vec<&str> = snapshot.balances.iter().map(|b| b.asset.as_str()).collect();
    assert_eq!(assets, vec!["BTC", "ETH"]);
    assert!(snapshot.futures.is_none());
}

#[test]
fn binance_futures_derives_locked_from_wallet_minus_available() {
    let raw = json!({
        "canTrade": true,
        "canWithdraw": false,
        "canDeposit": false,
        "totalWalletBalance": "10.0",
        "availableBalance": "7.0",
        "totalMarginBalance": "10.5",
        "totalUnrealizedProfit": "0.5",
        "updateTime": 1_700_000_000_000_i64,
        "assets": [
            {"asset": "USDT", "walletBalance": "10.0", "availableBalance": "7.0"}
        ]
    });

    let snapshot = BinanceAdapter
        .normalize_account(ProductType::Futures, Network::Mainnet, &raw)
        .unwrap();

    assert_eq!(snapshot.account_type, "FUTURES");
    assert_eq!(snapshot.balances.len(), 1);
    assert_eq!(snapshot.balances[0].free, dec("7.0"));
    assert_eq!(snapshot.balances[0].locked, dec("3.0"));
    // free + locked reconciles with the exchange-reported wallet balance
    assert_eq!(snapshot.asset_total("USDT"), dec("10.0"));

    let margins = snapshot.futures.unwrap();
    assert_eq!(margins.total_wallet_balance, dec("10.0"));
    assert_eq!(margins.total_unrealized_profit, dec("0.5"));
}

#[test]
fn binance_futures_synthesizes_usdt_entry_when_assets_are_missing() {
    let raw = json!({
        "canTrade": true,
        "availableBalance": "123.45",
        "updateTime": 0
    });

    let snapshot = BinanceAdapter
        .normalize_account(ProductType::Futures, Network::Mainnet, &raw)
        .unwrap();

    assert_eq!(snapshot.balances.len(), 1);
    assert_eq!(snapshot.balances[0].asset, "USDT");
    assert_eq!(snapshot.balances[0].free, dec("123.45"));
    assert_eq!(snapshot.balances[0].locked, Decimal::ZERO);
}

#[test]
fn binance_futures_clamps_negative_derived_locked_to_zero() {
    let raw = json!({
        "assets": [
            {"asset": "USDT", "walletBalance": "5.0", "availableBalance": "8.0"}
        ]
    });

    let snapshot = BinanceAdapter
        .normalize_account(ProductType::Futures, Network::Mainnet, &raw)
        .unwrap();

    assert_eq!(snapshot.balances[0].free, dec("8.0"));
    assert_eq!(snapshot.balances[0].locked, Decimal::ZERO);
}

#[test]
fn bybit_wallet_reconciles_free_plus_locked_with_wallet_balance() {
    let raw = json!({
        "retCode": 0,
        "retMsg": "OK",
        "time": 1_700_000_000_456_i64,
        "result": {
            "list": [{
                "accountType": "UNIFIED",
                "totalWalletBalance": "5.0",
                "totalAvailableBalance": "3.0",
                "totalMarginBalance": "5.0",
                "totalPerpUPL": "0",
                "coin": [
                    {"coin": "USDT", "walletBalance": "5.0", "locked": "2.0"},
                    {"coin": "SHIB", "walletBalance": "0", "locked": "0"}
                ]
            }]
        }
    });

    let snapshot = BybitAdapter
        .normalize_account(ProductType::Spot, Network::Mainnet, &raw)
        .unwrap();

    assert_eq!(snapshot.account_type, "UNIFIED");
    assert_eq!(snapshot.balances.len(), 1);
    assert_eq!(snapshot.balances[0].free, dec("3.0"));
    assert_eq!(snapshot.balances[0].locked, dec("2.0"));
    assert_eq!(snapshot.asset_total("USDT"), dec("5.0"));
    assert_eq!(snapshot.update_time_ms, 1_700_000_000_456);
    assert!(snapshot.futures.is_none());
}

#[test]
fn bybit_futures_product_attaches_margin_totals() {
    let raw = json!({
        "retCode": 0,
        "retMsg": "OK",
        "result": {
            "list": [{
                "accountType": "UNIFIED",
                "totalWalletBalance": "100.0",
                "totalAvailableBalance": "80.0",
                "totalMarginBalance": "101.5",
                "totalPerpUPL": "1.5",
                "coin": [
                    {"coin": "USDT", "walletBalance": "100.0", "locked": "20.0"}
                ]
            }]
        }
    });

    let snapshot = BybitAdapter
        .normalize_account(ProductType::Futures, Network::Mainnet, &raw)
        .unwrap();

    let margins = snapshot.futures.unwrap();
    assert_eq!(margins.total_wallet_balance, dec("100.0"));
    assert_eq!(margins.available_balance, dec("80.0"));
    assert_eq!(margins.total_unrealized_profit, dec("1.5"));
}

#[test]
fn okx_details_map_avail_and_frozen_to_free_and_locked() {
    let raw = json!({
        "code": "0",
        "msg": "",
        "data": [{
            "uTime": "1700000000789",
            "totalEq": "41624.32",
            "details": [
                {"ccy": "BTC", "availBal": "0.4", "frozenBal": "0.1"},
                {"ccy": "USDT", "availBal": "0", "frozenBal": "0"}
            ]
        }]
    });

    let snapshot = OkxAdapter
        .normalize_account(ProductType::Spot, Network::Mainnet, &raw)
        .unwrap();

    assert_eq!(snapshot.account_type, "UNIFIED");
    assert_eq!(snapshot.balances.len(), 1);
    assert_eq!(snapshot.balances[0].asset, "BTC");
    assert_eq!(snapshot.balances[0].free, dec("0.4"));
    assert_eq!(snapshot.balances[0].locked, dec("0.1"));
    assert_eq!(snapshot.update_time_ms, 1_700_000_000_789);
}

#[test]
fn huobi_merges_trade_and_frozen_rows_per_currency() {
    let raw = json!({
        "status": "ok",
        "data": {
            "id": 42,
            "type": "spot",
            "state": "working",
            "list": [
                {"currency": "usdt", "type": "trade", "balance": "91.5"},
                {"currency": "usdt", "type": "frozen", "balance": "8.5"},
                {"currency": "btc", "type": "trade", "balance": "0"}
            ]
        }
    });

    let snapshot = HuobiAdapter
        .normalize_account(ProductType::Spot, Network::Mainnet, &raw)
        .unwrap();

    assert_eq!(snapshot.account_type, "SPOT");
    assert_eq!(snapshot.balances.len(), 1);
    assert_eq!(snapshot.balances[0].asset, "USDT");
    assert_eq!(snapshot.balances[0].free, dec("91.5"));
    assert_eq!(snapshot.balances[0].locked, dec("8.5"));
    assert_eq!(snapshot.asset_total("USDT"), dec("100.0"));
}

#[test]
fn kraken_spot_totals_become_free_balances() {
    let raw = json!({
        "error": [],
        "result": {
            "ZUSD": "171288.61",
            "XXBT": "0.10",
            "ZEUR": "0"
        }
    });

    let snapshot = KrakenAdapter
        .normalize_account(ProductType::Spot, Network::Mainnet, &raw)
        .unwrap();

    assert_eq!(snapshot.account_type, "SPOT");
    assert_eq!(snapshot.balances.len(), 2);
    for balance in &snapshot.balances {
        assert_eq!(balance.locked, Decimal::ZERO);
    }
    assert_eq!(snapshot.asset_total("ZUSD"), dec("171288.61"));
}

#[test]
fn kraken_futures_sums_numeric_balances_across_wallets() {
    let raw = json!({
        "result": "success",
        "accounts": {
            "cash": {
                "type": "cashAccount",
                "balances": {"xbt": 0.1, "usdt": 100.0}
            },
            "fi_xbtusd": {
                "type": "marginAccount",
                "balances": {"xbt": 0.05},
                "auxiliary": {"af": 0.04, "pnl": 0.0, "pv": 0.05}
            }
        }
    });

    let snapshot = KrakenAdapter
        .normalize_account(ProductType::Futures, Network::Testnet, &raw)
        .unwrap();

    assert_eq!(snapshot.account_type, "FUTURES_TESTNET");
    assert_eq!(snapshot.asset_total("XBT"), dec("0.15"));
    assert_eq!(snapshot.asset_total("USDT"), dec("100"));
    let margins = snapshot.futures.unwrap();
    assert_eq!(margins.available_balance, dec("0.04"));
}

#[test]
fn coinbase_hold_maps_to_locked_and_reconciles_with_balance() {
    let raw = json!([
        {"currency": "BTC", "balance": "0.5", "available": "0.4", "hold": "0.1", "trading_enabled": true},
        {"currency": "USD", "balance": "0", "available": "0", "hold": "0"}
    ]);

    let snapshot = CoinbaseAdapter
        .normalize_account(ProductType::Spot, Network::Mainnet, &raw)
        .unwrap();

    assert_eq!(snapshot.balances.len(), 1);
    assert_eq!(snapshot.balances[0].free, dec("0.4"));
    assert_eq!(snapshot.balances[0].locked, dec("0.1"));
    assert_eq!(snapshot.asset_total("BTC"), dec("0.5"));
    assert!(snapshot.can_trade);
}

#[test]
fn missing_numeric_fields_default_to_zero_instead_of_failing() {
    let raw = json!({
        "balances": [
            {"asset": "BTC", "free": "1"}
        ]
    });

    let snapshot = BinanceAdapter
        .normalize_account(ProductType::Spot, Network::Mainnet, &raw)
        .unwrap();

    assert_eq!(snapshot.balances.len(), 1);
    assert_eq!(snapshot.balances[0].locked, Decimal::ZERO);
}
