use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Exchanges this adapter can talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Exchange {
    Binance,
    Bybit,
    Okx,
    Huobi,
    Kraken,
    Coinbase,
}

impl Exchange {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Binance => "binance",
            Self::Bybit => "bybit",
            Self::Okx => "okx",
            Self::Huobi => "huobi",
            Self::Kraken => "kraken",
            Self::Coinbase => "coinbase",
        }
    }

    pub const fn all() -> [Self; 6] {
        [
            Self::Binance,
            Self::Bybit,
            Self::Okx,
            Self::Huobi,
            Self::Kraken,
            Self::Coinbase,
        ]
    }
}

impl fmt::Display for Exchange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Exchange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "binance" => Ok(Self::Binance),
            "bybit" => Ok(Self::Bybit),
            "okx" => Ok(Self::Okx),
            "huobi" => Ok(Self::Huobi),
            "kraken" => Ok(Self::Kraken),
            "coinbase" => Ok(Self::Coinbase),
            other => Err(format!("unknown exchange: {other}")),
        }
    }
}

/// Product family a bot trades on. Determines which endpoint family is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductType {
    Spot,
    Futures,
    FuturesRpa,
}

impl ProductType {
    /// Parse the `botType`/`productType` string from an inbound request.
    /// Anything that is not futures-flavored is treated as spot.
    pub fn from_bot_type(raw: &str) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "FUTURES" => Self::Futures,
            "FUTURES_RPA" => Self::FuturesRpa,
            _ => Self::Spot,
        }
    }

    pub const fn is_futures(self) -> bool {
        matches!(self, Self::Futures | Self::FuturesRpa)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Spot => "SPOT",
            Self::Futures => "FUTURES",
            Self::FuturesRpa => "FUTURES_RPA",
        }
    }
}

impl fmt::Display for ProductType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Mainnet,
    Testnet,
}

impl Network {
    pub const fn from_testnet(testnet: bool) -> Self {
        if testnet {
            Self::Testnet
        } else {
            Self::Mainnet
        }
    }

    pub const fn is_testnet(self) -> bool {
        matches!(self, Self::Testnet)
    }

    /// Suffix an account-type label with the network so callers can tell
    /// sandbox data from real data at a glance.
    pub fn tag(self, label: &str) -> String {
        match self {
            Self::Mainnet => label.to_string(),
            Self::Testnet => format!("{label}_TESTNET"),
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mainnet => "mainnet",
            Self::Testnet => "testnet",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One asset's balance, normalized. `free` and `locked` are never negative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceEntry {
    pub asset: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub free: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub locked: Decimal,
}

impl BalanceEntry {
    pub fn new(asset: impl Into<String>, free: Decimal, locked: Decimal) -> Self {
        Self {
            asset: asset.into(),
            free: conversion::non_negative(free),
            locked: conversion::non_negative(locked),
        }
    }

    pub fn is_zero(&self) -> bool {
        self.free.is_zero() && self.locked.is_zero()
    }

    pub fn total(&self) -> Decimal {
        self.free + self.locked
    }
}

/// Margin totals only futures accounts report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FuturesMargins {
    #[serde(with = "rust_decimal::serde::str")]
    pub total_wallet_balance: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub available_balance: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub total_margin_balance: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub total_unrealized_profit: Decimal,
}

/// Normalized account state, the one shape every exchange response is
/// converted into. Built fresh per call; staleness is bounded only by the
/// caller's polling interval.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSnapshot {
    pub account_type: String,
    pub can_trade: bool,
    pub can_withdraw: bool,
    pub can_deposit: bool,
    pub balances: Vec<BalanceEntry>,
    pub update_time_ms: i64,
    pub demo_mode: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub futures: Option<FuturesMargins>,
}

impl AccountSnapshot {
    /// Sum of free and locked for one asset, used as a consistency check
    /// against exchange-reported totals.
    pub fn asset_total(&self, asset: &str) -> Decimal {
        self.balances
            .iter()
            .filter(|b| b.asset == asset)
            .map(BalanceEntry::total)
            .sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuoteSource {
    /// Fetched from the exchange just now.
    Live,
    /// The configured fallback value, served because the exchange was
    /// unreachable. Callers must treat it as stale.
    Fallback,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceQuote {
    pub symbol: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub price: Decimal,
    pub timestamp_ms: i64,
    pub source_network: Network,
    pub product_type: ProductType,
    pub source: QuoteSource,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderSide {
    Buy,
    Sell,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderType {
    Market,
    Limit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeInForce {
    #[serde(rename = "GTC")]
    Gtc,
    #[serde(rename = "IOC")]
    Ioc,
    #[serde(rename = "FOK")]
    Fok,
}

impl TimeInForce {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Gtc => "GTC",
            Self::Ioc => "IOC",
            Self::Fok => "FOK",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub symbol: String,
    pub side: OrderSide,
    pub order_type: OrderType,
    #[serde(with = "rust_decimal::serde::str")]
    pub quantity: Decimal,
    #[serde(
        with = "rust_decimal::serde::str_option",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_in_force: Option<TimeInForce>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderAck {
    pub order_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_order_id: Option<String>,
    pub status: String,
    pub symbol: String,
}

/// Inbound request body, one per bot call. Credentials ride along on every
/// call and are never persisted by this layer.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BotRequest {
    pub exchange: Exchange,
    pub api_key: String,
    pub api_secret: String,
    pub testnet: bool,
    #[serde(alias = "botType")]
    pub product_type: String,
    #[serde(default)]
    pub symbol: Option<String>,
}

impl BotRequest {
    pub fn product(&self) -> ProductType {
        ProductType::from_bot_type(&self.product_type)
    }

    pub const fn network(&self) -> Network {
        Network::from_testnet(self.testnet)
    }
}

/// Lossy string-to-decimal helpers. Exchange payloads routinely omit or
/// malform numeric fields; balances render as zero instead of failing.
pub mod conversion {
    use rust_decimal::prelude::FromPrimitive;
    use rust_decimal::Decimal;

    #[inline]
    pub fn dec_or_zero(s: &str) -> Decimal {
        s.trim().parse().unwrap_or(Decimal::ZERO)
    }

    #[inline]
    pub fn dec_from_f64(value: f64) -> Decimal {
        Decimal::from_f64(value).unwrap_or(Decimal::ZERO)
    }

    #[inline]
    pub fn non_negative(value: Decimal) -> Decimal {
        if value.is_sign_negative() {
            Decimal::ZERO
        } else {
            value
        }
    }
}
