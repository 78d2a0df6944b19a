use serde::Deserialize;
use std::collections::BTreeMap;

/// Spot envelope: a non-empty `error` array signals failure even on 2xx.
#[derive(Debug, Deserialize)]
pub struct KrakenSpotEnvelope<T> {
    #[serde(default)]
    pub error: Vec<String>,
    #[serde(default)]
    pub result: Option<T>,
}

/// Spot balances: a plain asset-to-total map, no free/locked split.
pub type KrakenSpotBalances = BTreeMap<String, String>;

#[derive(Debug, Deserialize)]
pub struct KrakenTickerInfo {
    /// Last trade closed: [price, lot volume].
    #[serde(default)]
    pub c: Vec<String>,
}

pub type KrakenTickerResult = BTreeMap<String, KrakenTickerInfo>;

/// Futures auxiliary margin numbers; everything arrives as JSON numbers.
#[derive(Debug, Deserialize)]
pub struct KrakenFuturesAuxiliary {
    #[serde(default)]
    pub af: f64,
    #[serde(default)]
    pub pnl: f64,
    #[serde(default)]
    pub pv: f64,
}

#[derive(Debug, Deserialize)]
pub struct KrakenFuturesAccount {
    #[serde(rename = "type", default)]
    pub account_type: String,
    #[serde(default)]
    pub balances: BTreeMap<String, f64>,
    #[serde(default)]
    pub auxiliary: Option<KrakenFuturesAuxiliary>,
}

#[derive(Debug, Deserialize)]
pub struct KrakenFuturesEnvelope {
    #[serde(default)]
    pub result: String,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub accounts: BTreeMap<String, KrakenFuturesAccount>,
}

#[derive(Debug, Deserialize)]
pub struct KrakenFuturesTicker {
    pub symbol: String,
    #[serde(default)]
    pub last: f64,
}

#[derive(Debug, Deserialize)]
pub struct KrakenFuturesTickersEnvelope {
    #[serde(default)]
    pub result: String,
    #[serde(default)]
    pub tickers: Vec<KrakenFuturesTicker>,
}
