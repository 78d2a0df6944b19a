use serde::Deserialize;

/// Envelope used by the v1 endpoints. `status` is "ok" or "error".
#[derive(Debug, Deserialize)]
pub struct HuobiEnvelope<T> {
    #[serde(default)]
    pub status: String,
    #[serde(rename = "err-code", default)]
    pub err_code: Option<String>,
    #[serde(rename = "err-msg", default)]
    pub err_msg: Option<String>,
    #[serde(default)]
    pub data: Option<T>,
}

#[derive(Debug, Deserialize)]
pub struct HuobiAccount {
    pub id: u64,
    #[serde(rename = "type", default)]
    pub account_type: String,
    #[serde(default)]
    pub state: String,
}

/// One row of the balance list; `type` is "trade" or "frozen" and the two
/// rows per currency are merged during normalization.
#[derive(Debug, Deserialize)]
pub struct HuobiBalanceRow {
    pub currency: String,
    #[serde(rename = "type", default)]
    pub balance_type: String,
    #[serde(default)]
    pub balance: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct HuobiBalanceData {
    #[serde(rename = "type", default)]
    pub account_type: String,
    #[serde(default)]
    pub list: Vec<HuobiBalanceRow>,
}

/// Aggregated ticker; prices arrive as JSON numbers, not strings.
#[derive(Debug, Deserialize)]
pub struct HuobiTick {
    #[serde(default)]
    pub close: f64,
}

#[derive(Debug, Deserialize)]
pub struct HuobiMergedTicker {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub ts: i64,
    #[serde(rename = "err-code", default)]
    pub err_code: Option<String>,
    #[serde(rename = "err-msg", default)]
    pub err_msg: Option<String>,
    #[serde(default)]
    pub tick: Option<HuobiTick>,
}
