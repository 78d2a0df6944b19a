use serde::Deserialize;

fn default_zero() -> String {
    "0".to_string()
}

/// v5 envelope. Business errors arrive as HTTP 200 with a non-zero retCode.
#[derive(Debug, Deserialize)]
pub struct BybitEnvelope<T> {
    #[serde(rename = "retCode")]
    pub ret_code: i64,
    #[serde(rename = "retMsg", default)]
    pub ret_msg: String,
    pub result: T,
    #[serde(default)]
    pub time: i64,
}

#[derive(Debug, Deserialize)]
pub struct BybitCoinBalance {
    pub coin: String,
    #[serde(rename = "walletBalance", default = "default_zero")]
    pub wallet_balance: String,
    #[serde(rename = "locked", default = "default_zero")]
    pub locked: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BybitWalletAccount {
    #[serde(default)]
    pub account_type: Option<String>,
    #[serde(default = "default_zero")]
    pub total_wallet_balance: String,
    #[serde(default = "default_zero")]
    pub total_available_balance: String,
    #[serde(default = "default_zero")]
    pub total_margin_balance: String,
    #[serde(rename = "totalPerpUPL", default = "default_zero")]
    pub total_perp_upl: String,
    #[serde(default)]
    pub coin: Vec<BybitCoinBalance>,
}

#[derive(Debug, Deserialize)]
pub struct BybitWalletResult {
    #[serde(default)]
    pub list: Vec<BybitWalletAccount>,
}

#[derive(Debug, Deserialize)]
pub struct BybitTicker {
    pub symbol: String,
    #[serde(rename = "lastPrice")]
    pub last_price: String,
}

#[derive(Debug, Deserialize)]
pub struct BybitTickerResult {
    #[serde(default)]
    pub list: Vec<BybitTicker>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BybitOrderResult {
    pub order_id: String,
    #[serde(default)]
    pub order_link_id: Option<String>,
}
