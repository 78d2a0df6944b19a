use serde::Deserialize;

fn default_zero() -> String {
    "0".to_string()
}

#[derive(Debug, Deserialize)]
pub struct BinanceBalance {
    pub asset: String,
    #[serde(default = "default_zero")]
    pub free: String,
    #[serde(default = "default_zero")]
    pub locked: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BinanceSpotAccount {
    #[serde(default)]
    pub account_type: Option<String>,
    #[serde(default)]
    pub can_trade: bool,
    #[serde(default)]
    pub can_withdraw: bool,
    #[serde(default)]
    pub can_deposit: bool,
    #[serde(default)]
    pub update_time: i64,
    #[serde(default)]
    pub balances: Vec<BinanceBalance>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BinanceFuturesAsset {
    pub asset: String,
    #[serde(default = "default_zero")]
    pub wallet_balance: String,
    #[serde(default = "default_zero")]
    pub available_balance: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BinanceFuturesAccount {
    #[serde(default)]
    pub can_trade: bool,
    #[serde(default)]
    pub can_withdraw: bool,
    #[serde(default)]
    pub can_deposit: bool,
    #[serde(default = "default_zero")]
    pub total_wallet_balance: String,
    /// Absent on some futures account variants; when `assets` is also
    /// missing this is the only balance signal left.
    #[serde(default)]
    pub available_balance: Option<String>,
    #[serde(default = "default_zero")]
    pub total_margin_balance: String,
    #[serde(default = "default_zero")]
    pub total_unrealized_profit: String,
    #[serde(default)]
    pub update_time: i64,
    #[serde(default)]
    pub assets: Vec<BinanceFuturesAsset>,
}

#[derive(Debug, Deserialize)]
pub struct BinanceTickerPrice {
    pub symbol: String,
    pub price: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BinanceOrderAck {
    pub order_id: u64,
    #[serde(default)]
    pub client_order_id: Option<String>,
    #[serde(default)]
    pub status: String,
    pub symbol: String,
}

#[derive(Debug, Deserialize)]
pub struct BinanceErrorBody {
    pub code: i64,
    #[serde(default)]
    pub msg: String,
}
