use serde::Deserialize;

fn default_zero() -> String {
    "0".to_string()
}

/// One row of the accounts listing; the endpoint returns a bare JSON array.
#[derive(Debug, Deserialize)]
pub struct CoinbaseAccount {
    pub currency: String,
    #[serde(default = "default_zero")]
    pub balance: String,
    #[serde(default = "default_zero")]
    pub available: String,
    #[serde(default = "default_zero")]
    pub hold: String,
    #[serde(default)]
    pub trading_enabled: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct CoinbaseTicker {
    pub price: String,
    #[serde(default)]
    pub time: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CoinbaseErrorBody {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct CoinbaseOrderAck {
    pub id: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub product_id: String,
}
