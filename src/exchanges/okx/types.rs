use serde::Deserialize;

fn default_zero() -> String {
    "0".to_string()
}

/// Standard response wrapper. `code` is a string; "0" means success.
#[derive(Debug, Deserialize)]
pub struct OkxEnvelope<T> {
    pub code: String,
    #[serde(default)]
    pub msg: String,
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}

#[derive(Debug, Deserialize)]
pub struct OkxBalanceDetail {
    pub ccy: String,
    #[serde(rename = "availBal", default = "default_zero")]
    pub avail_bal: String,
    #[serde(rename = "frozenBal", default = "default_zero")]
    pub frozen_bal: String,
}

#[derive(Debug, Deserialize)]
pub struct OkxBalanceData {
    #[serde(rename = "uTime", default)]
    pub u_time: String,
    #[serde(rename = "totalEq", default = "default_zero")]
    pub total_eq: String,
    #[serde(rename = "availEq", default)]
    pub avail_eq: Option<String>,
    #[serde(default)]
    pub details: Vec<OkxBalanceDetail>,
}

#[derive(Debug, Deserialize)]
pub struct OkxTicker {
    #[serde(rename = "instId")]
    pub inst_id: String,
    pub last: String,
    #[serde(default)]
    pub ts: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OkxOrderData {
    pub ord_id: String,
    #[serde(default)]
    pub cl_ord_id: Option<String>,
    #[serde(default)]
    pub s_code: String,
    #[serde(default)]
    pub s_msg: String,
}
