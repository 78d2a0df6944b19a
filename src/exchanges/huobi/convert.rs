use crate::core::errors::ExchangeError;
use crate::core::kernel::signer::timestamp_ms;
use crate::core::types::{
    conversion::dec_or_zero, AccountSnapshot, BalanceEntry, Exchange, Network,
};
use crate::exchanges::huobi::types::{HuobiBalanceData, HuobiEnvelope};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Convert a balance response. Each currency arrives as separate "trade"
/// and "frozen" rows that are merged into one entry per asset.
pub fn normalize_balance(
    network: Network,
    envelope: HuobiEnvelope<HuobiBalanceData>,
) -> Result<AccountSnapshot, ExchangeError> {
    let data = envelope
        .data
        .ok_or_else(|| ExchangeError::MalformedResponse {
            exchange: Exchange::Huobi,
            detail: "balance response has no data".to_string(),
        })?;

    let mut merged: BTreeMap<String, (Decimal, Decimal)> = BTreeMap::new();
    for row in &data.list {
        let asset = row.currency.to_uppercase();
        let amount = dec_or_zero(&row.balance);
        let entry = merged.entry(asset).or_insert((Decimal::ZERO, Decimal::ZERO));
        match row.balance_type.as_str() {
            "frozen" => entry.1 += amount,
            _ => entry.0 += amount,
        }
    }

    let balances = merged
        .into_iter()
        .map(|(asset, (free, locked))| BalanceEntry::new(asset, free, locked))
        .filter(|b| !b.is_zero())
        .collect();

    let label = if data.account_type.is_empty() {
        "SPOT".to_string()
    } else {
        data.account_type.to_uppercase()
    };

    Ok(AccountSnapshot {
        account_type: network.tag(&label),
        can_trade: true,
        can_withdraw: false,
        can_deposit: false,
        balances,
        update_time_ms: timestamp_ms().map_or(0, |t| t as i64),
        demo_mode: false,
        futures: None,
    })
}
