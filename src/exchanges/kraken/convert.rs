use crate::core::errors::ExchangeError;
use crate::core::kernel::signer::timestamp_ms;
use crate::core::types::{
    conversion::{dec_from_f64, dec_or_zero, non_negative},
    AccountSnapshot, BalanceEntry, Exchange, FuturesMargins, Network,
};
use crate::exchanges::kraken::types::{
    KrakenFuturesEnvelope, KrakenSpotBalances, KrakenSpotEnvelope,
};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Convert spot balances. The venue reports one total per asset, so the
/// whole amount is treated as free.
pub fn normalize_spot_balances(
    network: Network,
    envelope: KrakenSpotEnvelope<KrakenSpotBalances>,
) -> Result<AccountSnapshot, ExchangeError> {
    let result = envelope
        .result
        .ok_or_else(|| ExchangeError::MalformedResponse {
            exchange: Exchange::Kraken,
            detail: "balance response has no result".to_string(),
        })?;

    let balances = result
        .into_iter()
        .map(|(asset, total)| BalanceEntry::new(asset, dec_or_zero(&total), Decimal::ZERO))
        .filter(|b| !b.is_zero())
        .collect();

    Ok(AccountSnapshot {
        account_type: network.tag("SPOT"),
        can_trade: true,
        can_withdraw: false,
        can_deposit: false,
        balances,
        update_time_ms: timestamp_ms().map_or(0, |t| t as i64),
        demo_mode: false,
        futures: None,
    })
}

/// Convert futures accounts. Balances are summed per asset across wallets;
/// margin totals come from the first margin account's auxiliary block.
pub fn normalize_futures_accounts(
    network: Network,
    envelope: KrakenFuturesEnvelope,
) -> AccountSnapshot {
    let mut totals: BTreeMap<String, Decimal> = BTreeMap::new();
    for account in envelope.accounts.values() {
        for (asset, amount) in &account.balances {
            *totals
                .entry(asset.to_uppercase())
                .or_insert(Decimal::ZERO) += dec_from_f64(*amount);
        }
    }

    let balances = totals
        .into_iter()
        .map(|(asset, total)| BalanceEntry::new(asset, total, Decimal::ZERO))
        .filter(|b| !b.is_zero())
        .collect();

    let margins = envelope
        .accounts
        .values()
        .find_map(|account| account.auxiliary.as_ref())
        .map(|aux| {
            let portfolio = dec_from_f64(aux.pv);
            let available = dec_from_f64(aux.af);
            FuturesMargins {
                total_wallet_balance: non_negative(portfolio),
                available_balance: non_negative(available),
                total_margin_balance: non_negative(portfolio),
                total_unrealized_profit: dec_from_f64(aux.pnl),
            }
        });

    AccountSnapshot {
        account_type: network.tag("FUTURES"),
        can_trade: true,
        can_withdraw: false,
        can_deposit: false,
        balances,
        update_time_ms: timestamp_ms().map_or(0, |t| t as i64),
        demo_mode: false,
        futures: margins,
    }
}
