use crate::core::kernel::signer::timestamp_ms;
use crate::core::types::{
    conversion::dec_or_zero, AccountSnapshot, BalanceEntry, Network,
};
use crate::exchanges::coinbase::types::CoinbaseAccount;

/// Convert the accounts listing. `hold` maps to locked; `available` plus
/// `hold` reconciles with the reported `balance` total.
pub fn normalize_accounts(network: Network, accounts: Vec<CoinbaseAccount>) -> AccountSnapshot {
    let can_trade = accounts
        .iter()
        .any(|a| a.trading_enabled.unwrap_or(true));

    let balances = accounts
        .into_iter()
        .map(|a| {
            BalanceEntry::new(
                a.currency,
                dec_or_zero(&a.available),
                dec_or_zero(&a.hold),
            )
        })
        .filter(|b| !b.is_zero())
        .collect();

    AccountSnapshot {
        account_type: network.tag("SPOT"),
        can_trade,
        can_withdraw: false,
        can_deposit: false,
        balances,
        update_time_ms: timestamp_ms().map_or(0, |t| t as i64),
        demo_mode: false,
        futures: None,
    }
}
