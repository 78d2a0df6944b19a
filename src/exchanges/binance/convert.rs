use crate::core::types::{
    conversion::{dec_or_zero, non_negative},
    AccountSnapshot, BalanceEntry, FuturesMargins, Network,
};
use crate::exchanges::binance::types::{BinanceFuturesAccount, BinanceSpotAccount};

/// Convert a spot account response, dropping dust (free and locked both
/// zero) so the UI is not flooded.
pub fn normalize_spot_account(network: Network, account: BinanceSpotAccount) -> AccountSnapshot {
    let balances = account
        .balances
        .into_iter()
        .map(|b| BalanceEntry::new(b.asset, dec_or_zero(&b.free), dec_or_zero(&b.locked)))
        .filter(|b| !b.is_zero())
        .collect();

    AccountSnapshot {
        account_type: network.tag(account.account_type.as_deref().unwrap_or("SPOT")),
        can_trade: account.can_trade,
        can_withdraw: account.can_withdraw,
        can_deposit: account.can_deposit,
        balances,
        update_time_ms: account.update_time,
        demo_mode: false,
        futures: None,
    }
}

/// Convert a futures account response. Locked margin is derived as
/// walletBalance minus availableBalance when the exchange does not report
/// it; a missing `assets` array degrades to a single synthesized USDT entry
/// so there is always something to render.
pub fn normalize_futures_account(
    network: Network,
    account: BinanceFuturesAccount,
) -> AccountSnapshot {
    let mut balances: Vec<BalanceEntry> = account
        .assets
        .iter()
        .map(|asset| {
            let wallet = dec_or_zero(&asset.wallet_balance);
            let free = dec_or_zero(&asset.available_balance);
            BalanceEntry::new(asset.asset.clone(), free, non_negative(wallet - free))
        })
        .filter(|b| !b.is_zero())
        .collect();

    if account.assets.is_empty() {
        if let Some(available) = &account.available_balance {
            balances = vec![BalanceEntry::new(
                "USDT",
                dec_or_zero(available),
                rust_decimal::Decimal::ZERO,
            )];
        }
    }

    let margins = FuturesMargins {
        total_wallet_balance: dec_or_zero(&account.total_wallet_balance),
        available_balance: dec_or_zero(account.available_balance.as_deref().unwrap_or("0")),
        total_margin_balance: dec_or_zero(&account.total_margin_balance),
        total_unrealized_profit: dec_or_zero(&account.total_unrealized_profit),
    };

    AccountSnapshot {
        account_type: network.tag("FUTURES"),
        can_trade: account.can_trade,
        can_withdraw: account.can_withdraw,
        can_deposit: account.can_deposit,
        balances,
        update_time_ms: account.update_time,
        demo_mode: false,
        futures: Some(margins),
    }
}
