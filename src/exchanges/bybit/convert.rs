use crate::core::errors::ExchangeError;
use crate::core::types::{
    conversion::{dec_or_zero, non_negative},
    AccountSnapshot, BalanceEntry, Exchange, FuturesMargins, Network, ProductType,
};
use crate::exchanges::bybit::types::{BybitEnvelope, BybitWalletResult};

/// Convert a v5 wallet-balance response. Free is derived as walletBalance
/// minus locked so that free + locked always reconciles with the
/// exchange-reported total.
pub fn normalize_wallet(
    product: ProductType,
    network: Network,
    envelope: BybitEnvelope<BybitWalletResult>,
) -> Result<AccountSnapshot, ExchangeError> {
    let account = envelope
        .result
        .list
        .into_iter()
        .next()
        .ok_or_else(|| ExchangeError::MalformedResponse {
            exchange: Exchange::Bybit,
            detail: "wallet-balance result list is empty".to_string(),
        })?;

    let balances = account
        .coin
        .iter()
        .map(|coin| {
            let wallet = dec_or_zero(&coin.wallet_balance);
            let locked = dec_or_zero(&coin.locked);
            BalanceEntry::new(coin.coin.clone(), non_negative(wallet - locked), locked)
        })
        .filter(|b| !b.is_zero())
        .collect();

    let futures = if product.is_futures() {
        Some(FuturesMargins {
            total_wallet_balance: dec_or_zero(&account.total_wallet_balance),
            available_balance: dec_or_zero(&account.total_available_balance),
            total_margin_balance: dec_or_zero(&account.total_margin_balance),
            total_unrealized_profit: dec_or_zero(&account.total_perp_upl),
        })
    } else {
        None
    };

    Ok(AccountSnapshot {
        account_type: network.tag(account.account_type.as_deref().unwrap_or("UNIFIED")),
        can_trade: true,
        can_withdraw: false,
        can_deposit: false,
        balances,
        update_time_ms: envelope.time,
        demo_mode: false,
        futures,
    })
}
