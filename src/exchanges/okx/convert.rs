use crate::core::errors::ExchangeError;
use crate::core::types::{
    conversion::dec_or_zero, AccountSnapshot, BalanceEntry, Exchange, FuturesMargins, Network,
    ProductType,
};
use crate::exchanges::okx::types::{OkxBalanceData, OkxEnvelope};

/// Convert a unified trading-account balance. The same payload serves spot
/// and futures bots; the declared product type decides whether the margin
/// totals are attached.
pub fn normalize_balance(
    product: ProductType,
    network: Network,
    envelope: OkxEnvelope<OkxBalanceData>,
) -> Result<AccountSnapshot, ExchangeError> {
    let data = envelope
        .data
        .into_iter()
        .next()
        .ok_or_else(|| ExchangeError::MalformedResponse {
            exchange: Exchange::Okx,
            detail: "balance data array is empty".to_string(),
        })?;

    let balances = data
        .details
        .iter()
        .map(|d| {
            BalanceEntry::new(
                d.ccy.clone(),
                dec_or_zero(&d.avail_bal),
                dec_or_zero(&d.frozen_bal),
            )
        })
        .filter(|b| !b.is_zero())
        .collect();

    let futures = if product.is_futures() {
        let total_eq = dec_or_zero(&data.total_eq);
        Some(FuturesMargins {
            total_wallet_balance: total_eq,
            available_balance: dec_or_zero(data.avail_eq.as_deref().unwrap_or("0")),
            total_margin_balance: total_eq,
            total_unrealized_profit: rust_decimal::Decimal::ZERO,
        })
    } else {
        None
    };

    Ok(AccountSnapshot {
        account_type: network.tag("UNIFIED"),
        can_trade: true,
        can_withdraw: false,
        can_deposit: false,
        balances,
        update_time_ms: data.u_time.trim().parse().unwrap_or(0),
        demo_mode: false,
        futures,
    })
}
