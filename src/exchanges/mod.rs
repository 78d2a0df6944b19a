pub mod binance;
pub mod bybit;
pub mod coinbase;
pub mod huobi;
pub mod kraken;
pub mod okx;

use crate::core::traits::ExchangeAdapter;
use crate::core::types::Exchange;
use std::sync::Arc;

/// Dispatch to the adapter implementing one exchange's quirks.
pub fn adapter_for(exchange: Exchange) -> Arc<dyn ExchangeAdapter> {
    match exchange {
        Exchange::Binance => Arc::new(binance::BinanceAdapter),
        Exchange::Bybit => Arc::new(bybit::BybitAdapter),
        Exchange::Okx => Arc::new(okx::OkxAdapter),
        Exchange::Huobi => Arc::new(huobi::HuobiAdapter),
        Exchange::Kraken => Arc::new(kraken::KrakenAdapter),
        Exchange::Coinbase => Arc::new(coinbase::CoinbaseAdapter),
    }
}
