pub mod core;
pub mod exchanges;
pub mod facade;

pub use crate::core::config::{ExchangeCredentials, FacadeConfig};
pub use crate::core::errors::{ErrorBody, ExchangeError};
pub use crate::core::types::{
    AccountSnapshot, BalanceEntry, BotRequest, Exchange, FuturesMargins, Network, OrderAck,
    OrderRequest, PriceQuote, ProductType, QuoteSource,
};
pub use crate::facade::BotFacade;
