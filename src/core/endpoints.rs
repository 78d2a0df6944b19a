use crate::core::errors::ExchangeError;
use crate::core::types::{Exchange, Network, ProductType};

/// Resolved REST surface for one (exchange, product, network) combination.
/// Paths may carry `{symbol}` or `{account-id}` placeholders that the
/// exchange adapter fills in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointSet {
    pub base_url: &'static str,
    pub account_path: &'static str,
    pub balance_path: &'static str,
    pub price_path: &'static str,
    pub order_path: &'static str,
}

/// Endpoint family actually hit. Anything that is not futures-flavored
/// resolves to spot rather than erroring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Family {
    Spot,
    Futures,
}

/// Look up the REST surface for a combination. Combinations the table does
/// not carry fail with `UnsupportedCombination`; nothing silently defaults
/// to another network.
pub fn resolve(
    exchange: Exchange,
    product: ProductType,
    network: Network,
) -> Result<EndpointSet, ExchangeError> {
    let family = if product.is_futures() {
        Family::Futures
    } else {
        Family::Spot
    };

    let found = match (exchange, family, network) {
        (Exchange::Binance, Family::Spot, Network::Mainnet) => Some(EndpointSet {
            base_url: "https://api.binance.com",
            account_path: "/api/v3/account",
            balance_path: "/api/v3/account",
            price_path: "/api/v3/ticker/price",
            order_path: "/api/v3/order",
        }),
        (Exchange::Binance, Family::Spot, Network::Testnet) => Some(EndpointSet {
            base_url: "https://testnet.binance.vision",
            account_path: "/api/v3/account",
            balance_path: "/api/v3/account",
            price_path: "/api/v3/ticker/price",
            order_path: "/api/v3/order",
        }),
        (Exchange::Binance, Family::Futures, Network::Mainnet) => Some(EndpointSet {
            base_url: "https://fapi.binance.com",
            account_path: "/fapi/v2/account",
            balance_path: "/fapi/v2/account",
            price_path: "/fapi/v1/ticker/price",
            order_path: "/fapi/v1/order",
        }),
        (Exchange::Binance, Family::Futures, Network::Testnet) => Some(EndpointSet {
            base_url: "https://testnet.binancefuture.com",
            account_path: "/fapi/v2/account",
            balance_path: "/fapi/v2/account",
            price_path: "/fapi/v1/ticker/price",
            order_path: "/fapi/v1/order",
        }),
        // Bybit v5 serves spot and linear futures from the same unified paths;
        // the category query parameter does the splitting.
        (Exchange::Bybit, _, Network::Mainnet) => Some(EndpointSet {
            base_url: "https://api.bybit.com",
            account_path: "/v5/account/info",
            balance_path: "/v5/account/wallet-balance",
            price_path: "/v5/market/tickers",
            order_path: "/v5/order/create",
        }),
        (Exchange::Bybit, _, Network::Testnet) => Some(EndpointSet {
            base_url: "https://api-testnet.bybit.com",
            account_path: "/v5/account/info",
            balance_path: "/v5/account/wallet-balance",
            price_path: "/v5/market/tickers",
            order_path: "/v5/order/create",
        }),
        // OKX has no separate sandbox host.
        (Exchange::Okx, _, Network::Mainnet) => Some(EndpointSet {
            base_url: "https://www.okx.com",
            account_path: "/api/v5/account/config",
            balance_path: "/api/v5/account/balance",
            price_path: "/api/v5/market/ticker",
            order_path: "/api/v5/trade/order",
        }),
        (Exchange::Huobi, Family::Spot, Network::Mainnet) => Some(EndpointSet {
            base_url: "https://api.huobi.pro",
            account_path: "/v1/account/accounts",
            balance_path: "/v1/account/accounts/{account-id}/balance",
            price_path: "/market/detail/merged",
            order_path: "/v1/order/orders/place",
        }),
        (Exchange::Kraken, Family::Spot, Network::Mainnet) => Some(EndpointSet {
            base_url: "https://api.kraken.com",
            account_path: "/0/private/Balance",
            balance_path: "/0/private/Balance",
            price_path: "/0/public/Ticker",
            order_path: "/0/private/AddOrder",
        }),
        (Exchange::Kraken, Family::Futures, Network::Mainnet) => Some(EndpointSet {
            base_url: "https://futures.kraken.com",
            account_path: "/derivatives/api/v3/accounts",
            balance_path: "/derivatives/api/v3/accounts",
            price_path: "/derivatives/api/v3/tickers",
            order_path: "/derivatives/api/v3/sendorder",
        }),
        (Exchange::Kraken, Family::Futures, Network::Testnet) => Some(EndpointSet {
            base_url: "https://demo-futures.kraken.com",
            account_path: "/derivatives/api/v3/accounts",
            balance_path: "/derivatives/api/v3/accounts",
            price_path: "/derivatives/api/v3/tickers",
            order_path: "/derivatives/api/v3/sendorder",
        }),
        (Exchange::Coinbase, Family::Spot, Network::Mainnet) => Some(EndpointSet {
            base_url: "https://api.exchange.coinbase.com",
            account_path: "/accounts",
            balance_path: "/accounts",
            price_path: "/products/{symbol}/ticker",
            order_path: "/orders",
        }),
        (Exchange::Coinbase, Family::Spot, Network::Testnet) => Some(EndpointSet {
            base_url: "https://api-public.sandbox.exchange.coinbase.com",
            account_path: "/accounts",
            balance_path: "/accounts",
            price_path: "/products/{symbol}/ticker",
            order_path: "/orders",
        }),
        _ => None,
    };

    found.ok_or(ExchangeError::UnsupportedCombination {
        exchange,
        product,
        network,
    })
}
