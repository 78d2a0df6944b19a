use crate::core::types::{Exchange, Network, ProductType};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Transport-level failure classes that may be retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransientKind {
    Timeout,
    Connect,
}

impl fmt::Display for TransientKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => f.write_str("timeout"),
            Self::Connect => f.write_str("connect"),
        }
    }
}

#[derive(Error, Debug)]
pub enum ExchangeError {
    /// The secret was unusable. Garbage parameters still sign fine; the
    /// exchange rejects those server-side.
    #[error("signing failed: {0}")]
    SigningError(String),

    #[error("{exchange} does not support {product} on {network}")]
    UnsupportedCombination {
        exchange: Exchange,
        product: ProductType,
        network: Network,
    },

    /// The exchange rejected the key, signature, or permissions. Carries the
    /// exchange-reported error code verbatim.
    #[error("{exchange} rejected the request: {code} {message}")]
    AuthorizationError {
        exchange: Exchange,
        code: String,
        message: String,
    },

    /// Terminal permission failure, after any fallback was exhausted.
    #[error("permission denied: {message}")]
    PermissionDenied {
        message: String,
        code: String,
        instructions: Vec<String>,
    },

    #[error("network failure ({kind}): {detail}")]
    TransientNetwork { kind: TransientKind, detail: String },

    /// The exchange returned 2xx with a body the contract says cannot happen.
    #[error("malformed response from {exchange}: {detail}")]
    MalformedResponse { exchange: Exchange, detail: String },

    /// Non-2xx status that did not classify as an authorization failure.
    #[error("API error {status}: {body}")]
    ApiError { status: u16, body: String },

    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl ExchangeError {
    pub const fn is_timeout(&self) -> bool {
        matches!(
            self,
            Self::TransientNetwork {
                kind: TransientKind::Timeout,
                ..
            }
        )
    }

    pub const fn is_authorization(&self) -> bool {
        matches!(self, Self::AuthorizationError { .. })
    }
}

/// The structured error shape handed back to the calling UI. Stack traces
/// and raw bodies stay in the logs.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub error: String,
    pub code: String,
    pub instructions: Vec<String>,
}

impl From<&ExchangeError> for ErrorBody {
    fn from(err: &ExchangeError) -> Self {
        match err {
            ExchangeError::PermissionDenied {
                message,
                code,
                instructions,
            } => Self {
                error: message.clone(),
                code: code.clone(),
                instructions: instructions.clone(),
            },
            ExchangeError::AuthorizationError { code, message, .. } => Self {
                error: message.clone(),
                code: code.clone(),
                instructions: Vec::new(),
            },
            ExchangeError::TransientNetwork { kind, .. } => Self {
                error: "exchange temporarily unavailable".to_string(),
                code: format!("SERVICE_UNAVAILABLE_{}", kind.to_string().to_uppercase()),
                instructions: vec!["Retry after a short delay".to_string()],
            },
            ExchangeError::UnsupportedCombination {
                exchange,
                product,
                network,
            } => Self {
                error: format!("{exchange} does not support {product} on {network}"),
                code: "UNSUPPORTED_COMBINATION".to_string(),
                instructions: Vec::new(),
            },
            other => Self {
                error: other.to_string(),
                code: "EXCHANGE_ERROR".to_string(),
                instructions: Vec::new(),
            },
        }
    }
}
