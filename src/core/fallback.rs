use crate::core::config::{ExchangeCredentials, FacadeConfig};
use crate::core::endpoints::{self, EndpointSet};
use crate::core::errors::{ExchangeError, TransientKind};
use crate::core::kernel::rest::RestClient;
use crate::core::kernel::signer;
use crate::core::traits::{ExchangeAdapter, RequestSpec};
use crate::core::types::{AccountSnapshot, BalanceEntry, Exchange, Network, ProductType};
use rust_decimal::Decimal;
use serde_json::Value;
use tracing::{debug, instrument, warn};

/// Account-type label stamped on a snapshot obtained through the spot
/// fallback, so callers know normalization assumptions changed.
pub const SPOT_FALLBACK_ACCOUNT_TYPE: &str = "SPOT_FALLBACK";

/// Lifecycle of one account fetch. `PrimaryAttempt` and `FallbackAttempt`
/// are the two request phases; `Success` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackState {
    PrimaryAttempt,
    FallbackAttempt,
    Success,
    Failed,
}

/// Why the coordinator moved from the primary to the fallback attempt.
/// Timeout is deliberately distinct from permission-denied; both are
/// retried at most once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    PermissionDenied,
    Timeout,
}

/// Result of a coordinated fetch, with the terminal state and the fallback
/// transition (if one was taken) observable for callers and tests.
#[derive(Debug)]
pub struct FallbackOutcome {
    pub state: FallbackState,
    pub fallback_reason: Option<FallbackReason>,
    pub result: Result<AccountSnapshot, ExchangeError>,
}

/// Drives the at-most-two-attempt account fetch: primary product type first,
/// then (futures only) the spot sibling on an authorization failure or a
/// primary-path timeout.
pub struct FallbackCoordinator<'a, R: RestClient> {
    rest: &'a R,
    adapter: &'a dyn ExchangeAdapter,
    config: &'a FacadeConfig,
}

impl<'a, R: RestClient> FallbackCoordinator<'a, R> {
    pub const fn new(
        rest: &'a R,
        adapter: &'a dyn ExchangeAdapter,
        config: &'a FacadeConfig,
    ) -> Self {
        Self {
            rest,
            adapter,
            config,
        }
    }

    /// Fetch an account snapshot.
    ///
    /// With no credentials this never fails: it serves the demo snapshot so
    /// a dashboard can always render. With credentials present, definitive
    /// rejections become `PermissionDenied` with remediation hints.
    #[instrument(
        skip(self, credentials),
        fields(exchange = %self.adapter.exchange(), key = %credentials.masked_key(), %product, %network)
    )]
    pub async fn run(
        &self,
        credentials: &ExchangeCredentials,
        product: ProductType,
        network: Network,
    ) -> FallbackOutcome {
        if !credentials.has_credentials() {
            debug!("no credentials supplied, serving demo snapshot");
            return FallbackOutcome {
                state: FallbackState::Success,
                fallback_reason: None,
                result: Ok(demo_snapshot(self.config)),
            };
        }

        let primary = self.attempt(credentials, product, network).await;
        let primary_err = match primary {
            Ok(snapshot) => {
                return FallbackOutcome {
                    state: FallbackState::Success,
                    fallback_reason: None,
                    result: Ok(snapshot),
                }
            }
            Err(err) => err,
        };

        let Some(reason) = fallback_reason(&primary_err, product) else {
            return FallbackOutcome {
                state: FallbackState::Failed,
                fallback_reason: None,
                result: Err(terminal_error(self.adapter.exchange(), primary_err)),
            };
        };

        warn!(?reason, "primary attempt failed, retrying as spot");
        match self.attempt(credentials, ProductType::Spot, network).await {
            Ok(mut snapshot) => {
                snapshot.account_type = SPOT_FALLBACK_ACCOUNT_TYPE.to_string();
                FallbackOutcome {
                    state: FallbackState::Success,
                    fallback_reason: Some(reason),
                    result: Ok(snapshot),
                }
            }
            Err(fallback_err) => FallbackOutcome {
                state: FallbackState::Failed,
                fallback_reason: Some(reason),
                result: Err(terminal_error(self.adapter.exchange(), fallback_err)),
            },
        }
    }

    async fn attempt(
        &self,
        credentials: &ExchangeCredentials,
        product: ProductType,
        network: Network,
    ) -> Result<AccountSnapshot, ExchangeError> {
        let endpoints = endpoints::resolve(self.adapter.exchange(), product, network)?;
        let mut spec = self.adapter.account_spec(&endpoints, product);

        if let Some(prelude) = self.adapter.account_prelude(&endpoints, product) {
            let raw = execute_spec(
                self.rest,
                self.adapter,
                credentials,
                &endpoints,
                &prelude,
                self.config.recv_window_ms,
            )
            .await?;
            spec = self.adapter.apply_prelude(spec, &raw)?;
        }

        let raw = execute_spec(
            self.rest,
            self.adapter,
            credentials,
            &endpoints,
            &spec,
            self.config.recv_window_ms,
        )
        .await?;
        self.adapter.normalize_account(product, network, &raw)
    }
}

/// Sign (when required), issue, reclassify non-2xx responses through the
/// adapter, and run the envelope check on 2xx bodies.
pub(crate) async fn execute_spec<R: RestClient>(
    rest: &R,
    adapter: &dyn ExchangeAdapter,
    credentials: &ExchangeCredentials,
    endpoints: &EndpointSet,
    spec: &RequestSpec,
    recv_window_ms: u64,
) -> Result<Value, ExchangeError> {
    let request = if spec.requires_signature {
        let timestamp = signer::timestamp_ms()?;
        adapter.sign(credentials, endpoints, spec, timestamp, recv_window_ms)?
    } else {
        spec.build_unsigned(adapter.exchange(), endpoints.base_url)
    };

    let raw = match rest.execute(&request).await {
        Ok(raw) => raw,
        Err(ExchangeError::ApiError { status, body }) => {
            return Err(adapter.classify_api_error(status, &body))
        }
        Err(other) => return Err(other),
    };

    adapter.check_envelope(&raw)?;
    Ok(raw)
}

/// Whether an error on the primary attempt justifies the one spot retry.
/// The direction is asymmetric: futures keys commonly lack spot scope's
/// near-universal provisioning, so only futures-flavored products fall back.
fn fallback_reason(err: &ExchangeError, product: ProductType) -> Option<FallbackReason> {
    if !product.is_futures() {
        return None;
    }
    match err {
        ExchangeError::AuthorizationError { .. } => Some(FallbackReason::PermissionDenied),
        ExchangeError::TransientNetwork {
            kind: TransientKind::Timeout,
            ..
        } => Some(FallbackReason::Timeout),
        _ => None,
    }
}

/// Convert a definitive failure into what the caller sees. Authorization
/// rejections gain remediation hints; everything else passes through.
fn terminal_error(exchange: Exchange, err: ExchangeError) -> ExchangeError {
    match err {
        ExchangeError::AuthorizationError { code, message, .. } => {
            ExchangeError::PermissionDenied {
                message: format!("{exchange} rejected the API key: {message}"),
                code,
                instructions: remediation_instructions(exchange),
            }
        }
        other => other,
    }
}

pub fn remediation_instructions(exchange: Exchange) -> Vec<String> {
    vec![
        format!("Verify the API key and secret were copied from {exchange} without truncation"),
        "Check that the key has read permission (and trading permission if the bot places orders)"
            .to_string(),
        "If the key is IP-restricted, add this server's address to the allowlist".to_string(),
        "Confirm the key has not expired or been revoked".to_string(),
    ]
}

/// Placeholder snapshot served when no credentials were supplied. An
/// explicit terminal state, not an error path, so the UI renders without
/// special-casing.
pub fn demo_snapshot(config: &FacadeConfig) -> AccountSnapshot {
    AccountSnapshot {
        account_type: "DEMO".to_string(),
        can_trade: false,
        can_withdraw: false,
        can_deposit: false,
        balances: vec![BalanceEntry::new(
            "USDT",
            config.demo_balance,
            Decimal::ZERO,
        )],
        update_time_ms: signer::timestamp_ms().map_or(0, |t| t as i64),
        demo_mode: true,
        futures: None,
    }
}
