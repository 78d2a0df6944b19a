/// Transport kernel: exchange-agnostic HTTP plumbing and request signing.
///
/// The kernel contains no exchange-specific logic. Per-exchange quirks
/// (header names, signature placement, canonicalization order) live in the
/// adapters under `crate::exchanges`; the kernel only provides the pure
/// signing primitive and the HTTP surface they compose.
pub mod rest;
pub mod signer;

// Re-export key types for convenience
pub use rest::{
    HttpMethod, HttpRequest, ReqwestRest, RestClient, RestClientBuilder, RestClientConfig,
};
pub use signer::{build_query_string, hmac_sha256_hex, timestamp_ms};
