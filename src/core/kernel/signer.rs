use crate::core::errors::ExchangeError;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::time::{SystemTime, UNIX_EPOCH};

type HmacSha256 = Hmac<Sha256>;

/// Hex HMAC-SHA256 over a canonical payload.
///
/// Pure and reentrant; callers own the canonicalization, including parameter
/// order. Only an empty secret is rejected here - a wrong-but-present secret
/// produces a valid signature that the exchange rejects server-side.
pub fn hmac_sha256_hex(secret: &str, payload: &str) -> Result<String, ExchangeError> {
    if secret.is_empty() {
        return Err(ExchangeError::SigningError(
            "secret must not be empty".to_string(),
        ));
    }

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| ExchangeError::SigningError(format!("failed to create HMAC: {e}")))?;
    mac.update(payload.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Serialize query parameters in the exact order supplied. Exchanges differ
/// on whether order matters, so reordering is the caller's job.
#[must_use]
pub fn build_query_string(params: &[(String, String)]) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&")
}

/// Wall-clock milliseconds since the epoch.
#[allow(clippy::cast_possible_truncation)]
pub fn timestamp_ms() -> Result<u64, ExchangeError> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|duration| duration.as_millis() as u64)
        .map_err(|e| ExchangeError::SigningError(format!("system clock error: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signing_is_deterministic() {
        let a = hmac_sha256_hex("secret", "symbol=BTCUSDT&timestamp=1").unwrap();
        let b = hmac_sha256_hex("secret", "symbol=BTCUSDT&timestamp=1").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn known_vector_matches() {
        // RFC-style test vector for HMAC-SHA256.
        let digest =
            hmac_sha256_hex("key", "The quick brown fox jumps over the lazy dog").unwrap();
        assert_eq!(
            digest,
            "f7bc83f430538424b13298e6aa6fb143ef4d59a14946175997479dbc2d1a3cd8"
        );
    }

    #[test]
    fn single_character_change_flips_the_digest() {
        let a = hmac_sha256_hex("secret", "symbol=BTCUSDT").unwrap();
        let b = hmac_sha256_hex("secret", "symbol=BTCUSDU").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn empty_secret_is_rejected() {
        let err = hmac_sha256_hex("", "anything").unwrap_err();
        assert!(matches!(err, ExchangeError::SigningError(_)));
    }

    #[test]
    fn query_string_preserves_insertion_order() {
        let params = vec![
            ("z".to_string(), "1".to_string()),
            ("a".to_string(), "2".to_string()),
        ];
        assert_eq!(build_query_string(&params), "z=1&a=2");
    }
}
