use rust_decimal::Decimal;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// API credentials for one exchange account. Supplied per call by the
/// caller and never persisted by this layer.
#[derive(Debug, Clone)]
pub struct ExchangeCredentials {
    api_key: Secret<String>,
    api_secret: Secret<String>,
}

// Custom Serialize implementation - never expose secrets in serialization
impl Serialize for ExchangeCredentials {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("ExchangeCredentials", 2)?;
        state.serialize_field("api_key", "[REDACTED]")?;
        state.serialize_field("api_secret", "[REDACTED]")?;
        state.end()
    }
}

impl<'de> Deserialize<'de> for ExchangeCredentials {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Helper {
            api_key: String,
            api_secret: String,
        }

        let helper = Helper::deserialize(deserializer)?;
        Ok(Self::new(helper.api_key, helper.api_secret))
    }
}

impl ExchangeCredentials {
    #[must_use]
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            api_secret: Secret::new(api_secret.into()),
        }
    }

    /// Empty credentials, used when a caller has not connected an account.
    #[must_use]
    pub fn none() -> Self {
        Self::new(String::new(), String::new())
    }

    #[must_use]
    pub fn has_credentials(&self) -> bool {
        !self.api_key.expose_secret().is_empty() && !self.api_secret.expose_secret().is_empty()
    }

    /// Get API key (use carefully - exposes secret)
    pub fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }

    /// Get API secret (use carefully - exposes secret)
    pub fn api_secret(&self) -> &str {
        self.api_secret.expose_secret()
    }

    /// Short prefix safe to log. Never log the full key.
    #[must_use]
    pub fn masked_key(&self) -> String {
        let key = self.api_key.expose_secret();
        if key.is_empty() {
            "<none>".to_string()
        } else {
            let prefix: String = key.chars().take(4).collect();
            format!("{prefix}***")
        }
    }
}

/// Knobs the facade is constructed with. Everything that used to be a
/// hidden module-level default is injected here.
#[derive(Debug, Clone)]
pub struct FacadeConfig {
    /// Tolerance sent with every signed request to absorb clock skew.
    pub recv_window_ms: u64,
    /// Per-call HTTP timeout.
    pub timeout_seconds: u64,
    /// Synthetic USDT balance shown on the demo snapshot.
    pub demo_balance: Decimal,
    /// Served as a clearly-tagged quote when a price fetch fails
    /// transiently. `None` disables the behavior.
    pub fallback_price: Option<Decimal>,
}

impl Default for FacadeConfig {
    fn default() -> Self {
        Self {
            recv_window_ms: 50_000,
            timeout_seconds: 30,
            demo_balance: Decimal::from(10_000_i64),
            fallback_price: None,
        }
    }
}

impl FacadeConfig {
    #[must_use]
    pub const fn with_recv_window(mut self, recv_window_ms: u64) -> Self {
        self.recv_window_ms = recv_window_ms;
        self
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = timeout_seconds;
        self
    }

    #[must_use]
    pub const fn with_demo_balance(mut self, demo_balance: Decimal) -> Self {
        self.demo_balance = demo_balance;
        self
    }

    #[must_use]
    pub const fn with_fallback_price(mut self, fallback_price: Decimal) -> Self {
        self.fallback_price = Some(fallback_price);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_credentials_are_not_usable() {
        assert!(!ExchangeCredentials::none().has_credentials());
        assert!(!ExchangeCredentials::new("key", "").has_credentials());
        assert!(ExchangeCredentials::new("key", "secret").has_credentials());
    }

    #[test]
    fn masked_key_never_contains_the_full_key() {
        let creds = ExchangeCredentials::new("abcdef123456", "secret");
        assert_eq!(creds.masked_key(), "abcd***");
        assert_eq!(ExchangeCredentials::none().masked_key(), "<none>");
    }

    #[test]
    fn serialization_redacts_secrets() {
        let creds = ExchangeCredentials::new("realkey", "realsecret");
        let json = serde_json::to_string(&creds).unwrap();
        assert!(!json.contains("realkey"));
        assert!(!json.contains("realsecret"));
        assert!(json.contains("REDACTED"));
    }
}
