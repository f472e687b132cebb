//! Configuration management for the Bento client

use std::time::Duration;

use compact_str::CompactString;

use super::error::{BentoError, Result};

/// Production API root
pub const DEFAULT_BASE_URL: &str = "https://app.bentonow.com/api/v1";

/// Timeout applied when none (or zero) is configured
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// How strictly credential lengths are checked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyLengthPolicy {
    /// Every credential must be between `min` and `max` characters, inclusive
    Band { min: usize, max: usize },
    /// Only reject blank credentials
    NonEmpty,
}

impl Default for KeyLengthPolicy {
    fn default() -> Self {
        KeyLengthPolicy::Band { min: 28, max: 36 }
    }
}

/// Main configuration for the Bento client
#[derive(Clone)]
pub struct ClientConfig {
    /// Publishable key, sent as the basic auth username
    pub publishable_key: CompactString,
    /// Secret key, sent as the basic auth password
    pub secret_key: CompactString,
    /// Site identifier, appended to every request as `site_uuid`
    pub site_uuid: CompactString,
    /// API root, overridable for testing
    pub base_url: CompactString,
    /// Per-request timeout; zero means [`DEFAULT_TIMEOUT`]
    pub timeout: Duration,
    /// Credential length check
    pub key_policy: KeyLengthPolicy,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("publishable_key", &self.publishable_key)
            .field("secret_key", &"<redacted>")
            .field("site_uuid", &self.site_uuid)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("key_policy", &self.key_policy)
            .finish()
    }
}

impl ClientConfig {
    /// Create a new client configuration with default URL, timeout and key policy
    pub fn new(
        publishable_key: impl Into<CompactString>,
        secret_key: impl Into<CompactString>,
        site_uuid: impl Into<CompactString>,
    ) -> Self {
        Self {
            publishable_key: publishable_key.into(),
            secret_key: secret_key.into(),
            site_uuid: site_uuid.into(),
            base_url: DEFAULT_BASE_URL.into(),
            timeout: Duration::ZERO,
            key_policy: KeyLengthPolicy::default(),
        }
    }

    /// Create a builder for fluent configuration
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Load configuration from `BENTO_*` environment variables
    ///
    /// Reads `BENTO_PUBLISHABLE_KEY`, `BENTO_SECRET_KEY`, `BENTO_SITE_UUID`,
    /// and optionally `BENTO_TIMEOUT_SECS` and `BENTO_BASE_URL`.
    pub fn from_env() -> Result<Self> {
        let var = |name: &str| std::env::var(name).unwrap_or_default();

        let mut builder = Self::builder()
            .publishable_key(var("BENTO_PUBLISHABLE_KEY"))
            .secret_key(var("BENTO_SECRET_KEY"))
            .site_uuid(var("BENTO_SITE_UUID"));

        if let Ok(secs) = std::env::var("BENTO_TIMEOUT_SECS") {
            builder = builder.timeout(parse_timeout_secs(&secs)?);
        }

        if let Ok(url) = std::env::var("BENTO_BASE_URL") {
            builder = builder.base_url(url);
        }

        builder.build()
    }

    /// Validate the configuration and normalize a zero timeout
    pub fn validate(&mut self) -> Result<()> {
        for (field, value) in [
            ("publishable_key", &self.publishable_key),
            ("secret_key", &self.secret_key),
            ("site_uuid", &self.site_uuid),
        ] {
            if value.trim().is_empty() {
                return Err(BentoError::config(field, "cannot be empty"));
            }

            if let KeyLengthPolicy::Band { min, max } = self.key_policy {
                let len = value.chars().count();
                if len < min || len > max {
                    return Err(BentoError::config(
                        field,
                        format!("length {len} is outside the accepted range {min}-{max}"),
                    ));
                }
            }
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(BentoError::config("base_url", "must start with http:// or https://"));
        }

        if self.timeout.is_zero() {
            self.timeout = DEFAULT_TIMEOUT;
        }

        Ok(())
    }

    /// Set the API root
    pub fn with_base_url(mut self, base_url: impl Into<CompactString>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set credential length policy
    pub fn with_key_policy(mut self, policy: KeyLengthPolicy) -> Self {
        self.key_policy = policy;
        self
    }
}

/// Parse a signed seconds value, rejecting negatives
pub fn parse_timeout_secs(value: &str) -> Result<Duration> {
    let secs: i64 = value
        .trim()
        .parse()
        .map_err(|_| BentoError::config("timeout", format!("not a number: {value}")))?;

    timeout_from_secs(secs)
}

/// Convert a signed seconds value into a timeout, rejecting negatives
pub fn timeout_from_secs(secs: i64) -> Result<Duration> {
    u64::try_from(secs)
        .map(Duration::from_secs)
        .map_err(|_| BentoError::config("timeout", "must be non-negative"))
}

/// Builder for ClientConfig
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    publishable_key: Option<CompactString>,
    secret_key: Option<CompactString>,
    site_uuid: Option<CompactString>,
    base_url: Option<CompactString>,
    timeout: Option<Duration>,
    key_policy: Option<KeyLengthPolicy>,
}

impl ClientConfigBuilder {
    pub fn publishable_key(mut self, key: impl Into<CompactString>) -> Self {
        self.publishable_key = Some(key.into());
        self
    }

    pub fn secret_key(mut self, key: impl Into<CompactString>) -> Self {
        self.secret_key = Some(key.into());
        self
    }

    pub fn site_uuid(mut self, site_uuid: impl Into<CompactString>) -> Self {
        self.site_uuid = Some(site_uuid.into());
        self
    }

    pub fn base_url(mut self, url: impl Into<CompactString>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn key_policy(mut self, policy: KeyLengthPolicy) -> Self {
        self.key_policy = Some(policy);
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<ClientConfig> {
        let publishable_key = self
            .publishable_key
            .ok_or_else(|| BentoError::config("publishable_key", "is required"))?;
        let secret_key = self
            .secret_key
            .ok_or_else(|| BentoError::config("secret_key", "is required"))?;
        let site_uuid = self
            .site_uuid
            .ok_or_else(|| BentoError::config("site_uuid", "is required"))?;

        let mut config = ClientConfig {
            publishable_key,
            secret_key,
            site_uuid,
            base_url: self.base_url.unwrap_or_else(|| DEFAULT_BASE_URL.into()),
            timeout: self.timeout.unwrap_or_default(),
            key_policy: self.key_policy.unwrap_or_default(),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PUB_KEY: &str = "pk_0123456789abcdef0123456789ab";
    const SECRET: &str = "sk_0123456789abcdef0123456789ab";
    const SITE: &str = "0b1e5d2c-8a7f-4e3b-9c6d-1f2a3b4c5d6e";

    #[test]
    fn test_config_builder() {
        let config = ClientConfig::builder()
            .publishable_key(PUB_KEY)
            .secret_key(SECRET)
            .site_uuid(SITE)
            .build()
            .unwrap();

        assert_eq!(config.publishable_key, PUB_KEY);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert_eq!(config.key_policy, KeyLengthPolicy::Band { min: 28, max: 36 });
    }

    #[test]
    fn test_config_validation() {
        let mut config = ClientConfig::new(PUB_KEY, SECRET, SITE);
        assert!(config.validate().is_ok());

        for (pk, sk, site) in [("", SECRET, SITE), (PUB_KEY, "", SITE), (PUB_KEY, SECRET, "")] {
            let mut config = ClientConfig::new(pk, sk, site);
            assert!(matches!(
                config.validate(),
                Err(BentoError::InvalidConfiguration { .. })
            ));
        }

        let mut config = ClientConfig::new("   ", SECRET, SITE);
        assert!(config.validate().is_err());

        let mut config = ClientConfig::new(PUB_KEY, SECRET, SITE).with_base_url("not-a-url");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_key_length_band() {
        let mut short = ClientConfig::new("short", SECRET, SITE);
        let err = short.validate().unwrap_err();
        assert!(err.to_string().contains("publishable_key"));

        let mut long = ClientConfig::new(PUB_KEY, "x".repeat(37), SITE);
        assert!(long.validate().is_err());

        let mut edge = ClientConfig::new("a".repeat(28), "b".repeat(36), SITE);
        assert!(edge.validate().is_ok());
    }

    #[test]
    fn test_non_empty_policy_accepts_short_keys() {
        let config = ClientConfig::builder()
            .publishable_key("test-key")
            .secret_key("test-secret")
            .site_uuid("test-uuid")
            .key_policy(KeyLengthPolicy::NonEmpty)
            .build();

        assert!(config.is_ok());
    }

    #[test]
    fn test_zero_timeout_uses_default() {
        let mut config = ClientConfig::new(PUB_KEY, SECRET, SITE).with_timeout(Duration::ZERO);
        config.validate().unwrap();
        assert_eq!(config.timeout, Duration::from_secs(10));

        let mut config = ClientConfig::new(PUB_KEY, SECRET, SITE)
            .with_timeout(Duration::from_millis(1));
        config.validate().unwrap();
        assert_eq!(config.timeout, Duration::from_millis(1));
    }

    #[test]
    fn test_timeout_parsing() {
        assert_eq!(parse_timeout_secs("30").unwrap(), Duration::from_secs(30));
        assert_eq!(parse_timeout_secs("0").unwrap(), Duration::ZERO);
        assert!(matches!(
            parse_timeout_secs("-1"),
            Err(BentoError::InvalidConfiguration { .. })
        ));
        assert!(parse_timeout_secs("soon").is_err());
    }

    #[test]
    fn test_missing_builder_field() {
        let result = ClientConfig::builder().publishable_key(PUB_KEY).secret_key(SECRET).build();
        assert!(matches!(
            result,
            Err(BentoError::InvalidConfiguration { ref field, .. }) if field == "site_uuid"
        ));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = ClientConfig::new(PUB_KEY, SECRET, SITE);
        let debug = format!("{config:?}");
        assert!(!debug.contains(SECRET));
        assert!(debug.contains("<redacted>"));
    }
}
