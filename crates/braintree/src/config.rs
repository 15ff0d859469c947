//! Gateway client configuration.
//!
//! Credentials and the target environment are supplied explicitly or read
//! from `BRAINTREE_*` environment variables. Binaries are expected to call
//! `dotenvy::dotenv()` before [`Configuration::from_env`].

use std::env;
use std::fmt;
use std::str::FromStr;

use url::Url;

use crate::constants::{DEFAULT_TIMEOUT_SECS, DEVELOPMENT_URL, PRODUCTION_URL, SANDBOX_URL};

/// Gateway environment a client talks to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Sandbox,
    Production,
    /// Any other gateway host, e.g. a local mock server.
    Custom(Url),
}

impl Environment {
    /// Base URL requests are issued against, without a trailing slash.
    pub fn base_url(&self) -> String {
        match self {
            Environment::Development => DEVELOPMENT_URL.to_string(),
            Environment::Sandbox => SANDBOX_URL.to_string(),
            Environment::Production => PRODUCTION_URL.to_string(),
            Environment::Custom(url) => url.as_str().trim_end_matches('/').to_string(),
        }
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "sandbox" => Ok(Environment::Sandbox),
            "production" | "prod" => Ok(Environment::Production),
            _ => Url::parse(s.trim())
                .map(Environment::Custom)
                .map_err(|_| ConfigError::InvalidEnvironment(s.to_string())),
        }
    }
}

/// Merchant credentials plus transport settings.
///
/// Custom `Debug` redacts the private key.
#[derive(Clone)]
pub struct Configuration {
    pub environment: Environment,
    pub merchant_id: String,
    pub public_key: String,
    pub private_key: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl fmt::Debug for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Configuration")
            .field("environment", &self.environment)
            .field("merchant_id", &self.merchant_id)
            .field("public_key", &self.public_key)
            .field("private_key", &"[REDACTED]")
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Configuration {
    pub fn new(
        environment: Environment,
        merchant_id: impl Into<String>,
        public_key: impl Into<String>,
        private_key: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let config = Self {
            environment,
            merchant_id: merchant_id.into(),
            public_key: public_key.into(),
            private_key: private_key.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        };
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `BRAINTREE_ENVIRONMENT` (default: `sandbox`; also accepts a URL)
    /// - `BRAINTREE_MERCHANT_ID` (required)
    /// - `BRAINTREE_PUBLIC_KEY` (required)
    /// - `BRAINTREE_PRIVATE_KEY` (required)
    /// - `BRAINTREE_TIMEOUT_SECS` (default: 60)
    pub fn from_env() -> Result<Self, ConfigError> {
        let environment = env::var("BRAINTREE_ENVIRONMENT")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(|s| s.parse())
            .transpose()?
            .unwrap_or(Environment::Sandbox);

        let merchant_id = required("BRAINTREE_MERCHANT_ID")?;
        let public_key = required("BRAINTREE_PUBLIC_KEY")?;
        let private_key = required("BRAINTREE_PRIVATE_KEY")?;

        let timeout_secs = env::var("BRAINTREE_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let config = Self {
            environment,
            merchant_id,
            public_key,
            private_key,
            timeout_secs,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Merchant-scoped path prefix every gateway resource lives under.
    pub fn base_merchant_path(&self) -> String {
        format!("/merchants/{}", urlencoding::encode(&self.merchant_id))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.merchant_id.trim().is_empty() {
            return Err(ConfigError::MissingRequired("merchant_id"));
        }
        if self.public_key.trim().is_empty() {
            return Err(ConfigError::MissingRequired("public_key"));
        }
        if self.private_key.trim().is_empty() {
            return Err(ConfigError::MissingRequired("private_key"));
        }
        Ok(())
    }
}

fn required(var: &'static str) -> Result<String, ConfigError> {
    env::var(var)
        .ok()
        .filter(|s| !s.trim().is_empty())
        .ok_or(ConfigError::MissingRequired(var))
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required configuration: {0}")]
    MissingRequired(&'static str),
    #[error("invalid environment: {0}")]
    InvalidEnvironment(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_named_environments() {
        assert_eq!("sandbox".parse::<Environment>().unwrap(), Environment::Sandbox);
        assert_eq!(
            "Production".parse::<Environment>().unwrap(),
            Environment::Production
        );
        assert_eq!(
            "development".parse::<Environment>().unwrap(),
            Environment::Development
        );
    }

    #[test]
    fn parses_custom_url_environment() {
        let env: Environment = "http://127.0.0.1:9000/".parse().unwrap();
        assert_eq!(env.base_url(), "http://127.0.0.1:9000");
    }

    #[test]
    fn rejects_garbage_environment() {
        assert!("not an env".parse::<Environment>().is_err());
    }

    #[test]
    fn new_rejects_blank_credentials() {
        let err = Configuration::new(Environment::Sandbox, "  ", "pub", "priv").unwrap_err();
        assert!(matches!(err, ConfigError::MissingRequired("merchant_id")));
    }

    #[test]
    fn debug_redacts_private_key() {
        let cfg = Configuration::new(Environment::Sandbox, "merchant", "pub", "s3cr3t").unwrap();
        let out = format!("{cfg:?}");
        assert!(!out.contains("s3cr3t"));
        assert!(out.contains("[REDACTED]"));
    }

    #[test]
    fn base_merchant_path_includes_merchant_id() {
        let cfg = Configuration::new(Environment::Sandbox, "abc123", "pub", "priv").unwrap();
        assert_eq!(cfg.base_merchant_path(), "/merchants/abc123");
        assert_eq!(cfg.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }
}
