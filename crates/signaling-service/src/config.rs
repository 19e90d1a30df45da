//! Signaling service configuration.
//!
//! Configuration is loaded from environment variables. The JWT secret is
//! redacted in Debug output.

use std::collections::HashMap;
use std::env;
use std::fmt;
use thiserror::Error;

/// Default HTTP bind address.
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";

/// Default JWT clock skew tolerance in seconds.
pub const DEFAULT_JWT_LEEWAY_SECONDS: u64 = 60;

/// Signaling service configuration.
///
/// Loaded from environment variables with sensible defaults. The JWT
/// secret is required and redacted in Debug output to prevent credential
/// leakage.
#[derive(Clone)]
pub struct Config {
    /// Server bind address (default: "0.0.0.0:8080").
    pub bind_address: String,

    /// Shared secret for validating caller JWTs (HS256).
    pub jwt_secret: String,

    /// JWT clock skew tolerance in seconds for token validation.
    pub jwt_leeway_seconds: u64,
}

/// Custom Debug implementation that redacts the JWT secret.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("bind_address", &self.bind_address)
            .field("jwt_secret", &"[REDACTED]")
            .field("jwt_leeway_seconds", &self.jwt_leeway_seconds)
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid JWT leeway configuration: {0}")]
    InvalidJwtLeeway(String),
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a HashMap (for testing).
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let bind_address = vars
            .get("BIND_ADDRESS")
            .cloned()
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());

        let jwt_secret = vars
            .get("SIGNALING_JWT_SECRET")
            .ok_or_else(|| ConfigError::MissingEnvVar("SIGNALING_JWT_SECRET".to_string()))?
            .clone();

        let jwt_leeway_seconds = if let Some(value_str) = vars.get("SIGNALING_JWT_LEEWAY_SECONDS") {
            value_str.parse().map_err(|e| {
                ConfigError::InvalidJwtLeeway(format!(
                    "SIGNALING_JWT_LEEWAY_SECONDS must be a non-negative integer, got '{}': {}",
                    value_str, e
                ))
            })?
        } else {
            DEFAULT_JWT_LEEWAY_SECONDS
        };

        Ok(Self {
            bind_address,
            jwt_secret,
            jwt_leeway_seconds,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn required_vars() -> HashMap<String, String> {
        HashMap::from([(
            "SIGNALING_JWT_SECRET".to_string(),
            "test-secret".to_string(),
        )])
    }

    #[test]
    fn test_defaults_applied() {
        let config = Config::from_vars(&required_vars()).unwrap();
        assert_eq!(config.bind_address, DEFAULT_BIND_ADDRESS);
        assert_eq!(config.jwt_leeway_seconds, DEFAULT_JWT_LEEWAY_SECONDS);
    }

    #[test]
    fn test_missing_jwt_secret_is_an_error() {
        let result = Config::from_vars(&HashMap::new());
        assert!(matches!(result, Err(ConfigError::MissingEnvVar(_))));
    }

    #[test]
    fn test_explicit_values_override_defaults() {
        let mut vars = required_vars();
        vars.insert("BIND_ADDRESS".to_string(), "127.0.0.1:9090".to_string());
        vars.insert("SIGNALING_JWT_LEEWAY_SECONDS".to_string(), "5".to_string());

        let config = Config::from_vars(&vars).unwrap();
        assert_eq!(config.bind_address, "127.0.0.1:9090");
        assert_eq!(config.jwt_leeway_seconds, 5);
    }

    #[test]
    fn test_invalid_leeway_is_an_error() {
        let mut vars = required_vars();
        vars.insert(
            "SIGNALING_JWT_LEEWAY_SECONDS".to_string(),
            "soon".to_string(),
        );
        assert!(matches!(
            Config::from_vars(&vars),
            Err(ConfigError::InvalidJwtLeeway(_))
        ));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = Config::from_vars(&required_vars()).unwrap();
        let debug = format!("{:?}", config);
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("test-secret"));
    }
}
