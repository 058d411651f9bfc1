// Configuration management

use crate::core::constants::{credentials, token};
use crate::core::errors::AbacusError;
use secrecy::Secret;
use std::env;

/// Application configuration loaded from environment variables
///
/// All configuration is validated on load with clear error messages.
/// Secret material is wrapped so it cannot leak through Debug output.
#[derive(Debug, Clone)]
pub struct Config {
    // Server configuration
    pub bind_address: String,
    pub port: u16,

    // Token configuration
    pub token_secret: Secret<String>,
    pub token_ttl_secs: u64,

    // Credential configuration (single fixed pair)
    pub auth_username: String,
    pub auth_password: Secret<String>,

    // Middleware configuration
    pub request_timeout_secs: u64,
    pub body_size_limit_bytes: usize,

    // Logging configuration
    pub log_level: String,
    pub log_format: String, // "json" or "text"
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Supports `.env` file loading in development (via dotenv crate).
    /// `TOKEN_SECRET` is required; everything else has a default.
    pub fn from_env() -> Result<Self, AbacusError> {
        // Load .env file if present (development)
        // Skip in test environment to avoid interfering with test environment variables
        #[cfg(not(test))]
        {
            dotenv::dotenv().ok(); // Ignore errors (file may not exist)
        }

        let config = Self {
            bind_address: Self::get_env_or_default("BIND_ADDRESS", "0.0.0.0")?,
            port: Self::parse_port()?,
            token_secret: Secret::new(Self::get_required_env("TOKEN_SECRET")?),
            token_ttl_secs: Self::parse_u64_or_default(
                "TOKEN_TTL_SECS",
                token::DEFAULT_TTL_SECS,
            )?,
            auth_username: Self::get_env_or_default(
                "AUTH_USERNAME",
                credentials::DEFAULT_USERNAME,
            )?,
            auth_password: Secret::new(Self::get_env_or_default(
                "AUTH_PASSWORD",
                credentials::DEFAULT_PASSWORD,
            )?),
            request_timeout_secs: Self::parse_u64_or_default("REQUEST_TIMEOUT_SECS", 30)?,
            body_size_limit_bytes: Self::parse_usize_or_default(
                "BODY_SIZE_LIMIT_BYTES",
                2 * 1024 * 1024,
            )?,
            log_level: Self::get_env_or_default("LOG_LEVEL", "info")?,
            log_format: Self::get_env_or_default("LOG_FORMAT", "json")?,
        };

        // Post-load validation
        config.validate()?;

        Ok(config)
    }

    /// Get environment variable or return default value
    fn get_env_or_default(key: &str, default: &str) -> Result<String, AbacusError> {
        Ok(env::var(key).unwrap_or_else(|_| default.to_string()))
    }

    /// Get required environment variable, rejecting empty values
    fn get_required_env(key: &str) -> Result<String, AbacusError> {
        let value = env::var(key)
            .map_err(|_| AbacusError::Configuration(format!("{} not set", key)))?;

        if value.is_empty() {
            return Err(AbacusError::Configuration(format!("{} is empty", key)));
        }

        Ok(value)
    }

    /// Parse port from PORT environment variable
    fn parse_port() -> Result<u16, AbacusError> {
        let port_str = env::var("PORT").unwrap_or_else(|_| "8000".to_string());
        let port = port_str.parse::<u16>().map_err(|e| {
            AbacusError::Configuration(format!("Invalid PORT value '{}': {}", port_str, e))
        })?;

        if port == 0 {
            return Err(AbacusError::Configuration(
                "PORT must be between 1 and 65535".to_string(),
            ));
        }

        Ok(port)
    }

    /// Parse u64 from environment variable or return default
    fn parse_u64_or_default(key: &str, default: u64) -> Result<u64, AbacusError> {
        match env::var(key) {
            Ok(value) => {
                let parsed = value.parse::<u64>().map_err(|e| {
                    AbacusError::Configuration(format!(
                        "Invalid {} value '{}': {}",
                        key, value, e
                    ))
                })?;

                if parsed == 0 {
                    return Err(AbacusError::Configuration(format!(
                        "{} must be greater than 0",
                        key
                    )));
                }

                Ok(parsed)
            }
            _ => Ok(default),
        }
    }

    /// Parse usize from environment variable or return default
    fn parse_usize_or_default(key: &str, default: usize) -> Result<usize, AbacusError> {
        match env::var(key) {
            Ok(value) => {
                let parsed = value.parse::<usize>().map_err(|e| {
                    AbacusError::Configuration(format!(
                        "Invalid {} value '{}': {}",
                        key, value, e
                    ))
                })?;

                if parsed == 0 {
                    return Err(AbacusError::Configuration(format!(
                        "{} must be greater than 0",
                        key
                    )));
                }

                Ok(parsed)
            }
            _ => Ok(default),
        }
    }

    /// Validate all configuration values
    fn validate(&self) -> Result<(), AbacusError> {
        if self.port == 0 {
            return Err(AbacusError::Configuration(format!(
                "Invalid PORT value '{}': must be between 1 and 65535",
                self.port
            )));
        }

        if self.auth_username.is_empty() {
            return Err(AbacusError::Configuration(
                "AUTH_USERNAME must not be empty".to_string(),
            ));
        }

        Self::validate_log_level(&self.log_level)?;
        Self::validate_log_format(&self.log_format)?;

        Ok(())
    }

    /// Validate log level
    fn validate_log_level(level: &str) -> Result<(), AbacusError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&level.to_lowercase().as_str()) {
            return Err(AbacusError::Configuration(format!(
                "Invalid LOG_LEVEL '{}': must be one of {}",
                level,
                valid_levels.join(", ")
            )));
        }
        Ok(())
    }

    /// Validate log format
    fn validate_log_format(format: &str) -> Result<(), AbacusError> {
        if format != "json" && format != "text" {
            return Err(AbacusError::Configuration(format!(
                "Invalid LOG_FORMAT '{}': must be 'json' or 'text'",
                format
            )));
        }
        Ok(())
    }
}

impl Config {
    /// Create a test configuration for unit tests
    ///
    /// This bypasses environment variable loading for use in tests that
    /// don't need real configuration.
    pub fn test_config() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 8000,
            token_secret: Secret::new("test-signing-secret-0123456789".to_string()),
            token_ttl_secs: 1800,
            auth_username: "user".to_string(),
            auth_password: Secret::new("pass".to_string()),
            request_timeout_secs: 30,
            body_size_limit_bytes: 2 * 1024 * 1024,
            log_level: "info".to_string(),
            log_format: "json".to_string(),
        }
    }
}
