// Domain error types - secure error handling with no information disclosure

use thiserror::Error;

/// Main error type for the calculator service
#[derive(Error, Debug)]
pub enum AbacusError {
    /// Credential pair did not match (HTTP 401)
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Bearer token is missing, malformed, badly signed, or expired (HTTP 401)
    #[error("Invalid or expired token")]
    InvalidToken,

    /// Request failed operand validation (HTTP 422)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Division by zero (HTTP 400)
    #[error("Division by zero")]
    DivisionByZero,

    /// Square root of a negative number (HTTP 400)
    #[error("Negative radicand")]
    NegativeRadicand,

    /// Computation produced a non-finite or otherwise unusable result (HTTP 500)
    #[error("Computation error: {0}")]
    Computation(String),

    /// Token signing failed (HTTP 500)
    #[error("Token signing error: {0}")]
    Signing(String),

    /// History store error (HTTP 500)
    #[error("State error: {0}")]
    State(String),

    /// Configuration error (HTTP 500)
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl AbacusError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            AbacusError::InvalidCredentials => 401,
            AbacusError::InvalidToken => 401,
            AbacusError::Validation(_) => 422,
            AbacusError::DivisionByZero => 400,
            AbacusError::NegativeRadicand => 400,
            AbacusError::Computation(_) => 500,
            AbacusError::Signing(_) => 500,
            AbacusError::State(_) => 500,
            AbacusError::Configuration(_) => 500,
        }
    }

    /// Get user-facing error message (no sensitive information)
    pub fn user_message(&self) -> String {
        match self {
            AbacusError::InvalidCredentials => "Incorrect username or password".to_string(),
            AbacusError::InvalidToken => "Invalid or expired token".to_string(),
            AbacusError::Validation(reason) => reason.clone(),
            AbacusError::DivisionByZero => "Division by zero is not allowed".to_string(),
            AbacusError::NegativeRadicand => {
                "Cannot take the square root of a negative number".to_string()
            }
            AbacusError::Computation(_) => "Internal error".to_string(),
            AbacusError::Signing(_) => "Internal error".to_string(),
            AbacusError::State(_) => "Internal error".to_string(),
            AbacusError::Configuration(_) => "Internal error".to_string(),
        }
    }
}
