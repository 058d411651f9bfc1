//! Service constants - single source of truth for numeric limits and defaults.

/// Operand validation
pub mod bounds {
    /// Exclusive magnitude limit for every operand. Inputs must satisfy
    /// `-OPERAND_LIMIT < x < OPERAND_LIMIT`.
    pub const OPERAND_LIMIT: f64 = 1_000_000.0;
}

/// Token issuance
pub mod token {
    /// Default token lifetime in seconds (30 minutes)
    pub const DEFAULT_TTL_SECS: u64 = 1800;
    /// Token type reported to clients in the login response
    pub const TOKEN_TYPE: &str = "bearer";
}

/// Credential defaults (single fixed pair, overridable via environment)
pub mod credentials {
    /// Default username
    pub const DEFAULT_USERNAME: &str = "user";
    /// Default password
    pub const DEFAULT_PASSWORD: &str = "pass";
}
