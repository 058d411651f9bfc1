// Security event logging

use tracing::{info, warn};

/// Authentication event type
#[derive(Debug, Clone)]
pub enum AuthEvent {
    LoginSuccess { username: String },
    LoginFailure { username: String },
    TokenAccepted { subject: String },
    TokenRejected { reason: String },
}

/// Audit logger for security events
///
/// Emits structured log entries only; there is no persistent sink, so
/// audit history lives as long as the log stream does.
pub struct AuditLogger;

impl AuditLogger {
    /// Create a new audit logger
    pub fn new() -> Self {
        Self
    }

    /// Log an authentication event
    ///
    /// Never fails and never blocks the request flow.
    pub fn log_auth_event(
        &self,
        event: AuthEvent,
        ip_address: Option<&str>,
        user_agent: Option<&str>,
    ) {
        match event {
            AuthEvent::LoginSuccess { ref username } => {
                info!(
                    username = %username,
                    ip_address = ?ip_address,
                    user_agent = ?user_agent,
                    "Login successful"
                );
            }
            AuthEvent::LoginFailure { ref username } => {
                warn!(
                    username = %username,
                    ip_address = ?ip_address,
                    user_agent = ?user_agent,
                    "Login failed"
                );
            }
            AuthEvent::TokenAccepted { ref subject } => {
                info!(
                    subject = %subject,
                    ip_address = ?ip_address,
                    user_agent = ?user_agent,
                    "Token accepted"
                );
            }
            AuthEvent::TokenRejected { ref reason } => {
                warn!(
                    reason = %reason,
                    ip_address = ?ip_address,
                    user_agent = ?user_agent,
                    "Token rejected"
                );
            }
        }
    }
}

impl Default for AuditLogger {
    fn default() -> Self {
        Self::new()
    }
}
