// Authentication & authorization module

pub mod credentials;
pub mod token;
pub mod auth_middleware;
pub mod audit_logger;
