// Library root for Abacus

pub mod core;
pub mod state;
pub mod engine;
pub mod auth;
pub mod api;
pub mod config;
