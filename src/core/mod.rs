// Core domain types, constants, and errors

pub mod constants;
pub mod errors;
pub mod models;
