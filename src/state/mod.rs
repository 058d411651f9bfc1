// Shared mutable state

pub mod history;
