// Calculation engine

pub mod pipeline;
