// Price data model
pub mod market;

// Cleaning and metric computation
pub mod analysis;

// Port interfaces
pub mod ports;

// Domain-specific error types
pub mod errors;
