// Energy readings, insights and recommendations
pub mod energy;

// Feature engineering
pub mod ml;

// Port interfaces for external collaborators
pub mod ports;

// Domain-specific error types
pub mod errors;
