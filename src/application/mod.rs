// Model training and prediction
pub mod ml;

// Real-time insights and recommendation rules
pub mod insights;

// Shared model state and the public train / predict / insight operations
pub mod optimizer;

// Dashboard payloads
pub mod status;

// System orchestrator
pub mod system;
