//! Push-based observability for Rustenergy
//!
//! Status is pushed as structured JSON logs to stdout (for Loki, Fluentd, CloudWatch).
//! No HTTP server, no incoming requests.

pub mod reporter;

pub use reporter::StatusReporter;
