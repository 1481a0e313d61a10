pub mod clock;
pub mod csv_source;
pub mod meter;
pub mod observability;
pub mod simulation;
