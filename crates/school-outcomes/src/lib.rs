pub mod analysis;
pub mod charts;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod pipeline;
pub mod telemetry;
