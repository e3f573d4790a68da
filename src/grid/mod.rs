//! Grid-aware node scoring
//!
//! This module joins external per-location energy telemetry to candidate
//! nodes and turns it into placement scores.

pub mod api;
pub mod scoring;
pub mod types;

pub use api::GridTelemetryApi;
pub use types::{GridSchedulerConfig, GridSnapshot, LocationRecord};
