//! Grid-Sched: an energy-grid-aware custom scheduler for Kubernetes
//!
//! This crate implements a custom scheduler that ranks candidate nodes by
//! joining external per-location energy telemetry (renewable output, battery
//! charge, load) against each node's `location` label, blended with a
//! suffix-matching preference derived from the pod's name.

pub mod error;
pub mod grid;
pub mod scheduler;

pub use crate::error::{Error, Result};
