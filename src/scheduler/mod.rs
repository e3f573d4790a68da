//! Custom scheduler loop: watch, filter, score, bind

pub mod core;
pub mod postbind;
pub mod scoring;

pub use core::Scheduler;
pub use scoring::CycleState;
