//! Explainable priority ranking of candidates competing for a scarce resource.
//!
//! A [`dataset::DatasetLoader`] supplies a table, and [`ranking::AllocationPipeline`]
//! normalizes, scores, ranks and explains it.

pub mod config;
pub mod dataset;
pub mod error;
pub mod ranking;
pub mod telemetry;
