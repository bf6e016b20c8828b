//! Supplier Performance Engine
//!
//! Synthetic purchase-order generation with embedded business-causality
//! rules, leakage-free feature engineering, dual lead-time/lateness
//! prediction, OTIF aggregation, and risk recommendations.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod analytics;
pub mod config;
pub mod errors;
pub mod features;
pub mod ml;
pub mod models;
pub mod pipeline;
pub mod synth;

pub use config::PipelineConfig;
pub use errors::ServiceError;
pub use pipeline::{Prediction, TrainedPipeline};
