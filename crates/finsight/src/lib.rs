//! Scoring engines for MSME financial health and insurance cover matching.
//!
//! The library hosts two domain pipelines plus the ambient pieces the HTTP
//! service builds on. Storage and catalog access sit behind traits so the
//! service binary can choose its own adapters.

pub mod config;
pub mod error;
pub mod scoring;
pub mod telemetry;

pub use error::AppError;
