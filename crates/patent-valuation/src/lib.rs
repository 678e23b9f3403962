//! Patent valuation engine: financial calculators, heuristic strength scoring,
//! and the portfolio vault that ties them to stored patent records.

pub mod config;
pub mod error;
pub mod form;
pub mod portfolio;
pub mod scoring;
pub mod telemetry;
pub mod valuation;

pub use error::AppError;
