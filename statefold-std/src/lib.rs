//! # statefold-std
//!
//! Standard steps for the statefold event pipeline.
//!
//! This crate provides:
//! - **History**: [`HistoryStep`] and the [`accumulate_history`] factory
//! - **Averaging**: [`AverageStep`]
//! - **Observation**: [`PrintStep`]
//! - **Test doubles**: the [`testing`] module

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export core types
pub use statefold_core;

pub mod steps;
pub mod testing;

pub use steps::{AverageStep, HistoryStep, PrintStep, accumulate_history};
