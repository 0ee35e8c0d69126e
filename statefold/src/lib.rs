//! # statefold - Per-Channel Event Pipelines
//!
//! `statefold` folds numeric events through fixed sequences of pure steps.
//! Each named pipeline owns one [`State`] and one worker task; events routed
//! to it are folded one at a time, in arrival order, and the result replaces
//! the previous state.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use statefold::prelude::*;
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = Registry::builder()
//!     .register(
//!         Pipeline::builder("demo1")
//!             .step(accumulate_history(2))
//!             .step(AverageStep)
//!             .step(PrintStep::new())
//!             .start(),
//!     )?
//!     .build()?;
//!
//! for v in [1.0, 2.0, 3.0] {
//!     registry.route("demo1", Event::new(v)).await?;
//! }
//!
//! let states = registry.shutdown().await;
//! assert_eq!(states["demo1"].as_ref().unwrap().display_text, "2.50");
//! # Ok(())
//! # }
//! ```
//!
//! ## Layout
//!
//! - [`orchestrator`]: pipelines, their worker tasks and the [`Registry`]
//! - [`ingest`]: line parsing and the stdin ingestion loop
//! - [`config`]: TOML description of pipelines and the ingestion route
//!
//! Step faults (an error or a panic inside a step) are isolated per event:
//! the fold is abandoned, the fault is logged, and the pipeline keeps its
//! previous state and carries on with the next event.

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod ingest;
pub mod orchestrator;

pub use statefold_core::{
    BoxError, BoxStep, DynStep, Event, FnStep, State, Step, StepFault, TryFnStep, step_fn,
    try_step_fn,
};

pub use statefold_std::{AverageStep, HistoryStep, PrintStep, accumulate_history};

pub use config::{Config, PipelineConfig, StepConfig};
pub use error::{ConfigError, IngestError, LineError, PipelineError, RegistryError, RouteError};
pub use ingest::{IngestReport, Ingestor, parse_bytes, parse_line};
pub use orchestrator::{
    Pipeline, PipelineBuilder, PipelineHandle, PipelineStats, Registry, RegistryBuilder,
};

/// Testing utilities.
pub mod testing {
    #![allow(clippy::wildcard_imports)]
    pub use statefold_std::testing::*;
}

/// Prelude module - common imports for statefold.
///
/// # Usage
///
/// ```rust,ignore
/// use statefold::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        // Steps
        AverageStep,
        // Core types
        BoxStep,
        Event,
        HistoryStep,
        // Runtime
        Pipeline,
        PipelineHandle,
        PrintStep,
        Registry,
        State,
        Step,
        accumulate_history,
        step_fn,
    };
}
