//! # statefold-core
//!
//! Core types for the statefold event pipeline.
//!
//! This crate has minimal dependencies and is meant to be imported by crates
//! that only define steps and do not need the pipeline runtime.
//!
//! # Model
//!
//! A pipeline folds every incoming [`Event`] through an ordered list of
//! [`Step`]s. Each step receives the event by reference and the current
//! [`State`] by value, and hands the next [`State`] to the step after it.
//!
//! ## Event
//!
//! A finite numeric measurement plus free-form string annotations. Events are
//! immutable once built; a step that wants to remember one copies it into
//! [`State::history`].
//!
//! ## State
//!
//! The snapshot threaded through the steps: a derived display string, a
//! bounded history of events and a scratch map for auxiliary data.
//!
//! ## Step
//!
//! A pure `(Event, State) -> State` transformation. Configuration is captured
//! when the step is constructed, either as fields of a struct implementing
//! [`Step`] or as a closure wrapped by [`step_fn`].
//!
//! # Error Types
//!
//! - [`BoxError`] - What a fallible step returns
//! - [`StepFault`] - A step that failed or panicked during a fold

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod error;
mod event;
mod state;
mod step;

// Re-exports
pub use error::{BoxError, StepFault};
pub use event::Event;
pub use state::State;
pub use step::{BoxStep, DynStep, FnStep, Step, TryFnStep, step_fn, try_step_fn};
