//! Error types for statefold steps.
//!
//! - [`BoxError`] - The error a fallible step returns
//! - [`StepFault`] - A step that failed or panicked in the middle of a fold

use thiserror::Error;

/// A boxed error type for dynamic error handling.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A fault raised by one step while folding an event.
///
/// The fold that raised it is abandoned: the pipeline keeps the state it had
/// before the event arrived.
#[derive(Error, Debug)]
pub enum StepFault {
    /// The step returned an error.
    #[error("step `{step}` failed")]
    Failed {
        /// Name of the faulting step.
        step: String,
        /// The error returned by the step.
        #[source]
        source: BoxError,
    },

    /// The step panicked.
    #[error("step `{step}` panicked: {message}")]
    Panicked {
        /// Name of the faulting step.
        step: String,
        /// The panic payload, if it was a string.
        message: String,
    },
}

impl StepFault {
    /// Name of the step that raised the fault.
    pub fn step(&self) -> &str {
        match self {
            StepFault::Failed { step, .. } | StepFault::Panicked { step, .. } => step,
        }
    }

    /// Builds a [`StepFault::Panicked`] from a `catch_unwind` payload.
    pub fn from_panic(step: impl Into<String>, payload: Box<dyn std::any::Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&'static str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "non-string panic payload".to_string()
        };
        StepFault::Panicked {
            step: step.into(),
            message,
        }
    }
}
