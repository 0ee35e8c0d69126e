//! Testing utilities for statefold.
//!
//! Steps that make pipeline behavior observable from a test.
//!
//! # Features
//!
//! - [`RecordingStep`]: records every event it sees
//! - [`TagStep`]: appends a tag to an auxiliary trace, exposing fold order
//! - [`FailingStep`]: returns an error on chosen values
//! - [`PanickingStep`]: panics on chosen values
//! - [`GateStep`]: blocks the fold until the test opens the gate

use statefold_core::{BoxError, Event, State, Step};
use std::sync::{Arc, Condvar, Mutex};
use thiserror::Error;

/// Auxiliary-data key written by [`TagStep`].
pub const TRACE_KEY: &str = "trace";

// ============================================================================
// Recording Step
// ============================================================================

/// A step that records all events it receives and passes state through.
///
/// Clones share the same record, so keep one clone in the test and move the
/// other into the pipeline.
///
/// # Example
///
/// ```rust,ignore
/// let recorder = RecordingStep::new();
/// let pipeline = Pipeline::start("p", vec![recorder.clone().boxed()]);
///
/// pipeline.submit(Event::new(1.0)).await?;
/// pipeline.snapshot().await?;
/// assert_eq!(recorder.values(), vec![1.0]);
/// ```
#[derive(Clone, Default)]
pub struct RecordingStep {
    events: Arc<Mutex<Vec<Event>>>,
}

impl RecordingStep {
    /// Create a new recording step.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a clone of the recorded events.
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    /// The recorded events' values, in arrival order.
    pub fn values(&self) -> Vec<f64> {
        self.events.lock().unwrap().iter().map(|e| e.value).collect()
    }

    /// Get the number of recorded events.
    pub fn count(&self) -> usize {
        self.events.lock().unwrap().len()
    }

    /// Clear all recorded events.
    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }
}

impl Step for RecordingStep {
    fn apply(&self, event: &Event, state: State) -> Result<State, BoxError> {
        self.events.lock().unwrap().push(event.clone());
        Ok(state)
    }

    fn name(&self) -> &str {
        "recording"
    }
}

// ============================================================================
// Tag Step
// ============================================================================

/// A step that appends its tag to `auxiliary_data["trace"]`.
///
/// Running `[TagStep::new("a"), TagStep::new("b")]` over an empty state leaves
/// `"a,b"` in the trace.
#[derive(Debug, Clone)]
pub struct TagStep {
    tag: String,
}

impl TagStep {
    /// Create a tag step.
    pub fn new(tag: impl Into<String>) -> Self {
        Self { tag: tag.into() }
    }

    /// Read the trace left behind by tag steps.
    pub fn trace(state: &State) -> Option<&str> {
        state.auxiliary_data.get(TRACE_KEY).map(String::as_str)
    }
}

impl Step for TagStep {
    fn apply(&self, _event: &Event, mut state: State) -> Result<State, BoxError> {
        let trace = state.auxiliary_data.entry(TRACE_KEY.to_string()).or_default();
        if !trace.is_empty() {
            trace.push(',');
        }
        trace.push_str(&self.tag);
        Ok(state)
    }

    fn name(&self) -> &str {
        &self.tag
    }
}

// ============================================================================
// Fault injection
// ============================================================================

/// Error returned by [`FailingStep`].
#[derive(Error, Debug, Clone, PartialEq)]
#[error("injected fault on value {0}")]
pub struct InjectedFault(pub f64);

/// A step that fails on events whose value equals the trigger and passes
/// state through otherwise.
#[derive(Debug, Clone, Copy)]
pub struct FailingStep {
    trigger: f64,
}

impl FailingStep {
    /// Fail whenever an event's value equals `trigger`.
    pub fn on(trigger: f64) -> Self {
        Self { trigger }
    }
}

impl Step for FailingStep {
    fn apply(&self, event: &Event, state: State) -> Result<State, BoxError> {
        if event.value == self.trigger {
            return Err(Box::new(InjectedFault(event.value)));
        }
        Ok(state)
    }

    fn name(&self) -> &str {
        "failing"
    }
}

/// A step that panics on events whose value equals the trigger.
#[derive(Debug, Clone, Copy)]
pub struct PanickingStep {
    trigger: f64,
}

impl PanickingStep {
    /// Panic whenever an event's value equals `trigger`.
    pub fn on(trigger: f64) -> Self {
        Self { trigger }
    }
}

impl Step for PanickingStep {
    fn apply(&self, event: &Event, state: State) -> Result<State, BoxError> {
        if event.value == self.trigger {
            panic!("panicking step triggered by {}", event.value);
        }
        Ok(state)
    }

    fn name(&self) -> &str {
        "panicking"
    }
}

// ============================================================================
// Gate Step
// ============================================================================

/// A step that blocks its fold until [`GateStep::open`] is called.
///
/// The wait is a blocking one, so tests using it need a multi-threaded
/// runtime.
#[derive(Clone, Default)]
pub struct GateStep {
    gate: Arc<(Mutex<bool>, Condvar)>,
}

impl GateStep {
    /// Create a closed gate.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the gate, releasing every blocked and future fold.
    pub fn open(&self) {
        let (lock, cvar) = &*self.gate;
        *lock.lock().unwrap() = true;
        cvar.notify_all();
    }
}

impl Step for GateStep {
    fn apply(&self, _event: &Event, state: State) -> Result<State, BoxError> {
        let (lock, cvar) = &*self.gate;
        let mut open = lock.lock().unwrap();
        while !*open {
            open = cvar.wait(open).unwrap();
        }
        Ok(state)
    }

    fn name(&self) -> &str {
        "gate"
    }
}
