//! Print step - observability for pipeline state.

use statefold_core::{BoxError, Event, State, Step};

/// A step that logs the current state and passes it through unchanged.
///
/// Uses `tracing` at `INFO` level; the event carries the state's one-line
/// rendering, its display text and history length, and the triggering value.
/// Install a subscriber to see it.
///
/// # Example
///
/// ```rust
/// use statefold_core::{Event, State, Step};
/// use statefold_std::PrintStep;
///
/// let state = State::default();
/// let out = PrintStep::labeled("demo1")
///     .apply(&Event::new(1.0), state.clone())
///     .unwrap();
/// assert_eq!(out, state);
/// ```
#[derive(Debug, Clone, Default)]
pub struct PrintStep {
    label: Option<String>,
}

impl PrintStep {
    /// Create an unlabeled print step.
    pub fn new() -> Self {
        Self { label: None }
    }

    /// Create a print step whose log lines carry `label`.
    pub fn labeled(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
        }
    }

    /// The configured label.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}

impl Step for PrintStep {
    fn apply(&self, event: &Event, state: State) -> Result<State, BoxError> {
        let history_len = state.history.len();
        match &self.label {
            Some(label) => tracing::info!(
                label = %label,
                value = event.value,
                display_text = %state.display_text,
                history_len,
                state = %state,
                "print"
            ),
            None => tracing::info!(
                value = event.value,
                display_text = %state.display_text,
                history_len,
                state = %state,
                "print"
            ),
        }
        Ok(state)
    }

    fn name(&self) -> &str {
        "print"
    }
}
