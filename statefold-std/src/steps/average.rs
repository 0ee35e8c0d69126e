//! Running average over the stored history.

use statefold_core::{BoxError, Event, State, Step};

/// Writes the mean of the history's values into [`State::display_text`],
/// formatted with two fractional digits. An empty history averages to `0.00`.
///
/// The step reads whatever history it is given, so it must come after a
/// [`HistoryStep`](crate::HistoryStep) for the current event to be included.
#[derive(Debug, Clone, Copy, Default)]
pub struct AverageStep;

impl AverageStep {
    /// Mean of the history's values, `0.0` when empty.
    pub fn mean(state: &State) -> f64 {
        if state.history.is_empty() {
            return 0.0;
        }
        let sum: f64 = state.history.iter().map(|event| event.value).sum();
        sum / state.history.len() as f64
    }
}

impl Step for AverageStep {
    fn apply(&self, _event: &Event, mut state: State) -> Result<State, BoxError> {
        state.display_text = format!("{:.2}", Self::mean(&state));
        Ok(state)
    }

    fn name(&self) -> &str {
        "average"
    }
}
