//! Bounded event history.

use statefold_core::{BoxError, Event, State, Step, step_fn};

/// Appends each event to [`State::history`], evicting the oldest entries once
/// the history is longer than `max_depth`.
///
/// With `max_depth == 0` the history is always empty after the step runs.
///
/// # Example
///
/// ```rust
/// use statefold_core::{Event, State, Step};
/// use statefold_std::HistoryStep;
///
/// let step = HistoryStep::new(2);
/// let mut state = State::default();
/// for v in [1.0, 2.0, 3.0] {
///     state = step.apply(&Event::new(v), state).unwrap();
/// }
/// assert_eq!(state.history_values(), vec![2.0, 3.0]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryStep {
    max_depth: usize,
}

impl HistoryStep {
    /// Create a history step bounded to `max_depth` events.
    pub const fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }

    /// The configured bound.
    pub const fn max_depth(&self) -> usize {
        self.max_depth
    }
}

impl Step for HistoryStep {
    fn apply(&self, event: &Event, state: State) -> Result<State, BoxError> {
        Ok(push_bounded(self.max_depth, event, state))
    }

    fn name(&self) -> &str {
        "history"
    }
}

/// Builds a history step closed over `max_depth`.
///
/// Closure form of [`HistoryStep::new`], for call sites that assemble steps
/// from plain functions.
pub fn accumulate_history(max_depth: usize) -> impl Step {
    step_fn("history", move |event: &Event, state: State| {
        push_bounded(max_depth, event, state)
    })
}

fn push_bounded(max_depth: usize, event: &Event, mut state: State) -> State {
    state.history.push_back(event.clone());
    while state.history.len() > max_depth {
        state.history.pop_front();
    }
    state
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(step: &impl Step, values: &[f64]) -> State {
        values.iter().fold(State::default(), |state, v| {
            step.apply(&Event::new(*v), state).unwrap()
        })
    }

    #[test]
    fn test_bound_keeps_most_recent() {
        let state = run(&HistoryStep::new(3), &[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(state.history_values(), vec![3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_below_bound_keeps_everything() {
        let state = run(&HistoryStep::new(10), &[1.0, 2.0]);
        assert_eq!(state.history_values(), vec![1.0, 2.0]);
    }

    #[test]
    fn test_zero_depth_always_empty() {
        let state = run(&HistoryStep::new(0), &[1.0, 2.0, 3.0]);
        assert!(state.history.is_empty());
    }

    #[test]
    fn test_length_is_min_of_count_and_bound() {
        for k in 0..5 {
            for n in 0..8 {
                let values: Vec<f64> = (0..n).map(f64::from).collect();
                let state = run(&HistoryStep::new(k), &values);
                let expected: Vec<f64> = values[values.len().saturating_sub(k)..].to_vec();
                assert_eq!(state.history.len(), (n as usize).min(k));
                assert_eq!(state.history_values(), expected);
            }
        }
    }

    #[test]
    fn test_other_fields_untouched() {
        let mut state = State {
            display_text: "keep".into(),
            ..State::default()
        };
        state.auxiliary_data.insert("k".into(), "v".into());

        let next = HistoryStep::new(1).apply(&Event::new(9.0), state).unwrap();
        assert_eq!(next.display_text, "keep");
        assert_eq!(next.auxiliary_data.get("k").map(String::as_str), Some("v"));
    }

    #[test]
    fn test_history_copies_annotations() {
        let event = Event::new(1.0).with_annotation("val", "1.0");
        let state = HistoryStep::new(1).apply(&event, State::default()).unwrap();
        assert_eq!(state.history[0], event);
    }

    #[test]
    fn test_factory_matches_struct() {
        let values = [4.0, 8.0, 15.0, 16.0];
        let from_factory = run(&accumulate_history(2), &values);
        let from_struct = run(&HistoryStep::new(2), &values);
        assert_eq!(from_factory, from_struct);
        assert_eq!(accumulate_history(2).name(), "history");
    }
}
