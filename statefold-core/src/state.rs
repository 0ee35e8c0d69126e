//! The snapshot threaded through a pipeline's steps.

use crate::event::Event;
use std::{
    collections::{BTreeMap, HashMap, VecDeque},
    fmt,
};

/// The current state of a pipeline.
///
/// Steps receive a `State` by value and return the next one, so no step can
/// keep an alias into a state it has already handed on. A pipeline starts
/// from `State::default()`: empty text, empty history, empty auxiliary data.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct State {
    /// Human-readable summary derived from the history, recomputed per fold.
    pub display_text: String,
    /// Recent events, oldest first.
    pub history: VecDeque<Event>,
    /// Scratch space for steps that need a side channel.
    pub auxiliary_data: HashMap<String, String>,
}

impl State {
    /// The `value` of every event in the history, oldest first.
    pub fn history_values(&self) -> Vec<f64> {
        self.history.iter().map(|event| event.value).collect()
    }
}

/// Renders the whole state on one line, history annotations included. Map
/// keys are sorted so the output is stable across runs.
impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "display_text={:?} history=[", self.display_text)?;
        for (i, event) in self.history.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{event}")?;
        }
        let aux: BTreeMap<_, _> = self.auxiliary_data.iter().collect();
        write!(f, "] auxiliary_data={aux:?}")
    }
}
