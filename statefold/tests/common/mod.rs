#![allow(dead_code)]

use statefold::{AverageStep, HistoryStep, Pipeline, PrintStep, State};

// ============================================================================
// Pipelines used across tests
// ============================================================================

/// `[history(max_depth), average, print]`, the shape of the default wiring.
pub fn averaging_pipeline(name: &str, max_depth: usize) -> Pipeline {
    Pipeline::builder(name)
        .step(HistoryStep::new(max_depth))
        .step(AverageStep)
        .step(PrintStep::labeled(name))
        .start()
}

// ============================================================================
// Assertions
// ============================================================================

pub fn history_values(state: &State) -> Vec<f64> {
    state.history_values()
}

/// Asserts that `values` never decrease.
pub fn assert_non_decreasing(values: &[f64]) {
    for pair in values.windows(2) {
        assert!(pair[0] <= pair[1], "out of order: {values:?}");
    }
}
