//! Standard step implementations.

mod average;
mod history;
mod print;

pub use average::AverageStep;
pub use history::{HistoryStep, accumulate_history};
pub use print::PrintStep;
