//! The unit of work entering a pipeline.

use std::{
    collections::{BTreeMap, HashMap},
    fmt,
};

/// A numeric measurement with free-form annotations.
///
/// Events are built once by the producer and never modified afterwards.
/// Steps see them through a shared reference; to keep one around, clone it
/// into [`State::history`](crate::State::history).
///
/// # Example
///
/// ```rust
/// use statefold_core::Event;
///
/// let event = Event::new(3.5).with_annotation("val", "3.5");
/// assert_eq!(event.value, 3.5);
/// assert_eq!(event.annotation("val"), Some("3.5"));
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Event {
    /// The measurement.
    pub value: f64,
    /// Producer-supplied metadata, such as the raw source text.
    pub annotations: HashMap<String, String>,
}

impl Event {
    /// Create an event with no annotations.
    pub fn new(value: f64) -> Self {
        Self {
            value,
            annotations: HashMap::new(),
        }
    }

    /// Attach an annotation, replacing any previous value for `key`.
    pub fn with_annotation(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.annotations.insert(key.into(), value.into());
        self
    }

    /// Look up an annotation.
    pub fn annotation(&self, key: &str) -> Option<&str> {
        self.annotations.get(key).map(String::as_str)
    }
}

impl From<f64> for Event {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

/// `3.5`, or `3.5 {"val": "3.5"}` with annotations in sorted key order.
impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.value)?;
        if !self.annotations.is_empty() {
            let annotations: BTreeMap<_, _> = self.annotations.iter().collect();
            write!(f, " {annotations:?}")?;
        }
        Ok(())
    }
}
