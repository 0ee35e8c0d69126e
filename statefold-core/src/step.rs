//! # Step
//!
//! The atomic unit of pipeline behavior.
//!
//! A step is a pure `(Event, State) -> State` transformation. Pipelines hold
//! an ordered list of steps and fold every incoming event through them: the
//! output of one step is the input of the next, so later steps observe what
//! earlier steps did within the same fold.
//!
//! # Configuration
//!
//! The signature is fixed at two inputs. A step that needs more (a history
//! bound, a label) captures it at construction time, either as fields of a
//! struct implementing [`Step`] or by closing over it:
//!
//! ```rust
//! use statefold_core::{Event, State, Step, step_fn};
//!
//! fn tag(tag: &'static str) -> impl Step {
//!     step_fn("tag", move |_event: &Event, mut state: State| {
//!         state.display_text.push_str(tag);
//!         state
//!     })
//! }
//!
//! let state = tag("a").apply(&Event::new(1.0), State::default()).unwrap();
//! assert_eq!(state.display_text, "a");
//! ```
//!
//! # Side effects
//!
//! Steps may perform side effects (the standard print step logs), but must
//! still return a state satisfying the same contract.

use crate::{error::BoxError, event::Event, state::State};

/// A pure transformation of pipeline state.
///
/// Returning `Err` (or panicking) aborts the fold for the current event;
/// the pipeline keeps the state it had before the event arrived.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a `Step`",
    label = "missing `Step` implementation",
    note = "Steps implement `apply(&self, &Event, State) -> Result<State, BoxError>`, or wrap a closure with `step_fn`."
)]
pub trait Step: Send + Sync + 'static {
    /// Produce the next state from an event and the current state.
    fn apply(&self, event: &Event, state: State) -> Result<State, BoxError>;

    /// Name used in diagnostics.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Boxes the step.
    fn boxed(self) -> BoxStep
    where
        Self: Sized,
    {
        Box::new(self)
    }
}

/// Object-safe version of [`Step`].
///
/// Pipelines store their steps as [`BoxStep`]s so that a single sequence can
/// mix different step types.
pub trait DynStep: Send + Sync + 'static {
    /// Produce the next state (dynamic dispatch version).
    fn apply_dyn(&self, event: &Event, state: State) -> Result<State, BoxError>;

    /// Name used in diagnostics (dynamic dispatch version).
    fn name_dyn(&self) -> &str;
}

impl<T: Step> DynStep for T {
    fn apply_dyn(&self, event: &Event, state: State) -> Result<State, BoxError> {
        self.apply(event, state)
    }

    fn name_dyn(&self) -> &str {
        self.name()
    }
}

/// A type-erased step.
pub type BoxStep = Box<dyn DynStep>;

// Allow a `BoxStep` to be used wherever a `Step` is expected.
impl Step for BoxStep {
    fn apply(&self, event: &Event, state: State) -> Result<State, BoxError> {
        (**self).apply_dyn(event, state)
    }

    fn name(&self) -> &str {
        (**self).name_dyn()
    }

    fn boxed(self) -> BoxStep {
        self
    }
}

/// A step built from an infallible closure. See [`step_fn`].
pub struct FnStep<F> {
    name: String,
    f: F,
}

impl<F> Step for FnStep<F>
where
    F: Fn(&Event, State) -> State + Send + Sync + 'static,
{
    fn apply(&self, event: &Event, state: State) -> Result<State, BoxError> {
        Ok((self.f)(event, state))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// A step built from a fallible closure. See [`try_step_fn`].
pub struct TryFnStep<F> {
    name: String,
    f: F,
}

impl<F> Step for TryFnStep<F>
where
    F: Fn(&Event, State) -> Result<State, BoxError> + Send + Sync + 'static,
{
    fn apply(&self, event: &Event, state: State) -> Result<State, BoxError> {
        (self.f)(event, state)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Wraps an infallible closure as a named [`Step`].
pub fn step_fn<F>(name: impl Into<String>, f: F) -> FnStep<F>
where
    F: Fn(&Event, State) -> State + Send + Sync + 'static,
{
    FnStep {
        name: name.into(),
        f,
    }
}

/// Wraps a fallible closure as a named [`Step`].
pub fn try_step_fn<F>(name: impl Into<String>, f: F) -> TryFnStep<F>
where
    F: Fn(&Event, State) -> Result<State, BoxError> + Send + Sync + 'static,
{
    TryFnStep {
        name: name.into(),
        f,
    }
}
