//! Pipeline construction and lifecycle.

use super::worker::{Command, PipelineStats, Worker};
use crate::error::PipelineError;
use statefold_core::{BoxStep, Event, State, Step};
use std::sync::Arc;
use tokio::{
    sync::{mpsc, oneshot, watch},
    task::JoinHandle,
};

/// A cloneable handle for submitting events to a running pipeline.
///
/// Handles stay valid after the pipeline stops; every call then fails with
/// [`PipelineError::Closed`].
#[derive(Clone)]
pub struct PipelineHandle {
    name: Arc<str>,
    intake: mpsc::Sender<Command>,
}

impl PipelineHandle {
    /// The pipeline's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Hands `event` to the worker.
    ///
    /// Waits until the worker has taken the event, not until the fold has
    /// finished. A busy pipeline therefore holds its submitters back.
    pub async fn submit(&self, event: Event) -> Result<(), PipelineError> {
        let (accepted, on_accept) = oneshot::channel();
        self.send(Command::Event { event, accepted }).await?;
        on_accept.await.map_err(|_| self.closed())
    }

    /// The current state, after every event accepted so far has been folded.
    pub async fn snapshot(&self) -> Result<State, PipelineError> {
        let (reply, response) = oneshot::channel();
        self.send(Command::Snapshot(reply)).await?;
        response.await.map_err(|_| self.closed())
    }

    /// The worker's counters, after every event accepted so far has been
    /// folded.
    pub async fn stats(&self) -> Result<PipelineStats, PipelineError> {
        let (reply, response) = oneshot::channel();
        self.send(Command::Stats(reply)).await?;
        response.await.map_err(|_| self.closed())
    }

    /// Whether the worker has gone away.
    pub fn is_closed(&self) -> bool {
        self.intake.is_closed()
    }

    async fn send(&self, command: Command) -> Result<(), PipelineError> {
        self.intake.send(command).await.map_err(|_| self.closed())
    }

    fn closed(&self) -> PipelineError {
        PipelineError::Closed(self.name.to_string())
    }
}

impl std::fmt::Debug for PipelineHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineHandle")
            .field("name", &self.name)
            .field("closed", &self.is_closed())
            .finish()
    }
}

/// A named pipeline: one worker task folding events over a fixed step list.
///
/// The worker is the only reader and writer of the pipeline's [`State`].
/// Events are folded one at a time in the order they were accepted.
///
/// Dropping a `Pipeline` stops its worker at the next fold boundary; use
/// [`Pipeline::drain`] to finish queued work first.
///
/// # Example
///
/// ```rust,no_run
/// use statefold::orchestrator::Pipeline;
/// use statefold::{AverageStep, Event, HistoryStep, PrintStep};
///
/// # async fn demo() -> Result<(), statefold::PipelineError> {
/// let pipeline = Pipeline::builder("demo1")
///     .step(HistoryStep::new(2))
///     .step(AverageStep)
///     .step(PrintStep::new())
///     .start();
///
/// pipeline.submit(Event::new(1.0)).await?;
/// pipeline.submit(Event::new(2.0)).await?;
/// assert_eq!(pipeline.snapshot().await?.display_text, "1.50");
///
/// let final_state = pipeline.drain().await?;
/// # Ok(())
/// # }
/// ```
pub struct Pipeline {
    handle: PipelineHandle,
    shutdown: watch::Sender<bool>,
    worker: JoinHandle<State>,
}

impl Pipeline {
    /// Starts a pipeline with an empty state.
    ///
    /// Spawns the worker on the current Tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime.
    pub fn start(name: impl Into<String>, steps: Vec<BoxStep>) -> Self {
        let name: Arc<str> = Arc::from(name.into());
        // One slot plus the acceptance signal makes `submit` a rendezvous.
        let (intake, commands) = mpsc::channel(1);
        let (shutdown, stop_signal) = watch::channel(false);

        let worker = Worker::new(name.clone(), steps);
        let worker = tokio::spawn(worker.run(commands, stop_signal));

        Self {
            handle: PipelineHandle { name, intake },
            shutdown,
            worker,
        }
    }

    /// Builder form of [`Pipeline::start`].
    pub fn builder(name: impl Into<String>) -> PipelineBuilder {
        PipelineBuilder::new(name)
    }

    /// The pipeline's name.
    pub fn name(&self) -> &str {
        self.handle.name()
    }

    /// A handle that can be cloned and moved to other tasks.
    pub fn handle(&self) -> PipelineHandle {
        self.handle.clone()
    }

    /// See [`PipelineHandle::submit`].
    pub async fn submit(&self, event: Event) -> Result<(), PipelineError> {
        self.handle.submit(event).await
    }

    /// See [`PipelineHandle::snapshot`].
    pub async fn snapshot(&self) -> Result<State, PipelineError> {
        self.handle.snapshot().await
    }

    /// See [`PipelineHandle::stats`].
    pub async fn stats(&self) -> Result<PipelineStats, PipelineError> {
        self.handle.stats().await
    }

    /// Stops the worker once the fold in progress (if any) completes and
    /// returns the final state. Commands still queued are discarded.
    pub async fn stop(self) -> Result<State, PipelineError> {
        let Pipeline {
            handle,
            shutdown,
            worker,
        } = self;
        // An error only means the worker already exited.
        let _ = shutdown.send(true);
        join(&handle, worker).await
    }

    /// Lets every command queued so far finish, then stops the worker and
    /// returns the final state.
    pub async fn drain(self) -> Result<State, PipelineError> {
        let Pipeline {
            handle,
            shutdown,
            worker,
        } = self;
        // A failed send means the worker is already gone; join reports why.
        let _ = handle.intake.send(Command::Drain).await;
        let state = join(&handle, worker).await;
        drop(shutdown);
        state
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("name", &self.name())
            .field("running", &!self.worker.is_finished())
            .finish()
    }
}

async fn join(handle: &PipelineHandle, worker: JoinHandle<State>) -> Result<State, PipelineError> {
    worker
        .await
        .map_err(|_| PipelineError::WorkerPanicked(handle.name().to_string()))
}

/// Builder for a [`Pipeline`]'s step list.
pub struct PipelineBuilder {
    name: String,
    steps: Vec<BoxStep>,
}

impl PipelineBuilder {
    /// Create a builder with no steps.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            steps: Vec::new(),
        }
    }

    /// Append a step; steps run in the order they are added.
    pub fn step<S: Step>(mut self, step: S) -> Self {
        self.steps.push(step.boxed());
        self
    }

    /// Append several already boxed steps.
    pub fn steps(mut self, steps: impl IntoIterator<Item = BoxStep>) -> Self {
        self.steps.extend(steps);
        self
    }

    /// Start the pipeline. See [`Pipeline::start`].
    pub fn start(self) -> Pipeline {
        Pipeline::start(self.name, self.steps)
    }
}
