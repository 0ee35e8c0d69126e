//! The per-pipeline worker task and the fold it runs.

use statefold_core::{BoxStep, Event, State, StepFault};
use std::{
    panic::{self, AssertUnwindSafe},
    sync::Arc,
};
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, error};

/// Counters kept by a pipeline's worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PipelineStats {
    /// Events whose fold completed and replaced the state.
    pub processed: u64,
    /// Events whose fold was abandoned because a step faulted.
    pub faulted: u64,
}

/// Folds `event` through `steps` in order, starting from `state`.
///
/// For steps `[a, b, c]` the result is `c(event, b(event, a(event, state)))`.
/// The first step to return an error or panic ends the fold; its fault is
/// returned and the partially folded state is discarded.
pub fn fold(steps: &[BoxStep], event: &Event, state: State) -> Result<State, StepFault> {
    steps.iter().try_fold(state, |state, step| {
        match panic::catch_unwind(AssertUnwindSafe(|| step.apply_dyn(event, state))) {
            Ok(Ok(next)) => Ok(next),
            Ok(Err(source)) => Err(StepFault::Failed {
                step: step.name_dyn().to_string(),
                source,
            }),
            Err(payload) => Err(StepFault::from_panic(step.name_dyn(), payload)),
        }
    })
}

/// What a [`PipelineHandle`](super::PipelineHandle) can ask of the worker.
///
/// All commands share one FIFO queue, so a snapshot or drain observes every
/// event accepted before it.
pub(crate) enum Command {
    Event {
        event: Event,
        accepted: oneshot::Sender<()>,
    },
    Snapshot(oneshot::Sender<State>),
    Stats(oneshot::Sender<PipelineStats>),
    Drain,
}

/// Sole owner of a pipeline's state.
pub(crate) struct Worker {
    name: Arc<str>,
    steps: Vec<BoxStep>,
    state: State,
    stats: PipelineStats,
}

impl Worker {
    pub(crate) fn new(name: Arc<str>, steps: Vec<BoxStep>) -> Self {
        Self {
            name,
            steps,
            state: State::default(),
            stats: PipelineStats::default(),
        }
    }

    /// Runs until drained, stopped, or every sender is gone. Returns the last
    /// committed state.
    pub(crate) async fn run(
        mut self,
        mut intake: mpsc::Receiver<Command>,
        mut shutdown: watch::Receiver<bool>,
    ) -> State {
        debug!(pipeline = %self.name, steps = self.steps.len(), "pipeline worker started");

        loop {
            // The stop signal is only checked between folds.
            let command = tokio::select! {
                biased;
                _ = shutdown.wait_for(|stop| *stop) => break,
                command = intake.recv() => match command {
                    Some(command) => command,
                    None => break,
                },
            };

            match command {
                Command::Event { event, accepted } => {
                    if accepted.send(()).is_err() {
                        debug!(pipeline = %self.name, "submitter left before hand-off; event dropped");
                        continue;
                    }
                    self.process(&event);
                }
                Command::Snapshot(reply) => {
                    let _ = reply.send(self.state.clone());
                }
                Command::Stats(reply) => {
                    let _ = reply.send(self.stats);
                }
                Command::Drain => break,
            }
        }

        debug!(
            pipeline = %self.name,
            processed = self.stats.processed,
            faulted = self.stats.faulted,
            "pipeline worker stopped"
        );
        self.state
    }

    fn process(&mut self, event: &Event) {
        let span = tracing::info_span!("fold", pipeline = %self.name, value = event.value);
        let _enter = span.enter();

        match fold(&self.steps, event, self.state.clone()) {
            Ok(next) => {
                self.state = next;
                self.stats.processed += 1;
            }
            Err(fault) => {
                self.stats.faulted += 1;
                error!(
                    step = fault.step(),
                    error = %fault,
                    "step fault; event skipped and state left unchanged"
                );
            }
        }
    }
}
