//! Error types for the pipeline runtime.
//!
//! This module provides a structured error hierarchy using `thiserror`:
//!
//! - [`PipelineError`] - A pipeline's worker is unavailable
//! - [`RegistryError`] - The pipeline table could not be built
//! - [`RouteError`] - An event could not be delivered to a named pipeline
//! - [`IngestError`] - An input line was rejected, or input could not be read
//! - [`LineError`] - A single input line was not delivered
//! - [`ConfigError`] - Configuration could not be loaded or is invalid

use std::path::PathBuf;
use thiserror::Error;

/// Errors from talking to a pipeline's worker.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The worker has stopped and accepts no more commands.
    #[error("pipeline `{0}` is closed")]
    Closed(String),

    /// The worker task panicked outside of a step.
    #[error("pipeline `{0}` worker panicked")]
    WorkerPanicked(String),
}

/// Errors while building a [`Registry`](crate::orchestrator::Registry).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Two pipelines share a name.
    #[error("pipeline `{0}` is already registered")]
    DuplicateName(String),

    /// No pipelines were registered.
    #[error("registry has no pipelines")]
    Empty,
}

/// Errors while routing an event to a pipeline.
#[derive(Error, Debug)]
pub enum RouteError {
    /// No pipeline is registered under the name.
    #[error("no pipeline named `{0}`")]
    UnknownPipelineName(String),

    /// The pipeline exists but did not take the event.
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

/// Errors from the ingestion loop.
#[derive(Error, Debug)]
pub enum IngestError {
    /// The line is not a floating-point number.
    #[error("could not parse {line:?} as a float")]
    Parse {
        /// The offending line, without its terminator.
        line: String,
        /// The parser's complaint.
        #[source]
        source: std::num::ParseFloatError,
    },

    /// The line is not valid UTF-8.
    #[error("{line:?} is not valid UTF-8")]
    NotUtf8 {
        /// The offending line, lossily decoded, without its terminator.
        line: String,
        /// Where decoding failed.
        #[source]
        source: std::str::Utf8Error,
    },

    /// The line parsed to infinity or NaN.
    #[error("{line:?} is not a finite number")]
    NonFinite {
        /// The offending line, without its terminator.
        line: String,
    },

    /// The input stream failed.
    #[error("failed to read input")]
    Io(#[from] std::io::Error),
}

/// Why a single input line was not delivered to a pipeline.
#[derive(Error, Debug)]
pub enum LineError {
    /// The line did not parse.
    #[error(transparent)]
    Parse(IngestError),

    /// The event could not be delivered.
    #[error(transparent)]
    Route(#[from] RouteError),
}

/// Errors while loading or applying configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file {path}")]
    Read {
        /// Path that was read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration is not valid TOML for this schema.
    #[error("failed to parse config")]
    Parse(#[from] toml::de::Error),

    /// The configuration parsed but describes an unusable setup.
    #[error("invalid config: {0}")]
    Invalid(String),

    /// The pipelines could not be registered.
    #[error(transparent)]
    Registry(#[from] RegistryError),
}
