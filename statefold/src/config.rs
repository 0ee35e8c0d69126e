//! Declarative pipeline configuration.
//!
//! A configuration names every pipeline, lists its steps, and picks the
//! pipeline that ingested lines are routed to:
//!
//! ```toml
//! route = "demo1"
//!
//! [[pipelines]]
//! name = "demo1"
//! steps = [
//!     { kind = "history", max_depth = 2 },
//!     { kind = "average" },
//!     { kind = "print" },
//! ]
//! ```
//!
//! [`Config::default`] is exactly this setup.

use crate::{
    error::ConfigError,
    orchestrator::{Pipeline, Registry, RegistryBuilder},
};
use serde::Deserialize;
use statefold_core::{BoxStep, Step};
use statefold_std::{AverageStep, HistoryStep, PrintStep};
use std::{collections::HashSet, path::Path};

/// Name of the pipeline in the default configuration.
pub const DEFAULT_PIPELINE: &str = "demo1";

/// History bound used by the default configuration.
pub const DEFAULT_MAX_DEPTH: usize = 2;

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Pipeline that receives every ingested line.
    #[serde(default = "default_route")]
    pub route: String,
    /// Pipelines to start.
    pub pipelines: Vec<PipelineConfig>,
}

/// One pipeline and its ordered steps.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineConfig {
    /// Unique pipeline name.
    pub name: String,
    /// Steps, in fold order.
    pub steps: Vec<StepConfig>,
}

/// A step, selected by its `kind`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StepConfig {
    /// [`HistoryStep`] bounded to `max_depth` events.
    History {
        /// History bound.
        max_depth: usize,
    },
    /// [`AverageStep`].
    Average,
    /// [`PrintStep`]; the label defaults to the pipeline's name.
    Print {
        /// Label attached to the log line.
        #[serde(default)]
        label: Option<String>,
    },
}

fn default_route() -> String {
    DEFAULT_PIPELINE.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            route: default_route(),
            pipelines: vec![PipelineConfig {
                name: DEFAULT_PIPELINE.to_string(),
                steps: vec![
                    StepConfig::History {
                        max_depth: DEFAULT_MAX_DEPTH,
                    },
                    StepConfig::Average,
                    StepConfig::Print { label: None },
                ],
            }],
        }
    }
}

impl Config {
    /// Parse a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Read and parse a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Checks that the configuration describes a usable setup.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pipelines.is_empty() {
            return Err(ConfigError::Invalid("no pipelines configured".into()));
        }

        let mut seen = HashSet::new();
        for pipeline in &self.pipelines {
            if pipeline.name.is_empty() {
                return Err(ConfigError::Invalid("pipeline name is empty".into()));
            }
            if !seen.insert(pipeline.name.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "pipeline `{}` is defined more than once",
                    pipeline.name
                )));
            }
            if pipeline.steps.is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "pipeline `{}` has no steps",
                    pipeline.name
                )));
            }
        }

        if !seen.contains(self.route.as_str()) {
            return Err(ConfigError::Invalid(format!(
                "route `{}` names no configured pipeline",
                self.route
            )));
        }
        Ok(())
    }

    /// Validates, starts every pipeline and registers them.
    ///
    /// Must be called inside a Tokio runtime.
    pub fn start_registry(&self) -> Result<Registry, ConfigError> {
        self.validate()?;
        let mut builder = RegistryBuilder::new();
        for pipeline in &self.pipelines {
            builder.register_mut(Pipeline::start(&pipeline.name, pipeline.build_steps()))?;
        }
        Ok(builder.build()?)
    }
}

impl PipelineConfig {
    /// Instantiate the configured steps.
    pub fn build_steps(&self) -> Vec<BoxStep> {
        self.steps.iter().map(|step| step.build(&self.name)).collect()
    }
}

impl StepConfig {
    /// Instantiate the step for the pipeline called `pipeline`.
    pub fn build(&self, pipeline: &str) -> BoxStep {
        match self {
            StepConfig::History { max_depth } => HistoryStep::new(*max_depth).boxed(),
            StepConfig::Average => AverageStep.boxed(),
            StepConfig::Print { label } => {
                PrintStep::labeled(label.as_deref().unwrap_or(pipeline)).boxed()
            }
        }
    }
}
