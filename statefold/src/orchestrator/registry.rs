//! Registry module for pipeline routing.
//!
//! This module provides a builder for registering pipelines under unique
//! names and a frozen registry that routes events to them by name.

use super::pipeline::{Pipeline, PipelineHandle};
use crate::error::{PipelineError, RegistryError, RouteError};
use futures::future::join_all;
use statefold_core::{Event, State};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

// ============================================================================
// RegistryBuilder - for constructing registries
// ============================================================================

/// Builder for constructing a Registry.
///
/// Register every pipeline, then call `.build()` to freeze the table.
///
/// # Example
/// ```ignore
/// let registry = RegistryBuilder::new()
///     .register(Pipeline::start("demo1", steps))?
///     .build()?;
/// ```
#[derive(Default)]
pub struct RegistryBuilder {
    pipelines: HashMap<String, Pipeline>,
}

impl RegistryBuilder {
    /// Create a new empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a pipeline under its own name.
    ///
    /// A pipeline whose name is taken is rejected and dropped, which stops
    /// its worker.
    pub fn register(mut self, pipeline: Pipeline) -> Result<Self, RegistryError> {
        self.register_mut(pipeline)?;
        Ok(self)
    }

    /// Register a pipeline (mutable version).
    pub fn register_mut(&mut self, pipeline: Pipeline) -> Result<(), RegistryError> {
        let name = pipeline.name().to_string();
        if self.pipelines.contains_key(&name) {
            return Err(RegistryError::DuplicateName(name));
        }
        debug!(pipeline = %name, "pipeline registered");
        self.pipelines.insert(name, pipeline);
        Ok(())
    }

    /// Build the immutable Registry.
    ///
    /// An empty table is an error: such a registry could route nothing.
    pub fn build(self) -> Result<Registry, RegistryError> {
        if self.pipelines.is_empty() {
            return Err(RegistryError::Empty);
        }
        Ok(Registry {
            pipelines: self.pipelines,
        })
    }

    /// Get the number of registered pipelines.
    pub fn len(&self) -> usize {
        self.pipelines.len()
    }

    /// Check if the builder has no pipelines.
    pub fn is_empty(&self) -> bool {
        self.pipelines.is_empty()
    }
}

// ============================================================================
// Registry - immutable name-to-pipeline table
// ============================================================================

/// An immutable table of running pipelines, keyed by name.
///
/// The table never changes after `build()`, so routing takes `&self` and
/// needs no locking.
pub struct Registry {
    pipelines: HashMap<String, Pipeline>,
}

impl Registry {
    /// Create a builder.
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Submit `event` to the pipeline called `name`.
    ///
    /// Waits for the pipeline to accept the event, as
    /// [`PipelineHandle::submit`] does.
    pub async fn route(&self, name: &str, event: Event) -> Result<(), RouteError> {
        let pipeline = self
            .pipelines
            .get(name)
            .ok_or_else(|| RouteError::UnknownPipelineName(name.to_string()))?;
        pipeline.submit(event).await?;
        Ok(())
    }

    /// Look up a pipeline.
    pub fn get(&self, name: &str) -> Option<&Pipeline> {
        self.pipelines.get(name)
    }

    /// A handle to the pipeline called `name`.
    pub fn handle(&self, name: &str) -> Result<PipelineHandle, RouteError> {
        self.get(name)
            .map(Pipeline::handle)
            .ok_or_else(|| RouteError::UnknownPipelineName(name.to_string()))
    }

    /// Whether a pipeline is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.pipelines.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.pipelines.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Get the number of registered pipelines.
    pub fn len(&self) -> usize {
        self.pipelines.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.pipelines.is_empty()
    }

    /// Drains every pipeline concurrently and returns each final state by
    /// name.
    pub async fn shutdown(self) -> BTreeMap<String, Result<State, PipelineError>> {
        let drains = self
            .pipelines
            .into_iter()
            .map(|(name, pipeline)| async move { (name, pipeline.drain().await) });
        join_all(drains).await.into_iter().collect()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("pipelines", &self.names())
            .finish()
    }
}
