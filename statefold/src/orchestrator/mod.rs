//! Pipeline runtime: workers, handles and the routing registry.

pub(crate) mod pipeline;
pub(crate) mod registry;
pub(crate) mod worker;

pub use pipeline::{Pipeline, PipelineBuilder, PipelineHandle};
pub use registry::{Registry, RegistryBuilder};
pub use worker::{PipelineStats, fold};
