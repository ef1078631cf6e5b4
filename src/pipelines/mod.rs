//! Pipelines.
//!
//! The two annotation pipelines are implemented here, and the module
//! provides a light [pipeline::Pipeline] trait that both implement.
pub mod lexicon;
#[allow(clippy::module_inception)]
pub mod pipeline;
pub mod service;
pub mod state;
pub mod summary;

pub use lexicon::{LexiconPipeline, LexiconReport, PipelineConfig};
pub use pipeline::Pipeline;
pub use service::{ServiceConfig, ServicePipeline, ServiceReport};
pub use state::State;
pub use summary::RunSummary;
