//! Dendro Config
//!
//! This crate contains the serializable pipeline definition types for dendro.
//! These types describe imported files and jobs before they are validated and
//! assembled into a pipeline graph.
//!
//! Definitions can come from:
//! - Rust code building a pipeline declaration by declaration
//! - JSON pipeline documents (via CLI with `dendro write pipeline.json`)
//!
//! The pipeline builder takes these types, checks them against the files known
//! so far, and either serializes the finished graph or submits it to an
//! execution backend.

mod document;
mod file;
mod job;
mod value;

pub use document::PipelineDocument;
pub use file::ImportedFile;
pub use job::{Job, JobInput, JobOutput, JobParameter, RequiredResources, RunMethod};
pub use value::{Metadata, Value};
