//! Dendro Pipeline
//!
//! This crate assembles imported files and jobs into a validated pipeline
//! graph over named files.
//!
//! Key guarantees:
//! - Every file name is declared exactly once (import or job output)
//! - Every job input refers to a file declared before the job
//! - A rejected declaration leaves the pipeline untouched
//! - Declaration order is preserved by every emitter
//!
//! A finished pipeline is handed to one [`Emitter`]: [`DocumentWriter`] writes
//! a portable JSON document, other crates submit it to an execution backend.

mod document;
mod emit;
mod error;
mod graph;
mod pipeline;
mod validator;

pub use document::{DocumentWriter, read_document};
pub use emit::Emitter;
pub use error::{DocumentError, PipelineError};
pub use graph::{Graph, Producer};
pub use pipeline::Pipeline;
pub use validator::{FileRegistry, PipelineValidator};
