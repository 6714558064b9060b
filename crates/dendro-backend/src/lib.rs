mod backend;
mod config;
mod error;
mod http;
mod memory;

pub use backend::{
  ExecutionBackend, InputBinding, JobHandle, JobResources, OutputBinding, ProjectHandle,
  RerunPolicy, SubmitJobRequest,
};
pub use config::BackendConfig;
pub use error::BackendError;
pub use http::HttpBackend;
pub use memory::{BackendCall, FileRecord, MemoryBackend};
