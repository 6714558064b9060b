use serde::{Deserialize, Serialize};

use crate::value::{Metadata, Value};

/// A named input port bound to an existing file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobInput {
  /// Port name declared by the processor, e.g. "input"
  pub name: String,
  /// File bound to the port; must already be known when the job is added.
  pub fname: String,
}

impl JobInput {
  pub fn new(name: impl Into<String>, fname: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      fname: fname.into(),
    }
  }
}

/// A named output port that creates a new file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobOutput {
  pub name: String,
  pub fname: String,
  /// Attached to the backend's file record once the job is submitted.
  #[serde(default)]
  pub metadata: Metadata,
}

impl JobOutput {
  pub fn new(name: impl Into<String>, fname: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      fname: fname.into(),
      metadata: Metadata::new(),
    }
  }

  pub fn with_metadata(mut self, metadata: Metadata) -> Self {
    self.metadata = metadata;
    self
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobParameter {
  pub name: String,
  pub value: Value,
}

impl JobParameter {
  pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
    Self {
      name: name.into(),
      value: value.into(),
    }
  }
}

/// Resources a job asks the backend for. Not enforced here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequiredResources {
  pub num_cpus: u32,
  pub num_gpus: u32,
  pub memory_gb: u32,
  pub time_sec: u64,
}

/// Where the backend should run a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunMethod {
  Local,
  AwsBatch,
  Slurm,
}

impl RunMethod {
  pub fn as_str(&self) -> &'static str {
    match self {
      RunMethod::Local => "local",
      RunMethod::AwsBatch => "aws_batch",
      RunMethod::Slurm => "slurm",
    }
  }
}

/// One unit of work: a processor invocation over named files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
  /// Processor identifier, e.g. "neurosift-1.autocorrelograms"
  pub processor_name: String,
  pub inputs: Vec<JobInput>,
  pub outputs: Vec<JobOutput>,
  #[serde(default)]
  pub parameters: Vec<JobParameter>,
  pub required_resources: RequiredResources,
  pub run_method: RunMethod,
}
