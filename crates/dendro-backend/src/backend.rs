use async_trait::async_trait;
use dendro_config::{JobInput, JobOutput, JobParameter, Metadata, RequiredResources, RunMethod};
use serde::{Deserialize, Serialize};

use crate::error::BackendError;

/// A resolved project on the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectHandle {
  pub project_id: String,
  pub name: String,
}

/// A job accepted by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobHandle {
  pub job_id: String,
}

/// Whether the backend should run a job whose outputs already exist.
///
/// Submissions only ever ask for `never`; existing outputs are reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RerunPolicy {
  Never,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputBinding {
  pub name: String,
  pub file_name: String,
  pub is_folder: bool,
}

impl From<&JobInput> for InputBinding {
  fn from(input: &JobInput) -> Self {
    Self {
      name: input.name.clone(),
      file_name: input.fname.clone(),
      is_folder: false,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputBinding {
  pub name: String,
  pub file_name: String,
  pub is_folder: bool,
  pub skip_cloud_upload: bool,
}

impl From<&JobOutput> for OutputBinding {
  fn from(output: &JobOutput) -> Self {
    Self {
      name: output.name.clone(),
      file_name: output.fname.clone(),
      is_folder: false,
      skip_cloud_upload: false,
    }
  }
}

/// Resource request in the backend's wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobResources {
  pub num_cpus: u32,
  pub num_gpus: u32,
  pub memory_gb: u32,
  pub time_sec: u64,
}

impl From<RequiredResources> for JobResources {
  fn from(resources: RequiredResources) -> Self {
    Self {
      num_cpus: resources.num_cpus,
      num_gpus: resources.num_gpus,
      memory_gb: resources.memory_gb,
      time_sec: resources.time_sec,
    }
  }
}

/// Everything the backend needs to queue one job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitJobRequest {
  pub processor_name: String,
  pub input_files: Vec<InputBinding>,
  pub output_files: Vec<OutputBinding>,
  pub parameters: Vec<JobParameter>,
  /// Shared by every job of one submission.
  pub batch_id: String,
  pub rerun_policy: RerunPolicy,
  pub required_resources: JobResources,
  pub run_method: RunMethod,
}

/// Remote service that registers files and runs jobs.
///
/// Calls are issued one at a time by the submitter. Idempotency and conflict
/// handling are the backend's business; callers never retry.
#[async_trait]
pub trait ExecutionBackend: Send + Sync {
  /// Look up the project that files and jobs are registered under.
  async fn resolve_project(&self, project_id: &str) -> Result<ProjectHandle, BackendError>;

  /// Register an externally hosted file.
  async fn register_file(
    &self,
    project: &ProjectHandle,
    file_name: &str,
    url: &str,
    metadata: &Metadata,
  ) -> Result<(), BackendError>;

  /// Queue a job.
  async fn submit_job(
    &self,
    project: &ProjectHandle,
    request: SubmitJobRequest,
  ) -> Result<JobHandle, BackendError>;

  /// Attach metadata to an existing file record.
  async fn set_file_metadata(
    &self,
    project: &ProjectHandle,
    file_name: &str,
    metadata: &Metadata,
  ) -> Result<(), BackendError>;
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_submit_request_wire_format() {
    let request = SubmitJobRequest {
      processor_name: "neurosift-1.autocorrelograms".to_string(),
      input_files: vec![InputBinding::from(&JobInput::new("input", "imported/a.nwb"))],
      output_files: vec![OutputBinding::from(&JobOutput::new("output", "generated/a.nwb"))],
      parameters: vec![JobParameter::new("bin_size_msec", 1)],
      batch_id: "abcdef012345".to_string(),
      rerun_policy: RerunPolicy::Never,
      required_resources: JobResources::from(RequiredResources {
        num_cpus: 4,
        num_gpus: 0,
        memory_gb: 16,
        time_sec: 86400,
      }),
      run_method: RunMethod::AwsBatch,
    };

    let json = serde_json::to_value(&request).unwrap();

    assert_eq!(json["processorName"], "neurosift-1.autocorrelograms");
    assert_eq!(json["inputFiles"][0]["fileName"], "imported/a.nwb");
    assert_eq!(json["inputFiles"][0]["isFolder"], false);
    assert_eq!(json["outputFiles"][0]["skipCloudUpload"], false);
    assert_eq!(json["parameters"][0]["name"], "bin_size_msec");
    assert_eq!(json["parameters"][0]["value"], 1);
    assert_eq!(json["batchId"], "abcdef012345");
    assert_eq!(json["rerunPolicy"], "never");
    assert_eq!(json["requiredResources"]["memoryGb"], 16);
    assert_eq!(json["runMethod"], "aws_batch");
  }
}
