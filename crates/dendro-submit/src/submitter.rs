use std::num::NonZeroUsize;

use async_trait::async_trait;
use dendro_backend::{
  ExecutionBackend, InputBinding, OutputBinding, ProjectHandle, RerunPolicy, SubmitJobRequest,
};
use dendro_config::Job;
use dendro_pipeline::{Emitter, Pipeline};
use serde::Serialize;
use tracing::{error, info, instrument};

use crate::batch::{DEFAULT_BATCH_ID_LEN, generate_batch_id};
use crate::error::SubmitError;

/// A job accepted by the backend during a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmittedJob {
  pub processor_name: String,
  pub job_id: String,
}

/// Outcome of a complete submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionReport {
  pub project: ProjectHandle,
  pub batch_id: String,
  pub registered_files: Vec<String>,
  pub jobs: Vec<SubmittedJob>,
}

/// Emitter that replays a pipeline against an execution backend.
///
/// The replay is a straight sequence of backend calls:
/// 1. Resolve the project
/// 2. Register every imported file
/// 3. Submit every job under one batch id, each followed by its output metadata
///
/// Calls are awaited one at a time in declaration order. The first failure
/// stops the replay and is returned as is; nothing already sent is undone.
pub struct Submitter<B: ExecutionBackend> {
  backend: B,
  project_id: String,
  batch_id_len: NonZeroUsize,
}

impl<B: ExecutionBackend> Submitter<B> {
  /// Create a submitter targeting the given project.
  pub fn new(backend: B, project_id: impl Into<String>) -> Self {
    Self {
      backend,
      project_id: project_id.into(),
      batch_id_len: DEFAULT_BATCH_ID_LEN,
    }
  }

  pub fn with_batch_id_len(mut self, len: NonZeroUsize) -> Self {
    self.batch_id_len = len;
    self
  }

  pub fn backend(&self) -> &B {
    &self.backend
  }

  pub fn project_id(&self) -> &str {
    &self.project_id
  }

  fn job_request(job: &Job, batch_id: &str) -> SubmitJobRequest {
    SubmitJobRequest {
      processor_name: job.processor_name.clone(),
      input_files: job.inputs.iter().map(InputBinding::from).collect(),
      output_files: job.outputs.iter().map(OutputBinding::from).collect(),
      parameters: job.parameters.clone(),
      batch_id: batch_id.to_string(),
      rerun_policy: RerunPolicy::Never,
      required_resources: job.required_resources.into(),
      run_method: job.run_method,
    }
  }
}

#[async_trait]
impl<B: ExecutionBackend> Emitter for Submitter<B> {
  type Output = SubmissionReport;
  type Error = SubmitError;

  #[instrument(skip_all, fields(project_id = %self.project_id))]
  async fn emit(&self, pipeline: &Pipeline) -> Result<SubmissionReport, SubmitError> {
    let project = self.backend.resolve_project(&self.project_id).await?;
    info!(
      project_name = %project.name,
      imported_files = pipeline.imported_files().len(),
      jobs = pipeline.jobs().len(),
      "submitting pipeline"
    );

    let mut registered_files = Vec::with_capacity(pipeline.imported_files().len());
    for file in pipeline.imported_files() {
      self
        .backend
        .register_file(&project, &file.fname, &file.url, &file.metadata)
        .await
        .inspect_err(|e| error!(fname = %file.fname, error = %e, "failed to register file"))?;
      registered_files.push(file.fname.clone());
    }

    let batch_id = generate_batch_id(self.batch_id_len);

    let mut jobs = Vec::with_capacity(pipeline.jobs().len());
    for (index, job) in pipeline.jobs().iter().enumerate() {
      let request = Self::job_request(job, &batch_id);
      let handle = self
        .backend
        .submit_job(&project, request)
        .await
        .inspect_err(|e| {
          error!(
            index,
            processor = %job.processor_name,
            error = %e,
            "failed to submit job"
          )
        })?;

      info!(
        index,
        job_id = %handle.job_id,
        processor = %job.processor_name,
        batch_id = %batch_id,
        "job submitted"
      );

      for output in &job.outputs {
        self
          .backend
          .set_file_metadata(&project, &output.fname, &output.metadata)
          .await
          .inspect_err(|e| error!(fname = %output.fname, error = %e, "failed to set file metadata"))?;
      }

      jobs.push(SubmittedJob {
        processor_name: job.processor_name.clone(),
        job_id: handle.job_id,
      });
    }

    info!(batch_id = %batch_id, jobs = jobs.len(), "pipeline submitted");

    Ok(SubmissionReport {
      project,
      batch_id,
      registered_files,
      jobs,
    })
  }
}
