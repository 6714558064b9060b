use std::collections::BTreeMap;

use async_trait::async_trait;
use dendro_config::Metadata;
use serde::Serialize;
use tokio::sync::Mutex;

use crate::backend::{ExecutionBackend, JobHandle, ProjectHandle, SubmitJobRequest};
use crate::error::BackendError;

/// One call received by a [`MemoryBackend`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub enum BackendCall {
  ResolveProject {
    project_id: String,
  },
  RegisterFile {
    file_name: String,
    url: String,
    metadata: Metadata,
  },
  SubmitJob {
    job_id: String,
    request: SubmitJobRequest,
  },
  SetFileMetadata {
    file_name: String,
    metadata: Metadata,
  },
}

/// A file as the backend sees it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileRecord {
  /// Source url for imported files; `None` for files a job will produce.
  pub url: Option<String>,
  pub metadata: Metadata,
}

#[derive(Debug, Default)]
struct State {
  calls: Vec<BackendCall>,
  files: BTreeMap<String, FileRecord>,
  attempts: usize,
  jobs_submitted: usize,
}

/// In-process execution backend.
///
/// Accepts every project id and records each call in order. Jobs get
/// sequential ids starting at `job-1`. Output files of a
/// submitted job get a record with no url, so metadata can be attached to them
/// afterwards. Suitable for dry runs and testing.
#[derive(Debug, Default)]
pub struct MemoryBackend {
  state: Mutex<State>,
  fail_at: Option<usize>,
}

impl MemoryBackend {
  pub fn new() -> Self {
    Self::default()
  }

  /// Reject the call with this zero-based position, counting every call.
  ///
  /// The rejected call is not recorded and changes nothing.
  pub fn failing_at(call: usize) -> Self {
    Self {
      state: Mutex::new(State::default()),
      fail_at: Some(call),
    }
  }

  /// Calls accepted so far, in order.
  pub async fn calls(&self) -> Vec<BackendCall> {
    self.state.lock().await.calls.clone()
  }

  /// Files known to the backend, by name.
  pub async fn files(&self) -> BTreeMap<String, FileRecord> {
    self.state.lock().await.files.clone()
  }

  fn admit(&self, state: &mut State) -> Result<(), BackendError> {
    let position = state.attempts;
    state.attempts += 1;
    if self.fail_at == Some(position) {
      return Err(BackendError::Rejected {
        message: format!("call {} rejected", position),
      });
    }
    Ok(())
  }
}

#[async_trait]
impl ExecutionBackend for MemoryBackend {
  async fn resolve_project(&self, project_id: &str) -> Result<ProjectHandle, BackendError> {
    let mut state = self.state.lock().await;
    self.admit(&mut state)?;

    state.calls.push(BackendCall::ResolveProject {
      project_id: project_id.to_string(),
    });
    Ok(ProjectHandle {
      project_id: project_id.to_string(),
      name: project_id.to_string(),
    })
  }

  async fn register_file(
    &self,
    _project: &ProjectHandle,
    file_name: &str,
    url: &str,
    metadata: &Metadata,
  ) -> Result<(), BackendError> {
    let mut state = self.state.lock().await;
    self.admit(&mut state)?;

    state.files.insert(
      file_name.to_string(),
      FileRecord {
        url: Some(url.to_string()),
        metadata: metadata.clone(),
      },
    );
    state.calls.push(BackendCall::RegisterFile {
      file_name: file_name.to_string(),
      url: url.to_string(),
      metadata: metadata.clone(),
    });
    Ok(())
  }

  async fn submit_job(
    &self,
    _project: &ProjectHandle,
    request: SubmitJobRequest,
  ) -> Result<JobHandle, BackendError> {
    let mut state = self.state.lock().await;
    self.admit(&mut state)?;

    state.jobs_submitted += 1;
    let job_id = format!("job-{}", state.jobs_submitted);
    for output in &request.output_files {
      state
        .files
        .entry(output.file_name.clone())
        .or_insert_with(|| FileRecord {
          url: None,
          metadata: Metadata::new(),
        });
    }
    state.calls.push(BackendCall::SubmitJob {
      job_id: job_id.clone(),
      request,
    });
    Ok(JobHandle { job_id })
  }

  async fn set_file_metadata(
    &self,
    _project: &ProjectHandle,
    file_name: &str,
    metadata: &Metadata,
  ) -> Result<(), BackendError> {
    let mut state = self.state.lock().await;
    self.admit(&mut state)?;

    match state.files.get_mut(file_name) {
      Some(record) => record.metadata = metadata.clone(),
      None => {
        return Err(BackendError::FileNotFound {
          file_name: file_name.to_string(),
        });
      }
    }
    state.calls.push(BackendCall::SetFileMetadata {
      file_name: file_name.to_string(),
      metadata: metadata.clone(),
    });
    Ok(())
  }
}
