use thiserror::Error;

/// Errors returned by an execution backend.
#[derive(Debug, Error)]
pub enum BackendError {
  /// Transport failure talking to the backend.
  #[error("http error: {0}")]
  Http(#[from] reqwest::Error),

  /// The backend answered with a non-success status.
  #[error("backend returned {status}: {body}")]
  Status { status: u16, body: String },

  #[error("project not found: {project_id}")]
  ProjectNotFound { project_id: String },

  /// Metadata was attached to a file the backend has no record of.
  #[error("file not found: {file_name}")]
  FileNotFound { file_name: String },

  #[error("invalid backend url {url}: {message}")]
  InvalidUrl { url: String, message: String },

  /// The backend refused the call.
  #[error("backend rejected call: {message}")]
  Rejected { message: String },
}
