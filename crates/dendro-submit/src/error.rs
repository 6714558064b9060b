use thiserror::Error;

/// Errors that can occur while submitting a pipeline.
///
/// Submission is not transactional: files and jobs sent before the failing
/// call stay on the backend.
#[derive(Debug, Error)]
pub enum SubmitError {
  #[error(transparent)]
  Backend(#[from] dendro_backend::BackendError),
}
