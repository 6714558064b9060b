use thiserror::Error;

/// Errors raised while declaring files and jobs.
///
/// Each one points at an authoring bug in the pipeline definition; the
/// rejected declaration has no effect on the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
  /// An imported file reuses a known file name.
  #[error("cannot import {name}: file already exists in pipeline")]
  FileAlreadyExists { name: String },

  /// A job input refers to a file not declared yet.
  #[error("cannot add job {processor}: input file {name} does not exist in pipeline")]
  UnknownInputFile { processor: String, name: String },

  /// A job output reuses a known file name.
  #[error("cannot add job {processor}: output file {name} already exists in pipeline")]
  OutputFileAlreadyExists { processor: String, name: String },

  /// A job parameter holds a NaN or infinite float.
  #[error("cannot add job {processor}: parameter {name} is not a finite number")]
  NonFiniteParameter { processor: String, name: String },

  /// File metadata holds a NaN or infinite float.
  #[error("metadata of file {name} contains a number that is not finite")]
  NonFiniteMetadata { name: String },
}

/// Errors reading or writing pipeline documents.
#[derive(Debug, Error)]
pub enum DocumentError {
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  /// The document parsed but declares an invalid pipeline.
  #[error("invalid pipeline: {0}")]
  Invalid(#[from] PipelineError),
}
