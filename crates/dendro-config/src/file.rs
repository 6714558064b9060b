use serde::{Deserialize, Serialize};

use crate::value::Metadata;

/// A file brought into the pipeline from outside, with no producing job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportedFile {
  /// Pipeline-wide file name, e.g. "imported/000946/sub-BH494/ecephys.nwb.lindi.json"
  pub fname: String,

  /// Where the backend fetches the content from.
  pub url: String,

  #[serde(default)]
  pub metadata: Metadata,
}

impl ImportedFile {
  pub fn new(fname: impl Into<String>, url: impl Into<String>) -> Self {
    Self {
      fname: fname.into(),
      url: url.into(),
      metadata: Metadata::new(),
    }
  }

  pub fn with_metadata(mut self, metadata: Metadata) -> Self {
    self.metadata = metadata;
    self
  }
}
