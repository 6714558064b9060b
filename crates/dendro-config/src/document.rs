use serde::{Deserialize, Serialize};

use crate::file::ImportedFile;
use crate::job::Job;

/// Portable form of a finished pipeline.
///
/// Both arrays keep declaration order, which doubles as execution order for
/// runners that do not sort the graph themselves.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineDocument {
  pub imported_files: Vec<ImportedFile>,
  pub jobs: Vec<Job>,
}

impl PipelineDocument {
  /// Parse a document from JSON.
  pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
    serde_json::from_str(content)
  }

  /// Render the document as pretty JSON with a trailing newline.
  ///
  /// Output is deterministic: the same document always yields the same bytes.
  pub fn to_json(&self) -> Result<String, serde_json::Error> {
    let mut json = serde_json::to_string_pretty(self)?;
    json.push('\n');
    Ok(json)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_empty_document_shape() {
    let json = PipelineDocument::default().to_json().unwrap();
    assert_eq!(json, "{\n  \"imported_files\": [],\n  \"jobs\": []\n}\n");
  }

  #[test]
  fn test_imported_file_metadata_defaults_to_empty() {
    let doc = PipelineDocument::from_json(
      r#"{"imported_files": [{"fname": "imported/a.json", "url": "https://x/a"}], "jobs": []}"#,
    )
    .unwrap();

    assert_eq!(doc.imported_files.len(), 1);
    assert_eq!(doc.imported_files[0].fname, "imported/a.json");
    assert!(doc.imported_files[0].metadata.is_empty());
  }

  #[test]
  fn test_missing_jobs_array_rejected() {
    let result = PipelineDocument::from_json(r#"{"imported_files": []}"#);
    assert!(result.is_err());
  }
}
