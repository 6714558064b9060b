use std::path::{Path, PathBuf};

use async_trait::async_trait;
use dendro_config::PipelineDocument;
use tokio::fs;
use tracing::info;

use crate::emit::Emitter;
use crate::error::DocumentError;
use crate::pipeline::Pipeline;

/// Emitter that writes the pipeline as a JSON document.
///
/// The one output file is the only side effect.
pub struct DocumentWriter {
  path: PathBuf,
}

impl DocumentWriter {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self { path: path.into() }
  }

  pub fn path(&self) -> &Path {
    &self.path
  }
}

#[async_trait]
impl Emitter for DocumentWriter {
  type Output = PipelineDocument;
  type Error = DocumentError;

  async fn emit(&self, pipeline: &Pipeline) -> Result<PipelineDocument, DocumentError> {
    let document = pipeline.to_document();
    let json = document.to_json()?;
    fs::write(&self.path, json).await?;

    info!(
      path = %self.path.display(),
      imported_files = document.imported_files.len(),
      jobs = document.jobs.len(),
      "pipeline document written"
    );
    Ok(document)
  }
}

/// Read a pipeline document and rebuild the pipeline it declares.
pub async fn read_document(path: impl AsRef<Path>) -> Result<Pipeline, DocumentError> {
  let content = fs::read_to_string(path.as_ref()).await?;
  let document = PipelineDocument::from_json(&content)?;
  Ok(Pipeline::from_document(document)?)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::error::PipelineError;
  use dendro_config::ImportedFile;

  #[tokio::test]
  async fn test_write_then_read() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pipeline.json");

    let mut pipeline = Pipeline::new();
    pipeline
      .add_imported_file(ImportedFile::new("raw/a.dat", "https://x/a"))
      .unwrap();

    let writer = DocumentWriter::new(&path);
    let document = pipeline.emit(&writer).await.unwrap();
    assert_eq!(document.imported_files.len(), 1);

    let reloaded = read_document(&path).await.unwrap();
    assert_eq!(reloaded.imported_files(), pipeline.imported_files());
    assert!(reloaded.contains_file("raw/a.dat"));
  }

  #[tokio::test]
  async fn test_read_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let result = read_document(dir.path().join("absent.json")).await;
    assert!(matches!(result, Err(DocumentError::Io(_))));
  }

  #[tokio::test]
  async fn test_read_invalid_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pipeline.json");
    std::fs::write(
      &path,
      r#"{"imported_files": [
        {"fname": "a", "url": "https://x/1"},
        {"fname": "a", "url": "https://x/2"}
      ], "jobs": []}"#,
    )
    .unwrap();

    let result = read_document(&path).await;

    assert!(matches!(
      result,
      Err(DocumentError::Invalid(PipelineError::FileAlreadyExists { .. }))
    ));
  }
}
