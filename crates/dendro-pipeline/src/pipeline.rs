use dendro_config::{ImportedFile, Job, PipelineDocument};
use tracing::debug;

use crate::emit::Emitter;
use crate::error::PipelineError;
use crate::graph::Graph;
use crate::validator::{FileRegistry, PipelineValidator};

/// An append-only pipeline graph under construction.
///
/// Every declaration goes through the validator before it is recorded, so at
/// any point the pipeline only holds files and jobs that form a valid graph.
/// Nothing can be removed; each file is produced exactly once.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
  imported_files: Vec<ImportedFile>,
  jobs: Vec<Job>,
  validator: PipelineValidator,
}

impl Pipeline {
  pub fn new() -> Self {
    Self::default()
  }

  /// Rebuild a pipeline from a document, validating every declaration.
  pub fn from_document(document: PipelineDocument) -> Result<Self, PipelineError> {
    let mut pipeline = Self::new();
    for file in document.imported_files {
      pipeline.add_imported_file(file)?;
    }
    for job in document.jobs {
      pipeline.add_job(job)?;
    }
    Ok(pipeline)
  }

  /// Declare a file imported from outside the pipeline.
  pub fn add_imported_file(&mut self, file: ImportedFile) -> Result<(), PipelineError> {
    self.validator.validate_and_register_import(&file)?;
    debug!(fname = %file.fname, url = %file.url, "imported file added");
    self.imported_files.push(file);
    Ok(())
  }

  /// Declare a job. Its inputs must already be known and its outputs new.
  pub fn add_job(&mut self, job: Job) -> Result<(), PipelineError> {
    self.validator.validate_and_register_job(&job)?;
    debug!(
      processor = %job.processor_name,
      inputs = job.inputs.len(),
      outputs = job.outputs.len(),
      "job added"
    );
    self.jobs.push(job);
    Ok(())
  }

  pub fn imported_files(&self) -> &[ImportedFile] {
    &self.imported_files
  }

  pub fn jobs(&self) -> &[Job] {
    &self.jobs
  }

  /// All file names declared so far, imports and outputs alike.
  pub fn known_files(&self) -> &FileRegistry {
    self.validator.files()
  }

  pub fn contains_file(&self, fname: &str) -> bool {
    self.validator.files().contains(fname)
  }

  /// Build the dependency graph between jobs.
  pub fn graph(&self) -> Graph {
    Graph::new(&self.imported_files, &self.jobs)
  }

  /// Flatten the pipeline into its portable document form.
  pub fn to_document(&self) -> PipelineDocument {
    PipelineDocument {
      imported_files: self.imported_files.clone(),
      jobs: self.jobs.clone(),
    }
  }

  /// Hand the finished pipeline to an emitter.
  pub async fn emit<E: Emitter>(&self, emitter: &E) -> Result<E::Output, E::Error> {
    emitter.emit(self).await
  }
}
