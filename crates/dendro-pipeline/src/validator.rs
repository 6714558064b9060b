use std::collections::HashSet;

use dendro_config::{ImportedFile, Job, Metadata, Value};

use crate::error::PipelineError;

/// The set of file names known to exist at a point in construction.
///
/// Names are only ever added. Iteration yields them in registration order.
#[derive(Debug, Clone, Default)]
pub struct FileRegistry {
  names: HashSet<String>,
  order: Vec<String>,
}

impl FileRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn contains(&self, name: &str) -> bool {
    self.names.contains(name)
  }

  pub fn len(&self) -> usize {
    self.order.len()
  }

  pub fn is_empty(&self) -> bool {
    self.order.is_empty()
  }

  /// Known names in the order they were registered.
  pub fn iter(&self) -> impl Iterator<Item = &str> {
    self.order.iter().map(String::as_str)
  }

  fn insert(&mut self, name: &str) {
    if self.names.insert(name.to_string()) {
      self.order.push(name.to_string());
    }
  }
}

/// Guards every change to the known-files set.
#[derive(Debug, Clone, Default)]
pub struct PipelineValidator {
  files: FileRegistry,
}

impl PipelineValidator {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn files(&self) -> &FileRegistry {
    &self.files
  }

  /// Check an imported file and register its name.
  pub fn validate_and_register_import(&mut self, file: &ImportedFile) -> Result<(), PipelineError> {
    if self.files.contains(&file.fname) {
      return Err(PipelineError::FileAlreadyExists {
        name: file.fname.clone(),
      });
    }
    check_metadata(&file.fname, &file.metadata)?;
    self.files.insert(&file.fname);
    Ok(())
  }

  /// Check a job and register its outputs.
  ///
  /// All inputs are checked before any output, then parameters and output
  /// metadata. Outputs are only registered once every check has passed, so a
  /// rejected job leaves the registry as it was.
  pub fn validate_and_register_job(&mut self, job: &Job) -> Result<(), PipelineError> {
    for input in &job.inputs {
      if !self.files.contains(&input.fname) {
        return Err(PipelineError::UnknownInputFile {
          processor: job.processor_name.clone(),
          name: input.fname.clone(),
        });
      }
    }

    // Outputs may also collide with each other within the same job
    let mut pending: HashSet<&str> = HashSet::new();
    for output in &job.outputs {
      if self.files.contains(&output.fname) || !pending.insert(output.fname.as_str()) {
        return Err(PipelineError::OutputFileAlreadyExists {
          processor: job.processor_name.clone(),
          name: output.fname.clone(),
        });
      }
    }

    for parameter in &job.parameters {
      if !parameter.value.is_finite() {
        return Err(PipelineError::NonFiniteParameter {
          processor: job.processor_name.clone(),
          name: parameter.name.clone(),
        });
      }
    }
    for output in &job.outputs {
      check_metadata(&output.fname, &output.metadata)?;
    }

    for output in &job.outputs {
      self.files.insert(&output.fname);
    }
    Ok(())
  }
}

// NaN and infinity serialize as JSON null and would not survive a reload
fn check_metadata(fname: &str, metadata: &Metadata) -> Result<(), PipelineError> {
  if metadata.values().all(Value::is_finite) {
    Ok(())
  } else {
    Err(PipelineError::NonFiniteMetadata {
      name: fname.to_string(),
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use dendro_config::{JobInput, JobOutput, JobParameter, RequiredResources, RunMethod};

  fn make_job(inputs: &[&str], outputs: &[&str]) -> Job {
    Job {
      processor_name: "test.processor".to_string(),
      inputs: inputs
        .iter()
        .enumerate()
        .map(|(i, f)| JobInput::new(format!("input{}", i), *f))
        .collect(),
      outputs: outputs
        .iter()
        .enumerate()
        .map(|(i, f)| JobOutput::new(format!("output{}", i), *f))
        .collect(),
      parameters: vec![],
      required_resources: RequiredResources {
        num_cpus: 1,
        num_gpus: 0,
        memory_gb: 1,
        time_sec: 60,
      },
      run_method: RunMethod::Local,
    }
  }

  #[test]
  fn test_duplicate_import_rejected() {
    let mut validator = PipelineValidator::new();
    let file = ImportedFile::new("raw/a.dat", "https://x/a");

    validator.validate_and_register_import(&file).unwrap();
    let result = validator.validate_and_register_import(&file);

    assert_eq!(
      result,
      Err(PipelineError::FileAlreadyExists {
        name: "raw/a.dat".to_string()
      })
    );
    assert_eq!(validator.files().len(), 1);
  }

  #[test]
  fn test_job_registers_outputs_in_order() {
    let mut validator = PipelineValidator::new();
    validator
      .validate_and_register_import(&ImportedFile::new("raw/a.dat", "https://x/a"))
      .unwrap();

    validator
      .validate_and_register_job(&make_job(&["raw/a.dat"], &["out/c.dat", "out/b.dat"]))
      .unwrap();

    assert_eq!(
      validator.files().iter().collect::<Vec<_>>(),
      vec!["raw/a.dat", "out/c.dat", "out/b.dat"]
    );
  }

  #[test]
  fn test_unknown_input_registers_nothing() {
    let mut validator = PipelineValidator::new();

    let result = validator.validate_and_register_job(&make_job(&["raw/missing.dat"], &["out/b.dat"]));

    assert!(matches!(
      result,
      Err(PipelineError::UnknownInputFile { ref name, .. }) if name == "raw/missing.dat"
    ));
    assert!(validator.files().is_empty());
  }

  #[test]
  fn test_late_output_collision_registers_nothing() {
    let mut validator = PipelineValidator::new();
    validator
      .validate_and_register_import(&ImportedFile::new("raw/a.dat", "https://x/a"))
      .unwrap();

    let result = validator.validate_and_register_job(&make_job(&[], &["out/new.dat", "raw/a.dat"]));

    assert!(matches!(
      result,
      Err(PipelineError::OutputFileAlreadyExists { ref name, .. }) if name == "raw/a.dat"
    ));
    assert!(!validator.files().contains("out/new.dat"));
    assert_eq!(validator.files().len(), 1);
  }

  #[test]
  fn test_output_colliding_within_job_rejected() {
    let mut validator = PipelineValidator::new();

    let result = validator.validate_and_register_job(&make_job(&[], &["out/x.dat", "out/x.dat"]));

    assert!(matches!(
      result,
      Err(PipelineError::OutputFileAlreadyExists { ref name, .. }) if name == "out/x.dat"
    ));
    assert!(validator.files().is_empty());
  }

  #[test]
  fn test_job_without_inputs_accepted() {
    let mut validator = PipelineValidator::new();
    validator
      .validate_and_register_job(&make_job(&[], &["out/generated.dat"]))
      .unwrap();
    assert!(validator.files().contains("out/generated.dat"));
  }

  #[test]
  fn test_non_finite_parameter_registers_nothing() {
    let mut validator = PipelineValidator::new();
    let mut job = make_job(&[], &["out/a.dat"]);
    job
      .parameters
      .push(JobParameter::new("window", vec![0.5, f64::NAN]));

    let result = validator.validate_and_register_job(&job);

    assert_eq!(
      result,
      Err(PipelineError::NonFiniteParameter {
        processor: "test.processor".to_string(),
        name: "window".to_string()
      })
    );
    assert!(validator.files().is_empty());
  }

  #[test]
  fn test_non_finite_output_metadata_registers_nothing() {
    let mut validator = PipelineValidator::new();
    let mut job = make_job(&[], &["out/a.dat", "out/b.dat"]);
    let mut metadata = Metadata::new();
    metadata.insert("rate".to_string(), Value::Float(f64::INFINITY));
    job.outputs[1].metadata = metadata;

    let result = validator.validate_and_register_job(&job);

    assert_eq!(
      result,
      Err(PipelineError::NonFiniteMetadata {
        name: "out/b.dat".to_string()
      })
    );
    assert!(validator.files().is_empty());
  }

  #[test]
  fn test_non_finite_import_metadata_rejected() {
    let mut validator = PipelineValidator::new();
    let mut metadata = Metadata::new();
    metadata.insert("gain".to_string(), Value::Float(f64::NEG_INFINITY));
    let file = ImportedFile::new("raw/a.dat", "https://x/a").with_metadata(metadata);

    let result = validator.validate_and_register_import(&file);

    assert!(matches!(result, Err(PipelineError::NonFiniteMetadata { .. })));
    assert!(!validator.files().contains("raw/a.dat"));
  }
}
