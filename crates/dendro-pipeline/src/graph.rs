use std::collections::HashMap;

use dendro_config::{ImportedFile, Job};

/// Where a file comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Producer {
  /// Imported from outside the pipeline.
  Imported,
  /// Written by the job at this declaration index.
  Job(usize),
}

/// Job dependency structure derived from a pipeline's file bindings.
///
/// Jobs are identified by their declaration index. Declaration order is
/// already a valid topological order, so no cycle detection is needed.
#[derive(Debug, Clone)]
pub struct Graph {
  /// File name -> producer.
  producers: HashMap<String, Producer>,
  /// File name -> jobs reading it, in declaration order.
  consumers: HashMap<String, Vec<usize>>,
  /// Job -> jobs it reads from.
  upstream: Vec<Vec<usize>>,
  /// Job -> jobs reading from it.
  downstream: Vec<Vec<usize>>,
  /// Jobs that only read imported files.
  entry_points: Vec<usize>,
  /// Job outputs no other job reads, in declaration order.
  final_outputs: Vec<String>,
}

impl Graph {
  /// Build a graph from imported files and jobs.
  ///
  /// Inputs that name no known file are ignored; a validated pipeline never
  /// has any.
  pub fn new(imported_files: &[ImportedFile], jobs: &[Job]) -> Self {
    let mut producers: HashMap<String, Producer> = HashMap::new();
    let mut consumers: HashMap<String, Vec<usize>> = HashMap::new();
    let mut upstream: Vec<Vec<usize>> = vec![Vec::new(); jobs.len()];
    let mut downstream: Vec<Vec<usize>> = vec![Vec::new(); jobs.len()];

    for file in imported_files {
      producers.insert(file.fname.clone(), Producer::Imported);
    }

    for (index, job) in jobs.iter().enumerate() {
      for input in &job.inputs {
        let readers = consumers.entry(input.fname.clone()).or_default();
        if !readers.contains(&index) {
          readers.push(index);
        }

        if let Some(Producer::Job(producer)) = producers.get(&input.fname).copied() {
          if !upstream[index].contains(&producer) {
            upstream[index].push(producer);
          }
          if !downstream[producer].contains(&index) {
            downstream[producer].push(index);
          }
        }
      }

      for output in &job.outputs {
        producers.insert(output.fname.clone(), Producer::Job(index));
      }
    }

    let entry_points: Vec<usize> = (0..jobs.len())
      .filter(|index| upstream[*index].is_empty())
      .collect();

    let final_outputs: Vec<String> = jobs
      .iter()
      .flat_map(|job| job.outputs.iter())
      .filter(|output| !consumers.contains_key(&output.fname))
      .map(|output| output.fname.clone())
      .collect();

    Self {
      producers,
      consumers,
      upstream,
      downstream,
      entry_points,
      final_outputs,
    }
  }

  /// Number of jobs in the graph.
  pub fn job_count(&self) -> usize {
    self.upstream.len()
  }

  /// Get the producer of a file.
  pub fn producer(&self, fname: &str) -> Option<Producer> {
    self.producers.get(fname).copied()
  }

  /// Get the jobs reading a file.
  pub fn consumers(&self, fname: &str) -> &[usize] {
    self
      .consumers
      .get(fname)
      .map(|v| v.as_slice())
      .unwrap_or(&[])
  }

  /// Get the jobs a job depends on.
  pub fn upstream(&self, job: usize) -> &[usize] {
    self.upstream.get(job).map(|v| v.as_slice()).unwrap_or(&[])
  }

  /// Get the jobs depending on a job.
  pub fn downstream(&self, job: usize) -> &[usize] {
    self
      .downstream
      .get(job)
      .map(|v| v.as_slice())
      .unwrap_or(&[])
  }

  /// Get entry points (jobs with no upstream jobs).
  pub fn entry_points(&self) -> &[usize] {
    &self.entry_points
  }

  /// Get job outputs that no job consumes.
  pub fn final_outputs(&self) -> &[String] {
    &self.final_outputs
  }
}
