use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use dendro_backend::{BackendConfig, HttpBackend, MemoryBackend};
use dendro_pipeline::{DocumentWriter, Pipeline, read_document};
use dendro_submit::{DEFAULT_BATCH_ID_LEN, Submitter};

/// Dendro - build, check and submit processing pipelines
#[derive(Parser)]
#[command(name = "dendro")]
#[command(version, about, long_about = None)]
struct Cli {
  #[command(subcommand)]
  command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
  /// Check a pipeline document and print a summary
  Validate {
    /// Path to the pipeline document (JSON)
    pipeline_file: PathBuf,
  },

  /// Check a pipeline document and write it out in canonical form
  Write {
    /// Path to the pipeline document (JSON)
    pipeline_file: PathBuf,

    /// Where to write the canonical document
    #[arg(long, short)]
    output: PathBuf,
  },

  /// Check a pipeline document and submit it to the execution backend
  Submit {
    /// Path to the pipeline document (JSON)
    pipeline_file: PathBuf,

    /// Backend project to register files and jobs under
    #[arg(long, env = "DENDRO_PROJECT_ID")]
    project_id: String,

    /// Root url of the backend API
    #[arg(long, env = "DENDRO_API_URL", required_unless_present = "dry_run")]
    api_url: Option<String>,

    /// API key sent as a bearer token
    #[arg(long, env = "DENDRO_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 60)]
    timeout_secs: u64,

    /// Length of the generated batch id (at least 1)
    #[arg(long, default_value_t = DEFAULT_BATCH_ID_LEN)]
    batch_id_len: NonZeroUsize,

    /// Replay against an in-memory backend and print the calls instead
    #[arg(long)]
    dry_run: bool,
  },
}

fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .with_writer(std::io::stderr)
    .init();

  let cli = Cli::parse();

  match cli.command {
    Some(Commands::Validate { pipeline_file }) => {
      run(validate(pipeline_file))?;
    }
    Some(Commands::Write {
      pipeline_file,
      output,
    }) => {
      run(write(pipeline_file, output))?;
    }
    Some(Commands::Submit {
      pipeline_file,
      project_id,
      api_url,
      api_key,
      timeout_secs,
      batch_id_len,
      dry_run,
    }) => {
      let config = api_url.map(|base_url| BackendConfig {
        base_url,
        api_key,
        timeout: Duration::from_secs(timeout_secs),
      });
      run(submit(
        pipeline_file,
        project_id,
        config,
        batch_id_len,
        dry_run,
      ))?;
    }
    None => {
      println!("dendro - use --help to see available commands");
    }
  }

  Ok(())
}

fn run<F: std::future::Future<Output = Result<()>>>(future: F) -> Result<()> {
  let rt = tokio::runtime::Runtime::new()?;
  rt.block_on(future)
}

async fn load(pipeline_file: &Path) -> Result<Pipeline> {
  let pipeline = read_document(pipeline_file)
    .await
    .with_context(|| format!("failed to load pipeline: {}", pipeline_file.display()))?;

  info!(
    path = %pipeline_file.display(),
    imported_files = pipeline.imported_files().len(),
    jobs = pipeline.jobs().len(),
    "pipeline loaded"
  );
  Ok(pipeline)
}

async fn validate(pipeline_file: PathBuf) -> Result<()> {
  let pipeline = load(&pipeline_file).await?;
  let graph = pipeline.graph();

  println!("Imported files: {}", pipeline.imported_files().len());
  println!("Jobs: {}", pipeline.jobs().len());
  println!("Known files: {}", pipeline.known_files().len());
  println!("Entry jobs:");
  for index in graph.entry_points() {
    println!("  [{}] {}", index, pipeline.jobs()[*index].processor_name);
  }
  println!("Final outputs:");
  for fname in graph.final_outputs() {
    println!("  {}", fname);
  }

  Ok(())
}

async fn write(pipeline_file: PathBuf, output: PathBuf) -> Result<()> {
  let pipeline = load(&pipeline_file).await?;

  pipeline
    .emit(&DocumentWriter::new(&output))
    .await
    .with_context(|| format!("failed to write pipeline: {}", output.display()))?;

  eprintln!("Wrote {}", output.display());
  Ok(())
}

async fn submit(
  pipeline_file: PathBuf,
  project_id: String,
  config: Option<BackendConfig>,
  batch_id_len: NonZeroUsize,
  dry_run: bool,
) -> Result<()> {
  let pipeline = load(&pipeline_file).await?;

  if dry_run {
    let submitter = Submitter::new(MemoryBackend::new(), project_id).with_batch_id_len(batch_id_len);
    let report = pipeline
      .emit(&submitter)
      .await
      .context("dry-run submission failed")?;

    let calls = submitter.backend().calls().await;
    println!("{}", serde_json::to_string_pretty(&calls)?);
    eprintln!(
      "Dry run: {} calls, batch {}",
      calls.len(),
      report.batch_id
    );
    return Ok(());
  }

  let config = config.context("--api-url is required unless --dry-run is set")?;
  let backend = HttpBackend::new(config).context("failed to create backend client")?;
  let submitter = Submitter::new(backend, project_id).with_batch_id_len(batch_id_len);
  let report = pipeline
    .emit(&submitter)
    .await
    .context("pipeline submission failed")?;

  println!("{}", serde_json::to_string_pretty(&report)?);
  Ok(())
}
