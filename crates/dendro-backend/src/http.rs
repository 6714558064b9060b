use async_trait::async_trait;
use dendro_config::Metadata;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use tracing::debug;
use url::Url;

use crate::backend::{ExecutionBackend, JobHandle, ProjectHandle, SubmitJobRequest};
use crate::config::BackendConfig;
use crate::error::BackendError;

/// Execution backend reached over a JSON HTTP API.
///
/// Endpoints, relative to the configured base url:
/// ```text
/// GET  api/projects/{project_id}                  -> { projectId, name }
/// PUT  api/projects/{project_id}/files            <- { fileName, url, metadata }
/// POST api/projects/{project_id}/jobs             <- SubmitJobRequest -> { jobId }
/// PUT  api/projects/{project_id}/files/metadata   <- { fileName, metadata }
/// ```
pub struct HttpBackend {
  client: Client,
  base_url: Url,
  api_key: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RegisterFileBody<'a> {
  file_name: &'a str,
  url: &'a str,
  metadata: &'a Metadata,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FileMetadataBody<'a> {
  file_name: &'a str,
  metadata: &'a Metadata,
}

impl HttpBackend {
  /// Create a backend client from connection settings.
  pub fn new(config: BackendConfig) -> Result<Self, BackendError> {
    let base_url = Url::parse(&config.base_url).map_err(|e| BackendError::InvalidUrl {
      url: config.base_url.clone(),
      message: e.to_string(),
    })?;
    if base_url.cannot_be_a_base() {
      return Err(BackendError::InvalidUrl {
        url: config.base_url,
        message: "url cannot be used as a base".to_string(),
      });
    }

    let client = Client::builder().timeout(config.timeout).build()?;

    Ok(Self {
      client,
      base_url,
      api_key: config.api_key,
    })
  }

  /// Build an endpoint url from path segments under the base url.
  ///
  /// Segments are percent-encoded, so project ids cannot escape their slot.
  fn endpoint(&self, segments: &[&str]) -> Url {
    let mut url = self.base_url.clone();
    // cannot_be_a_base was rejected in new()
    if let Ok(mut path) = url.path_segments_mut() {
      path.pop_if_empty().extend(segments);
    }
    url
  }

  fn request(&self, method: Method, url: Url) -> RequestBuilder {
    let request = self.client.request(method, url);
    match &self.api_key {
      Some(key) => request.bearer_auth(key),
      None => request,
    }
  }

  /// Turn a non-success response into an error, keeping the body for context.
  async fn check(response: Response) -> Result<Response, BackendError> {
    let status = response.status();
    if status.is_success() {
      return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(BackendError::Status {
      status: status.as_u16(),
      body,
    })
  }
}

#[async_trait]
impl ExecutionBackend for HttpBackend {
  async fn resolve_project(&self, project_id: &str) -> Result<ProjectHandle, BackendError> {
    let url = self.endpoint(&["api", "projects", project_id]);
    debug!(%url, "resolving project");

    let response = self.request(Method::GET, url).send().await?;
    if response.status() == StatusCode::NOT_FOUND {
      return Err(BackendError::ProjectNotFound {
        project_id: project_id.to_string(),
      });
    }

    let project = Self::check(response).await?.json::<ProjectHandle>().await?;
    Ok(project)
  }

  async fn register_file(
    &self,
    project: &ProjectHandle,
    file_name: &str,
    url: &str,
    metadata: &Metadata,
  ) -> Result<(), BackendError> {
    let endpoint = self.endpoint(&["api", "projects", &project.project_id, "files"]);
    debug!(url = %endpoint, file_name, "registering file");

    let body = RegisterFileBody {
      file_name,
      url,
      metadata,
    };
    let response = self.request(Method::PUT, endpoint).json(&body).send().await?;
    Self::check(response).await?;
    Ok(())
  }

  async fn submit_job(
    &self,
    project: &ProjectHandle,
    request: SubmitJobRequest,
  ) -> Result<JobHandle, BackendError> {
    let url = self.endpoint(&["api", "projects", &project.project_id, "jobs"]);
    debug!(%url, processor = %request.processor_name, "submitting job");

    let response = self.request(Method::POST, url).json(&request).send().await?;
    let job = Self::check(response).await?.json::<JobHandle>().await?;
    Ok(job)
  }

  async fn set_file_metadata(
    &self,
    project: &ProjectHandle,
    file_name: &str,
    metadata: &Metadata,
  ) -> Result<(), BackendError> {
    let url = self.endpoint(&["api", "projects", &project.project_id, "files", "metadata"]);
    debug!(%url, file_name, "setting file metadata");

    let body = FileMetadataBody {
      file_name,
      metadata,
    };
    let response = self.request(Method::PUT, url).json(&body).send().await?;
    Self::check(response).await?;
    Ok(())
  }
}
