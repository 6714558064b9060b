use std::time::Duration;

/// Connection settings for [`HttpBackend`](crate::HttpBackend).
#[derive(Debug, Clone)]
pub struct BackendConfig {
  /// Root of the backend API, e.g. "https://dendro.example.org"
  pub base_url: String,

  /// Sent as a bearer token when present.
  pub api_key: Option<String>,

  /// Applied to every request.
  pub timeout: Duration,
}

impl BackendConfig {
  pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

  pub fn new(base_url: impl Into<String>) -> Self {
    Self {
      base_url: base_url.into(),
      api_key: None,
      timeout: Self::DEFAULT_TIMEOUT,
    }
  }
}
