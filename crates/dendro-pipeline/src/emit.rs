use async_trait::async_trait;

use crate::pipeline::Pipeline;

/// The finishing step of a pipeline build.
///
/// Construction and validation are the same for every pipeline; only what
/// happens to the finished graph differs. Implementations must preserve
/// declaration order.
#[async_trait]
pub trait Emitter: Send + Sync {
  type Output: Send;
  type Error: std::error::Error + Send + Sync + 'static;

  /// Emit a finished pipeline.
  async fn emit(&self, pipeline: &Pipeline) -> Result<Self::Output, Self::Error>;
}
