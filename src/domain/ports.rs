use crate::utils::error::Result;
use async_trait::async_trait;

/// Where manifest text comes from: a local file, an HTTP endpoint, or a
/// test double.
#[async_trait]
pub trait ManifestSource: Send + Sync {
    async fn fetch(&self) -> Result<String>;

    /// Human-readable origin for log and report output.
    fn origin(&self) -> String;
}
