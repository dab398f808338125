// Adapters layer: concrete manifest sources behind the ManifestSource seam.

use crate::domain::ports::ManifestSource;
use crate::utils::error::{LintError, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct LocalManifestSource {
    path: PathBuf,
}

impl LocalManifestSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ManifestSource for LocalManifestSource {
    async fn fetch(&self) -> Result<String> {
        let content = tokio::fs::read_to_string(&self.path).await?;
        Ok(content)
    }

    fn origin(&self) -> String {
        self.path.display().to_string()
    }
}

#[derive(Debug, Clone)]
pub struct HttpManifestSource {
    url: String,
    client: reqwest::Client,
}

impl HttpManifestSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let url = url.into();
        crate::utils::validation::validate_url("manifest", &url)?;
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { url, client })
    }
}

#[async_trait]
impl ManifestSource for HttpManifestSource {
    async fn fetch(&self) -> Result<String> {
        tracing::debug!("Fetching manifest from {}", self.url);
        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(LintError::RemoteFetchError {
                url: self.url.clone(),
                status: status.as_u16(),
            });
        }

        Ok(response.text().await?)
    }

    fn origin(&self) -> String {
        self.url.clone()
    }
}

/// Dispatch on the location string: http(s) URLs fetch remotely,
/// everything else is a local path.
pub fn source_for(location: &str, timeout: Duration) -> Result<Box<dyn ManifestSource>> {
    if location.contains("://") {
        // validate_url rejects anything that is not http(s)
        Ok(Box::new(HttpManifestSource::new(location, timeout)?))
    } else {
        Ok(Box::new(LocalManifestSource::new(location)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_local_source_reads_file() {
        let mut temp_file = tempfile::NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"services:\n  redis:\n    image: redis:6.0.10-alpine\n")
            .unwrap();

        let source = LocalManifestSource::new(temp_file.path());
        let content = source.fetch().await.unwrap();
        assert!(content.contains("redis"));
        assert_eq!(source.origin(), temp_file.path().display().to_string());
    }

    #[tokio::test]
    async fn test_local_source_missing_file_is_io_error() {
        let source = LocalManifestSource::new("/nonexistent/compose.yml");
        let err = source.fetch().await.unwrap_err();
        assert!(matches!(err, LintError::IoError(_)));
    }

    #[test]
    fn test_source_dispatch() {
        let local = source_for("./docker-compose.yml", Duration::from_secs(5)).unwrap();
        assert_eq!(local.origin(), "./docker-compose.yml");

        let remote = source_for("https://example.com/stack.yml", Duration::from_secs(5)).unwrap();
        assert_eq!(remote.origin(), "https://example.com/stack.yml");

        assert!(source_for("ftp://example.com/stack.yml", Duration::from_secs(5)).is_err());
    }
}
