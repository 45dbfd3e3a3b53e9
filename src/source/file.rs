//! File-based status fetcher.
//!
//! Reads a JSON status snapshot from disk on every fetch. Useful for
//! inspecting a saved payload or driving the panel without a live backend.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::{FetchError, StatusFetcher, StatusSnapshot};

/// A fetcher that reads the status snapshot from a JSON file.
///
/// Unlike a change-watching source, every fetch re-reads the file so each
/// poll produces a fresh snapshot (or a fresh error).
#[derive(Debug)]
pub struct FileFetcher {
    path: PathBuf,
    key: String,
    description: String,
}

impl FileFetcher {
    /// Create a new file fetcher for the given path.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let description = format!("file: {}", path.display());
        let key = format!("FILE {}", path.display());
        Self {
            path,
            key,
            description,
        }
    }

    /// Returns the path being read.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl StatusFetcher for FileFetcher {
    async fn fetch(&self) -> Result<StatusSnapshot, FetchError> {
        let content = tokio::fs::read_to_string(&self.path).await?;
        let snapshot = serde_json::from_str(&content)?;
        Ok(snapshot)
    }

    fn endpoint(&self) -> &str {
        &self.key
    }

    fn description(&self) -> &str {
        &self.description
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Seek, Write};
    use tempfile::NamedTempFile;

    fn sample_json() -> &'static str {
        r#"{
            "status": "healthy",
            "uptimeSeconds": 7200,
            "modules": { "retrieval": "running" }
        }"#
    }

    #[test]
    fn test_file_fetcher_new() {
        let fetcher = FileFetcher::new("/tmp/status.json");
        assert_eq!(fetcher.path(), Path::new("/tmp/status.json"));
        assert_eq!(fetcher.description(), "file: /tmp/status.json");
        assert_eq!(fetcher.endpoint(), "FILE /tmp/status.json");
    }

    #[tokio::test]
    async fn test_file_fetcher_reads_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", sample_json()).unwrap();

        let fetcher = FileFetcher::new(file.path());
        let snapshot = fetcher.fetch().await.unwrap();
        assert_eq!(snapshot.status, "healthy");
        assert_eq!(snapshot.uptime_seconds, 7200);

        // Every fetch re-reads, even without changes
        let again = fetcher.fetch().await.unwrap();
        assert_eq!(again, snapshot);
    }

    #[tokio::test]
    async fn test_file_fetcher_sees_rewrites() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", sample_json()).unwrap();

        let fetcher = FileFetcher::new(file.path());
        let _ = fetcher.fetch().await.unwrap();

        file.as_file_mut().set_len(0).unwrap();
        file.rewind().unwrap();
        writeln!(file, r#"{{"status":"error"}}"#).unwrap();
        file.flush().unwrap();

        let snapshot = fetcher.fetch().await.unwrap();
        assert_eq!(snapshot.status, "error");
    }

    #[tokio::test]
    async fn test_file_fetcher_missing_file() {
        let fetcher = FileFetcher::new("/nonexistent/path/status.json");

        let err = fetcher.fetch().await.unwrap_err();
        assert!(matches!(err, FetchError::Io(_)));
        assert!(err.message().contains("Read error"));
    }

    #[tokio::test]
    async fn test_file_fetcher_invalid_json() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "not valid json").unwrap();

        let fetcher = FileFetcher::new(file.path());

        let err = fetcher.fetch().await.unwrap_err();
        assert!(matches!(err, FetchError::Parse(_)));
        assert!(err.message().contains("Failed to parse"));
    }
}
