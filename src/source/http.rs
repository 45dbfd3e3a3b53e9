//! HTTP status fetcher.
//!
//! Issues a single `GET` against the backend's status endpoint and decodes
//! the JSON body into a [`StatusSnapshot`].
//!
//! ## Example
//!
//! ```rust,no_run
//! use statuswatch::{HttpFetcher, StatusFetcher};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let fetcher = HttpFetcher::builder()
//!         .endpoint("http://localhost:8000")
//!         .path("/api/status")
//!         .timeout(Duration::from_secs(5))
//!         .build()?;
//!
//!     let snapshot = fetcher.fetch().await?;
//!     println!("{} ({}s up)", snapshot.status, snapshot.uptime_seconds);
//!     Ok(())
//! }
//! ```

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use super::{FetchError, StatusFetcher, StatusSnapshot};

/// Default status path appended to the endpoint.
pub const DEFAULT_STATUS_PATH: &str = "/api/status";

/// Fetches status snapshots over HTTP.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    url: String,
    key: String,
    description: String,
}

impl HttpFetcher {
    /// Create a new builder for configuring the fetcher.
    pub fn builder() -> HttpFetcherBuilder {
        HttpFetcherBuilder::default()
    }

    /// The full URL being polled.
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl StatusFetcher for HttpFetcher {
    async fn fetch(&self) -> Result<StatusSnapshot, FetchError> {
        debug!(url = %self.url, "fetching status");

        let response = self.client.get(&self.url).send().await?;

        if !response.status().is_success() {
            return Err(FetchError::Http(format!(
                "API returned status {}",
                response.status()
            )));
        }

        // Read the body first so that decode failures surface as parse errors
        // rather than generic transport errors.
        let body = response.bytes().await?;
        let snapshot = serde_json::from_slice(&body)?;
        Ok(snapshot)
    }

    fn endpoint(&self) -> &str {
        &self.key
    }

    fn description(&self) -> &str {
        &self.description
    }
}

/// Builder for [`HttpFetcher`].
#[derive(Debug, Default)]
pub struct HttpFetcherBuilder {
    endpoint: Option<String>,
    path: Option<String>,
    timeout: Option<Duration>,
}

impl HttpFetcherBuilder {
    /// Set the API base URL (e.g., "http://localhost:8000").
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the status path (default: "/api/status").
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Set the request timeout (default: 10 seconds).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the fetcher.
    pub fn build(self) -> Result<HttpFetcher, FetchError> {
        let timeout = self.timeout.unwrap_or(Duration::from_secs(10));

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Connection(format!("Failed to build HTTP client: {}", e)))?;

        let endpoint = self.endpoint.unwrap_or_else(|| "http://localhost:8000".to_string());
        let path = self.path.unwrap_or_else(|| DEFAULT_STATUS_PATH.to_string());
        let url = join_url(&endpoint, &path);

        Ok(HttpFetcher {
            client,
            description: format!("http: {}", url),
            key: format!("GET {}", path_part(&path)),
            url,
        })
    }
}

/// Join a base URL and a path without doubling or dropping the slash.
fn join_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    if path.is_empty() {
        base.to_string()
    } else {
        format!("{}/{}", base, path)
    }
}

fn path_part(path: &str) -> String {
    format!("/{}", path.trim_start_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve exactly one HTTP response on a random local port.
    async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 1024];
            let _ = socket.read(&mut buf).await;
            let response = format!(
                "{}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        });

        format!("http://{}", addr)
    }

    #[test]
    fn test_builder_defaults() {
        let fetcher = HttpFetcher::builder().build().unwrap();
        assert_eq!(fetcher.url(), "http://localhost:8000/api/status");
        assert_eq!(fetcher.endpoint(), "GET /api/status");
        assert_eq!(fetcher.description(), "http: http://localhost:8000/api/status");
    }

    #[test]
    fn test_builder_custom() {
        let fetcher = HttpFetcher::builder()
            .endpoint("https://api.example.com/")
            .path("health")
            .timeout(Duration::from_secs(2))
            .build()
            .unwrap();

        assert_eq!(fetcher.url(), "https://api.example.com/health");
        assert_eq!(fetcher.endpoint(), "GET /health");
    }

    #[test]
    fn test_join_url() {
        assert_eq!(join_url("http://a", "/b"), "http://a/b");
        assert_eq!(join_url("http://a/", "b"), "http://a/b");
        assert_eq!(join_url("http://a/", ""), "http://a");
    }

    #[tokio::test]
    async fn test_fetch_success() {
        let base = serve_once(
            "HTTP/1.1 200 OK",
            r#"{"status":"healthy","uptimeSeconds":120,"modules":{"session":"active"}}"#,
        )
        .await;

        let fetcher = HttpFetcher::builder().endpoint(base).build().unwrap();
        let snapshot = fetcher.fetch().await.unwrap();

        assert_eq!(snapshot.status, "healthy");
        assert_eq!(snapshot.uptime_seconds, 120);
        assert_eq!(snapshot.module_status("session"), Some("active"));
    }

    #[tokio::test]
    async fn test_fetch_http_error_status() {
        let base = serve_once("HTTP/1.1 503 Service Unavailable", "{}").await;

        let fetcher = HttpFetcher::builder().endpoint(base).build().unwrap();
        let err = fetcher.fetch().await.unwrap_err();

        assert!(matches!(err, FetchError::Http(_)));
        assert!(err.message().contains("503"));
    }

    #[tokio::test]
    async fn test_fetch_invalid_body() {
        let base = serve_once("HTTP/1.1 200 OK", "not json").await;

        let fetcher = HttpFetcher::builder().endpoint(base).build().unwrap();
        let err = fetcher.fetch().await.unwrap_err();

        assert!(matches!(err, FetchError::Parse(_)));
    }

    #[tokio::test]
    async fn test_fetch_connection_refused() {
        // Bind then drop to get a port nobody listens on
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let fetcher = HttpFetcher::builder()
            .endpoint(format!("http://{}", addr))
            .timeout(Duration::from_secs(2))
            .build()
            .unwrap();
        let err = fetcher.fetch().await.unwrap_err();

        assert!(matches!(err, FetchError::Connection(_) | FetchError::Http(_)));
    }
}
