//! Status sources.
//!
//! This module provides a trait-based abstraction for fetching one status
//! snapshot from the monitored backend, with an HTTP implementation for live
//! use and a file-backed one for offline inspection.

mod error;
mod file;
mod http;
mod snapshot;

pub use error::FetchError;
pub use file::FileFetcher;
pub use http::{HttpFetcher, HttpFetcherBuilder};
pub use snapshot::{
    MemoryUsage, PerformanceMetrics, StatusSnapshot, KNOWN_MODULES, UNKNOWN_STATUS,
};

use std::fmt::Debug;

use async_trait::async_trait;

/// Something that can fetch a status snapshot.
///
/// A fetch performs exactly one request and never retries; retrying is left
/// to the next scheduled poll. Implementations must normalize every failure
/// into a [`FetchError`].
///
/// # Example
///
/// ```
/// use statuswatch::{FileFetcher, StatusFetcher};
///
/// # tokio_test::block_on(async {
/// let fetcher = FileFetcher::new("status.json");
/// match fetcher.fetch().await {
///     Ok(snapshot) => println!("status: {}", snapshot.status),
///     Err(e) => println!("fetch failed: {}", e),
/// }
/// # });
/// ```
#[async_trait]
pub trait StatusFetcher: Send + Sync + Debug {
    /// Fetch the current snapshot.
    async fn fetch(&self) -> Result<StatusSnapshot, FetchError>;

    /// Stable key identifying this call in the call log.
    fn endpoint(&self) -> &str;

    /// Returns a human-readable description of the source.
    ///
    /// Used for display in the TUI status bar.
    fn description(&self) -> &str;
}
