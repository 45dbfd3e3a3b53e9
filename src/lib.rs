// Library crate: public API items may not be used by the binary
#![allow(unused)]

//! # statuswatch
//!
//! A terminal status panel and library for watching a backend's health
//! endpoint.
//!
//! The panel polls a status API on a fixed interval, shows the derived
//! health of the backend and its modules, keeps the last good snapshot on
//! screen when a poll fails, and records the latest outcome of every call
//! for a debug view.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                         Application                          │
//! │  ┌───────────┐  tick  ┌──────────┐  fetch  ┌───────────────┐ │
//! │  │ scheduler │───────▶│  panel   │────────▶│    source     │ │
//! │  │ (interval)│        │ (state)  │◀────────│ Http | File   │ │
//! │  └───────────┘        └────┬─────┘  events └───────────────┘ │
//! │                            │                                 │
//! │                            ▼                                 │
//! │                      ┌──────────┐      ┌──────┐             │
//! │                      │   data   │─────▶│  ui  │──▶ Terminal │
//! │                      │(derived) │      │      │             │
//! │                      └──────────┘      └──────┘             │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`source`]**: Status fetching ([`StatusFetcher`] trait) with an HTTP
//!   implementation and a file-backed one for offline use
//! - **[`scheduler`]**: [`PollingScheduler`], a stoppable fixed-interval timer
//! - **[`panel`]**: [`Panel`], the state the UI shows, updated from poll events
//! - **[`data`]**: Pure derivations (uptime, megabytes, severity) and the
//!   per-endpoint [`CallLog`]
//! - **[`ui`]**: Terminal rendering using ratatui
//! - **[`config`]**: Layered [`Settings`] from defaults, file, and environment
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Watch a local backend
//! statuswatch --api-url http://localhost:8000
//!
//! # Inspect a saved payload
//! statuswatch --file status.json
//! ```
//!
//! ### As a library
//!
//! ```no_run
//! use std::sync::Arc;
//! use statuswatch::{HttpFetcher, Panel, Settings};
//!
//! # fn main() -> anyhow::Result<()> {
//! # let rt = tokio::runtime::Runtime::new()?;
//! # let _guard = rt.enter();
//! let settings = Settings::default();
//! let fetcher = HttpFetcher::builder().endpoint(&settings.api_url).build()?;
//!
//! let mut panel = Panel::new(Arc::new(fetcher), settings);
//! panel.start()?;
//!
//! // Later, on the UI thread
//! panel.drain_events();
//! if let Some(snapshot) = &panel.snapshot {
//!     println!("{}", snapshot.status);
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod data;
pub mod events;
pub mod panel;
pub mod scheduler;
pub mod source;
pub mod ui;

// Re-export main types for convenience
pub use config::{Environment, Settings};
pub use data::{format_bytes, format_uptime, CallLog, CallLogEntry, CallOutcome, Severity};
pub use panel::{Panel, PollEvent};
pub use scheduler::{
    PollingScheduler, SchedulerError, SchedulerState, StopSignal, DEFAULT_POLL_INTERVAL,
};
pub use source::{
    FetchError, FileFetcher, HttpFetcher, HttpFetcherBuilder, MemoryUsage, PerformanceMetrics,
    StatusFetcher, StatusSnapshot,
};
