//! Derived data for display.
//!
//! This module turns raw status snapshots into values the panel shows, and
//! keeps the latest outcome of each status call.
//!
//! ## Submodules
//!
//! - [`call_log`]: Latest-outcome-per-endpoint log ([`CallLog`])
//! - [`duration`]: Parsing and formatting of duration strings (e.g., "30s", "500ms")
//! - [`present`]: Pure derivations ([`format_uptime`], [`format_bytes`], [`Severity`])
//!
//! ## Data Flow
//!
//! ```text
//! StatusSnapshot (raw JSON)
//!        │
//!        ├──▶ present::* (uptime, MB, severity, module rows)
//!        │
//!        └──▶ CallLog::record_at() (debug view)
//! ```

pub mod call_log;
pub mod duration;
pub mod present;

pub use call_log::{CallLog, CallLogEntry, CallOutcome};
pub use present::{
    build_report, format_active_sessions, format_bytes, format_response_time,
    format_total_requests, format_uptime, module_rows, ModuleRow, Severity, Uptime,
};
