//! Pure derivations from a status snapshot to display values.
//!
//! Nothing in here touches panel state; every function maps a snapshot (or
//! part of one) to something the UI or the export can show directly.

use std::fmt;

use serde_json::json;

use crate::source::{PerformanceMetrics, StatusSnapshot, KNOWN_MODULES, UNKNOWN_STATUS};

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Severity bucket for a free-form status label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Success,
    Warning,
    Error,
    Default,
}

impl Severity {
    /// Classify a status label, ignoring case and surrounding whitespace.
    ///
    /// `healthy`, `active` and `running` are successes; `warning` is a
    /// warning; `error` and `failed` are errors; anything else falls into
    /// [`Severity::Default`].
    pub fn classify(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "healthy" | "active" | "running" => Severity::Success,
            "warning" => Severity::Warning,
            "error" | "failed" => Severity::Error,
            _ => Severity::Default,
        }
    }

    /// Returns a short symbol for display.
    pub fn symbol(&self) -> &'static str {
        match self {
            Severity::Success => "OK",
            Severity::Warning => "WARN",
            Severity::Error => "ERR",
            Severity::Default => "--",
        }
    }
}

/// Uptime split into whole hours and remaining whole minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Uptime {
    pub hours: u64,
    pub minutes: u64,
}

impl fmt::Display for Uptime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}h {}m", self.hours, self.minutes)
    }
}

/// Split `seconds` into hours and minutes; leftover seconds are dropped.
pub fn format_uptime(seconds: u64) -> Uptime {
    Uptime {
        hours: seconds / 3600,
        minutes: (seconds % 3600) / 60,
    }
}

/// Bytes as megabytes with exactly one fractional digit (`"1.5"`).
pub fn format_bytes(bytes: u64) -> String {
    format!("{:.1}", bytes as f64 / BYTES_PER_MB)
}

/// Average response time, or `"n/a"` when metrics are not available yet.
pub fn format_response_time(perf: Option<&PerformanceMetrics>) -> String {
    match perf {
        Some(p) => format!("{:.0}ms", p.avg_response_time),
        None => "n/a".to_string(),
    }
}

/// Total request count, or `"n/a"` when metrics are not available yet.
pub fn format_total_requests(perf: Option<&PerformanceMetrics>) -> String {
    match perf {
        Some(p) => p.total_requests.to_string(),
        None => "n/a".to_string(),
    }
}

/// Active session count, or `"n/a"` when metrics are not available yet.
pub fn format_active_sessions(perf: Option<&PerformanceMetrics>) -> String {
    match perf {
        Some(p) => p.active_sessions.to_string(),
        None => "n/a".to_string(),
    }
}

/// One line of the module health table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleRow {
    pub name: String,
    pub status: String,
    pub severity: Severity,
}

/// Module rows for display.
///
/// The known modules always come first in their fixed order, reported as
/// `"unknown"` when missing from the snapshot. Any other modules the backend
/// sends follow in name order.
pub fn module_rows(snapshot: &StatusSnapshot) -> Vec<ModuleRow> {
    let known = KNOWN_MODULES.iter().map(|name| {
        let status = snapshot.module_status(name).unwrap_or(UNKNOWN_STATUS);
        (name.to_string(), status.to_string())
    });

    let extra = snapshot
        .modules
        .iter()
        .filter(|(name, _)| !KNOWN_MODULES.contains(&name.as_str()))
        .map(|(name, status)| (name.clone(), status.clone()));

    known
        .chain(extra)
        .map(|(name, status)| ModuleRow {
            severity: Severity::classify(&status),
            name,
            status,
        })
        .collect()
}

/// Build a JSON report of every derived display value.
pub fn build_report(snapshot: &StatusSnapshot) -> serde_json::Value {
    let uptime = format_uptime(snapshot.uptime_seconds);
    let perf = snapshot.performance.as_ref();
    let memory = &snapshot.memory_usage;

    let modules: Vec<serde_json::Value> = module_rows(snapshot)
        .iter()
        .map(|row| {
            json!({
                "name": row.name,
                "status": row.status,
                "severity": format!("{:?}", row.severity),
            })
        })
        .collect();

    json!({
        "status": snapshot.status,
        "severity": format!("{:?}", Severity::classify(&snapshot.status)),
        "uptime": {
            "hours": uptime.hours,
            "minutes": uptime.minutes,
            "display": uptime.to_string(),
        },
        "memory_mb": {
            "rss": format_bytes(memory.rss),
            "heap_used": format_bytes(memory.heap_used),
            "heap_total": format_bytes(memory.heap_total),
            "external": format_bytes(memory.external),
        },
        "performance": perf.map(|p| json!({
            "avg_response_time_ms": p.avg_response_time,
            "total_requests": p.total_requests,
            "active_sessions": p.active_sessions,
        })),
        "modules": modules,
    })
}
