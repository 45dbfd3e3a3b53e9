//! Status payload types.
//!
//! These mirror the JSON document served by the backend's status endpoint.
//! The payload is loosely typed: numbers may arrive as floats or strings,
//! whole sections may be missing, and module entries may be plain labels or
//! objects. Decoding is lenient field by field so that a single odd value
//! never turns a whole poll into a failure.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Module names the backend is expected to report, in display order.
pub const KNOWN_MODULES: [&str; 4] = ["session", "document_processor", "retrieval", "generation"];

/// Label used when the backend omits a status.
pub const UNKNOWN_STATUS: &str = "unknown";

/// One complete status payload from the monitored backend.
///
/// A snapshot is immutable once received; the next successful poll replaces
/// it wholesale. Decoding goes through a JSON object so that alias keys may
/// appear together; the first non-null one wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "Map<String, Value>")]
pub struct StatusSnapshot {
    /// Overall status label (free-form, compared case-insensitively).
    pub status: String,

    /// Seconds since the backend process started.
    pub uptime_seconds: u64,

    /// Per-module status labels, keyed by module name.
    pub modules: BTreeMap<String, String>,

    /// Process memory figures in bytes.
    pub memory_usage: MemoryUsage,

    /// Request statistics. `None` means the backend has not produced any yet,
    /// which is not the same as all-zero metrics.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub performance: Option<PerformanceMetrics>,

    /// Server-side timestamp, kept verbatim for the debug view.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl StatusSnapshot {
    /// Create a snapshot with the given overall status and nothing else.
    pub fn new(status: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            uptime_seconds: 0,
            modules: BTreeMap::new(),
            memory_usage: MemoryUsage::default(),
            performance: None,
            timestamp: None,
        }
    }

    /// Status label for a module, if the backend reported it.
    pub fn module_status(&self, name: &str) -> Option<&str> {
        self.modules.get(name).map(String::as_str)
    }
}

impl From<Map<String, Value>> for StatusSnapshot {
    fn from(map: Map<String, Value>) -> Self {
        let modules = match first(&map, &["modules"]) {
            Some(Value::Object(entries)) => entries
                .iter()
                .map(|(name, v)| (name.clone(), label_from_value(v)))
                .collect(),
            _ => BTreeMap::new(),
        };

        let performance = match first(&map, &["performance"]) {
            Some(v @ Value::Object(_)) => Some(PerformanceMetrics::from(v.clone())),
            _ => None,
        };

        let timestamp = first(&map, &["timestamp"]).map(|v| match v {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        });

        Self {
            status: first(&map, &["status"]).map_or_else(unknown_status, label_from_value),
            uptime_seconds: first(&map, &["uptimeSeconds", "uptime_seconds", "uptime"])
                .map_or(0, u64_from_value),
            modules,
            memory_usage: first(&map, &["memoryUsage", "memory_usage", "memory"])
                .cloned()
                .map(MemoryUsage::from)
                .unwrap_or_default(),
            performance,
            timestamp,
        }
    }
}

/// Memory usage of the backend process, all values in bytes.
///
/// Anything other than an object decodes to all zeros.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "Value")]
pub struct MemoryUsage {
    /// Resident set size.
    pub rss: u64,
    pub heap_used: u64,
    pub heap_total: u64,
    /// Memory held outside the managed heap.
    pub external: u64,
}

impl From<Value> for MemoryUsage {
    fn from(value: Value) -> Self {
        let Value::Object(map) = value else {
            return Self::default();
        };
        let field = |keys: &[&str]| first(&map, keys).map_or(0, u64_from_value);

        Self {
            rss: field(&["rss"]),
            heap_used: field(&["heapUsed", "heap_used"]),
            heap_total: field(&["heapTotal", "heap_total"]),
            external: field(&["external"]),
        }
    }
}

/// Request statistics reported by the backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "Value")]
pub struct PerformanceMetrics {
    /// Average response time in milliseconds.
    pub avg_response_time: f64,
    pub total_requests: u64,
    pub active_sessions: u64,
}

impl From<Value> for PerformanceMetrics {
    fn from(value: Value) -> Self {
        let Value::Object(map) = value else {
            return Self::default();
        };
        let count = |keys: &[&str]| first(&map, keys).map_or(0, u64_from_value);

        Self {
            avg_response_time: first(&map, &["avgResponseTime", "avg_response_time"])
                .and_then(f64_from_value)
                .filter(|f| f.is_finite())
                .unwrap_or(0.0),
            total_requests: count(&["totalRequests", "total_requests"]),
            active_sessions: count(&["activeSessions", "active_sessions"]),
        }
    }
}

fn unknown_status() -> String {
    UNKNOWN_STATUS.to_string()
}

/// First non-null value among `keys`.
fn first<'a>(map: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().filter_map(|key| map.get(*key)).find(|v| !v.is_null())
}

/// Accepts `"healthy"`, `{"status": "healthy"}`, or anything printable.
fn label_from_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => unknown_status(),
        Value::Object(map) => map.get("status").map(label_from_value).unwrap_or_else(unknown_status),
        other => other.to_string(),
    }
}

/// Negative, fractional, or non-numeric input degrades to a non-negative
/// integer instead of failing the whole payload.
fn u64_from_value(value: &Value) -> u64 {
    match value {
        Value::Number(n) => n.as_u64().unwrap_or_else(|| {
            n.as_f64().filter(|f| f.is_finite() && *f > 0.0).map_or(0, |f| f.floor() as u64)
        }),
        Value::String(_) => f64_from_value(value)
            .filter(|f| f.is_finite() && *f > 0.0)
            .map_or(0, |f| f.floor() as u64),
        _ => 0,
    }
}

fn f64_from_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
