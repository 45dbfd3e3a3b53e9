//! Latest-outcome log of status calls, keyed by endpoint.

use std::sync::Arc;

use chrono::{DateTime, Local};

use crate::source::StatusSnapshot;

/// Result of one call, as remembered by the log.
#[derive(Debug, Clone, PartialEq)]
pub enum CallOutcome {
    /// The call returned a snapshot.
    Success(Arc<StatusSnapshot>),
    /// The call failed with this message.
    Failure(String),
}

impl CallOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, CallOutcome::Success(_))
    }

    /// Short label for display.
    pub fn label(&self) -> &'static str {
        match self {
            CallOutcome::Success(_) => "OK",
            CallOutcome::Failure(_) => "FAIL",
        }
    }
}

/// The most recent outcome for one endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct CallLogEntry {
    /// When the call completed.
    pub timestamp: DateTime<Local>,
    pub outcome: CallOutcome,
    /// Issue order of the poll cycle that produced this entry.
    pub sequence: u64,
}

/// A fixed-size mapping from endpoint key to its latest outcome.
///
/// Recording a call for a key that is already present overwrites the entry
/// in place, so the log holds one slot per distinct endpoint and iteration
/// order is the order in which keys were first seen.
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    entries: Vec<(String, CallLogEntry)>,
}

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an outcome for `endpoint`, timestamped now.
    pub fn record(&mut self, endpoint: &str, outcome: CallOutcome) {
        self.record_at(endpoint, outcome, Local::now(), 0);
    }

    /// Record an outcome with an explicit completion time and sequence.
    pub fn record_at(
        &mut self,
        endpoint: &str,
        outcome: CallOutcome,
        timestamp: DateTime<Local>,
        sequence: u64,
    ) {
        let entry = CallLogEntry {
            timestamp,
            outcome,
            sequence,
        };

        // Linear scan: the panel only ever talks to a handful of endpoints
        match self.entries.iter_mut().find(|(key, _)| key == endpoint) {
            Some((_, slot)) => *slot = entry,
            None => self.entries.push((endpoint.to_string(), entry)),
        }
    }

    /// Latest entry for `endpoint`.
    pub fn get(&self, endpoint: &str) -> Option<&CallLogEntry> {
        self.entries.iter().find(|(key, _)| key == endpoint).map(|(_, entry)| entry)
    }

    /// All entries in first-seen order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &CallLogEntry)> {
        self.entries.iter().map(|(key, entry)| (key.as_str(), entry))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
