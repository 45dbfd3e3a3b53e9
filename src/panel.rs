//! Panel state and poll-cycle orchestration.
//!
//! The [`Panel`] owns everything the UI shows. Poll cycles run as tokio
//! tasks and report back through a channel; the panel applies their events
//! on the UI thread in [`Panel::drain_events`], so panel state is only ever
//! touched from one place and needs no locking.
//!
//! ```text
//!  PollingScheduler ──tick──▶ PollCycle::run ──▶ StatusFetcher::fetch
//!                                  │
//!         Started / Completed      │ mpsc
//!                                  ▼
//!                       Panel::drain_events ──▶ snapshot, error, call log
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use chrono::{DateTime, Local};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::config::Settings;
use crate::data::{build_report, CallLog, CallOutcome};
use crate::scheduler::{PollingScheduler, SchedulerError, SchedulerState, StopSignal};
use crate::source::{FetchError, StatusFetcher, StatusSnapshot};
use crate::ui::Theme;

/// How long a status message stays visible.
const STATUS_MESSAGE_TTL: Duration = Duration::from_secs(3);

/// Progress report from a poll cycle.
#[derive(Debug)]
pub enum PollEvent {
    /// A fetch was issued.
    Started { sequence: u64 },
    /// A fetch finished, successfully or not.
    Completed {
        sequence: u64,
        endpoint: String,
        result: Result<StatusSnapshot, FetchError>,
        completed_at: DateTime<Local>,
    },
}

/// One fetch plus its report back to the panel.
///
/// Cheap to clone; the scheduler clones one per tick and manual refreshes
/// clone another.
#[derive(Debug, Clone)]
struct PollCycle {
    fetcher: Arc<dyn StatusFetcher>,
    events: mpsc::UnboundedSender<PollEvent>,
    stop: StopSignal,
    sequence: Arc<AtomicU64>,
}

impl PollCycle {
    async fn run(self) {
        if self.stop.is_stopped() {
            return;
        }

        let sequence = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        let _ = self.events.send(PollEvent::Started { sequence });

        let result = self.fetcher.fetch().await;

        if self.stop.is_stopped() {
            debug!(sequence, "discarding poll result that arrived after teardown");
            return;
        }

        let endpoint = self.fetcher.endpoint().to_string();
        match &result {
            Ok(snapshot) => debug!(sequence, %endpoint, status = %snapshot.status, "poll succeeded"),
            Err(e) => warn!(sequence, %endpoint, error = %e, "poll failed"),
        }

        let _ = self.events.send(PollEvent::Completed {
            sequence,
            endpoint,
            result,
            completed_at: Local::now(),
        });
    }
}

/// Panel state.
pub struct Panel {
    pub running: bool,
    pub show_help: bool,
    /// Reveals the call log and connection details.
    pub debug_mode: bool,

    /// Last good snapshot. Kept when later polls fail.
    pub snapshot: Option<Arc<StatusSnapshot>>,
    pub loading: bool,
    /// Message from the most recent failed poll, cleared on success.
    pub error: Option<String>,
    pub call_log: CallLog,
    pub last_updated: Option<Instant>,

    pub settings: Settings,
    pub theme: Theme,

    // Status message (temporary feedback)
    pub status_message: Option<(String, Instant)>,

    fetcher: Arc<dyn StatusFetcher>,
    scheduler: PollingScheduler,
    events_tx: mpsc::UnboundedSender<PollEvent>,
    events_rx: mpsc::UnboundedReceiver<PollEvent>,
    sequence: Arc<AtomicU64>,
    newest_applied: Option<u64>,
}

impl Panel {
    /// Create an idle panel. Nothing is fetched until [`start`](Self::start).
    ///
    /// An unparseable `poll_interval` falls back to the 30 second default.
    pub fn new(fetcher: Arc<dyn StatusFetcher>, settings: Settings) -> Self {
        let interval = settings
            .poll_interval()
            .unwrap_or(crate::scheduler::DEFAULT_POLL_INTERVAL);
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        Self {
            running: true,
            show_help: false,
            debug_mode: false,
            snapshot: None,
            loading: false,
            error: None,
            call_log: CallLog::new(),
            last_updated: None,
            settings,
            theme: Theme::dark(),
            status_message: None,
            fetcher,
            scheduler: PollingScheduler::new(interval),
            events_tx,
            events_rx,
            sequence: Arc::new(AtomicU64::new(0)),
            newest_applied: None,
        }
    }

    fn poll_cycle(&self) -> PollCycle {
        PollCycle {
            fetcher: self.fetcher.clone(),
            events: self.events_tx.clone(),
            stop: self.scheduler.stop_signal(),
            sequence: self.sequence.clone(),
        }
    }

    /// Begin polling: one fetch now, then one per interval.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start(&mut self) -> Result<(), SchedulerError> {
        let cycle = self.poll_cycle();
        self.scheduler.start(move || cycle.clone().run())
    }

    /// Stop polling and ignore anything still in flight.
    pub fn stop(&mut self) {
        self.scheduler.stop();
        self.events_rx.close();

        let mut discarded = 0;
        while self.events_rx.try_recv().is_ok() {
            discarded += 1;
        }
        if discarded > 0 {
            debug!(discarded, "dropped poll events queued at teardown");
        }
    }

    /// Trigger an immediate poll outside the schedule.
    ///
    /// Runs alongside any scheduled poll already in flight. Returns `false`
    /// if the panel is not polling.
    pub fn refresh(&mut self) -> bool {
        if self.scheduler.state() != SchedulerState::Active {
            return false;
        }
        tokio::spawn(self.poll_cycle().run());
        true
    }

    /// Apply every poll event received so far. Returns how many were applied.
    pub fn drain_events(&mut self) -> usize {
        if self.scheduler.state() == SchedulerState::Stopped {
            return 0;
        }

        let mut applied = 0;
        while let Ok(event) = self.events_rx.try_recv() {
            self.apply(event);
            applied += 1;
        }
        applied
    }

    /// Apply one poll event to the panel state.
    ///
    /// Results are applied in completion order. A result from an older
    /// fetch that lands after a newer one still replaces the snapshot; this
    /// is logged so the overwrite is visible.
    pub fn apply(&mut self, event: PollEvent) {
        match event {
            PollEvent::Started { .. } => {
                self.loading = true;
                self.error = None;
            }
            PollEvent::Completed {
                sequence,
                endpoint,
                result,
                completed_at,
            } => {
                if let Some(newest) = self.newest_applied {
                    if sequence < newest {
                        warn!(
                            sequence,
                            newest, "older poll result is overwriting newer data"
                        );
                    }
                }
                self.newest_applied = Some(self.newest_applied.map_or(sequence, |n| n.max(sequence)));

                match result {
                    Ok(snapshot) => {
                        let snapshot = Arc::new(snapshot);
                        self.call_log.record_at(
                            &endpoint,
                            CallOutcome::Success(snapshot.clone()),
                            completed_at,
                            sequence,
                        );
                        self.snapshot = Some(snapshot);
                        self.error = None;
                        self.last_updated = Some(Instant::now());
                    }
                    Err(err) => {
                        let message = err.message();
                        self.call_log.record_at(
                            &endpoint,
                            CallOutcome::Failure(message.clone()),
                            completed_at,
                            sequence,
                        );
                        self.error = Some(message);
                    }
                }

                self.loading = false;
            }
        }
    }

    /// Current polling lifecycle state.
    pub fn lifecycle(&self) -> SchedulerState {
        self.scheduler.state()
    }

    pub fn poll_interval(&self) -> Duration {
        self.scheduler.interval()
    }

    /// Returns a description of the status source.
    pub fn source_description(&self) -> &str {
        self.fetcher.description()
    }

    /// Toggle the debug view.
    pub fn toggle_debug(&mut self) {
        self.debug_mode = !self.debug_mode;
    }

    /// Toggle the help overlay.
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Set a temporary status message that will be shown for a few seconds.
    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    /// Get the current status message if it hasn't expired.
    pub fn get_status_message(&self) -> Option<&str> {
        if let Some((msg, time)) = &self.status_message {
            if time.elapsed() < STATUS_MESSAGE_TTL {
                return Some(msg);
            }
        }
        None
    }

    /// Signal the application to quit.
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Export the derived view of the current snapshot to a JSON file.
    pub fn export_state(&self, path: &std::path::Path) -> Result<()> {
        use std::io::Write;

        let Some(ref snapshot) = self.snapshot else {
            anyhow::bail!("No data to export");
        };

        let mut export = serde_json::Map::new();
        export.insert("source".to_string(), serde_json::json!(self.source_description()));
        export.insert("environment".to_string(), serde_json::json!(self.settings.environment.label()));
        export.insert("report".to_string(), build_report(snapshot));
        export.insert("last_error".to_string(), serde_json::json!(self.error));

        let calls: Vec<serde_json::Value> = self
            .call_log
            .entries()
            .map(|(endpoint, entry)| {
                let error = match &entry.outcome {
                    CallOutcome::Failure(msg) => Some(msg.as_str()),
                    CallOutcome::Success(_) => None,
                };
                serde_json::json!({
                    "endpoint": endpoint,
                    "timestamp": entry.timestamp.to_rfc3339(),
                    "outcome": entry.outcome.label(),
                    "error": error,
                })
            })
            .collect();
        export.insert("calls".to_string(), serde_json::Value::Array(calls));

        let json = serde_json::to_string_pretty(&serde_json::Value::Object(export))?;
        let mut file = std::fs::File::create(path)?;
        file.write_all(json.as_bytes())?;

        Ok(())
    }
}

impl Drop for Panel {
    fn drop(&mut self) {
        self.stop();
    }
}
