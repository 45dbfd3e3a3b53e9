//! Fixed-interval polling.
//!
//! [`PollingScheduler`] runs an async action once immediately when started
//! and then on every tick of a wall-clock interval until it is stopped.
//! Each invocation is spawned as its own task, so a slow invocation never
//! delays the next tick and several may be in flight at once.
//!
//! ```text
//!   start()            tick            tick            stop()
//!  ───┬──────────────────┬───────────────┬───────────────┬──────────▶ time
//!     │                  │               │               │
//!     ▼                  ▼               ▼               ╳ no more ticks
//!   action()          action()        action()
//! ```

use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

/// Default polling period.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(30_000);

/// Lifecycle of a scheduler. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// Created but never started.
    Idle,
    /// Timer armed; the action runs on every tick.
    Active,
    /// Timer cancelled. A stopped scheduler cannot be restarted.
    Stopped,
}

/// Errors from scheduler lifecycle calls.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchedulerError {
    #[error("cannot start a scheduler that is {0:?}")]
    InvalidTransition(SchedulerState),
}

/// Read-only view of whether a scheduler has been stopped.
///
/// Handed to in-flight work so it can drop results that arrive after
/// teardown.
#[derive(Debug, Clone)]
pub struct StopSignal {
    rx: watch::Receiver<bool>,
}

impl StopSignal {
    pub fn is_stopped(&self) -> bool {
        *self.rx.borrow()
    }
}

/// Drives an async action on a fixed interval.
///
/// The scheduler owns its timer task: calling [`stop`](Self::stop) or
/// dropping the scheduler cancels it. Invocations already running are not
/// cancelled; use [`stop_signal`](Self::stop_signal) to detect teardown
/// from inside them.
///
/// # Example
///
/// ```rust,no_run
/// use std::time::Duration;
/// use statuswatch::PollingScheduler;
///
/// #[tokio::main]
/// async fn main() {
///     let mut scheduler = PollingScheduler::new(Duration::from_secs(30));
///     scheduler
///         .start(|| async { println!("poll") })
///         .expect("fresh scheduler");
///
///     tokio::time::sleep(Duration::from_secs(65)).await;
///     scheduler.stop(); // printed "poll" three times
/// }
/// ```
#[derive(Debug)]
pub struct PollingScheduler {
    interval: Duration,
    state: SchedulerState,
    stop_tx: watch::Sender<bool>,
}

impl PollingScheduler {
    /// Create an idle scheduler. A zero interval is raised to one millisecond.
    pub fn new(interval: Duration) -> Self {
        let (stop_tx, _) = watch::channel(false);
        Self {
            interval: interval.max(Duration::from_millis(1)),
            state: SchedulerState::Idle,
            stop_tx,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    /// Signal that flips once this scheduler is stopped.
    pub fn stop_signal(&self) -> StopSignal {
        StopSignal {
            rx: self.stop_tx.subscribe(),
        }
    }

    /// Start polling: run `action` now and then on every interval tick.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start<F, Fut>(&mut self, action: F) -> Result<(), SchedulerError>
    where
        F: Fn() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        if self.state != SchedulerState::Idle {
            return Err(SchedulerError::InvalidTransition(self.state));
        }

        let mut stop_rx = self.stop_tx.subscribe();
        let period = self.interval;

        tokio::spawn(async move {
            // The first tick completes immediately
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Burst);

            loop {
                tokio::select! {
                    biased;

                    changed = stop_rx.changed() => {
                        if changed.is_err() || *stop_rx.borrow() {
                            break;
                        }
                    }
                    _ = ticker.tick() => {
                        if *stop_rx.borrow() {
                            break;
                        }
                        tokio::spawn(action());
                    }
                }
            }

            debug!("poll timer cancelled");
        });

        self.state = SchedulerState::Active;
        info!(interval_ms = period.as_millis() as u64, "polling started");
        Ok(())
    }

    /// Cancel the timer. Safe to call more than once.
    pub fn stop(&mut self) {
        if self.state == SchedulerState::Stopped {
            return;
        }
        self.stop_tx.send_replace(true);
        if self.state == SchedulerState::Active {
            info!("polling stopped");
        }
        self.state = SchedulerState::Stopped;
    }
}

impl Drop for PollingScheduler {
    fn drop(&mut self) {
        self.stop_tx.send_replace(true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    const PERIOD: Duration = Duration::from_secs(30);

    /// Let spawned tasks run without moving the paused clock.
    async fn settle() {
        for _ in 0..16 {
            tokio::task::yield_now().await;
        }
    }

    fn counting_scheduler(count: &Arc<AtomicUsize>) -> PollingScheduler {
        let mut scheduler = PollingScheduler::new(PERIOD);
        let count = count.clone();
        scheduler
            .start(move || {
                let count = count.clone();
                async move {
                    count.fetch_add(1, Ordering::SeqCst);
                }
            })
            .unwrap();
        scheduler
    }

    #[tokio::test(start_paused = true)]
    async fn test_runs_immediately_then_every_interval() {
        let count = Arc::new(AtomicUsize::new(0));
        let _scheduler = counting_scheduler(&count);

        settle().await;
        assert_eq!(count.load(Ordering::SeqCst), 1);

        tokio::time::advance(PERIOD - Duration::from_secs(1)).await;
        settle().await;
        assert_eq!(count.load(Ordering::SeqCst), 1);

        tokio::time::advance(Duration::from_secs(1)).await;
        settle().await;
        assert_eq!(count.load(Ordering::SeqCst), 2);

        for n in 2..=5 {
            tokio::time::advance(PERIOD).await;
            settle().await;
            assert_eq!(count.load(Ordering::SeqCst), n + 1);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_invocations_after_stop() {
        let count = Arc::new(AtomicUsize::new(0));
        let mut scheduler = counting_scheduler(&count);

        settle().await;
        tokio::time::advance(PERIOD).await;
        settle().await;
        assert_eq!(count.load(Ordering::SeqCst), 2);

        scheduler.stop();
        assert_eq!(scheduler.state(), SchedulerState::Stopped);

        tokio::time::advance(PERIOD * 10).await;
        settle().await;
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_stops_timer() {
        let count = Arc::new(AtomicUsize::new(0));
        let scheduler = counting_scheduler(&count);
        settle().await;

        drop(scheduler);
        tokio::time::advance(PERIOD * 3).await;
        settle().await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_do_not_wait_for_slow_invocations() {
        let started = Arc::new(AtomicUsize::new(0));
        let finished = Arc::new(AtomicUsize::new(0));

        let mut scheduler = PollingScheduler::new(PERIOD);
        let (s, f) = (started.clone(), finished.clone());
        scheduler
            .start(move || {
                let (s, f) = (s.clone(), f.clone());
                async move {
                    s.fetch_add(1, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_secs(45)).await;
                    f.fetch_add(1, Ordering::SeqCst);
                }
            })
            .unwrap();

        settle().await;
        tokio::time::advance(PERIOD).await;
        settle().await;

        // Second tick fired while the first invocation is still sleeping
        assert_eq!(started.load(Ordering::SeqCst), 2);
        assert_eq!(finished.load(Ordering::SeqCst), 0);

        // Stopping lets in-flight invocations finish
        scheduler.stop();
        tokio::time::advance(Duration::from_secs(60)).await;
        settle().await;
        assert_eq!(started.load(Ordering::SeqCst), 2);
        assert_eq!(finished.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_lifecycle_transitions() {
        let mut scheduler = PollingScheduler::new(PERIOD);
        assert_eq!(scheduler.state(), SchedulerState::Idle);
        assert_eq!(scheduler.interval(), PERIOD);

        let signal = scheduler.stop_signal();
        assert!(!signal.is_stopped());

        scheduler.start(|| async {}).unwrap();
        assert_eq!(scheduler.state(), SchedulerState::Active);
        assert_eq!(
            scheduler.start(|| async {}),
            Err(SchedulerError::InvalidTransition(SchedulerState::Active))
        );

        scheduler.stop();
        scheduler.stop();
        assert!(signal.is_stopped());
        assert_eq!(
            scheduler.start(|| async {}),
            Err(SchedulerError::InvalidTransition(SchedulerState::Stopped))
        );
    }

    #[test]
    fn test_zero_interval_is_clamped() {
        let scheduler = PollingScheduler::new(Duration::ZERO);
        assert_eq!(scheduler.interval(), Duration::from_millis(1));
        assert_eq!(DEFAULT_POLL_INTERVAL, Duration::from_secs(30));
    }
}
