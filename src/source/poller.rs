//! Snapshot poller
//!
//! Schedules fetches on a fixed interval, one at a time. The request runs on
//! a short-lived worker thread and drops its outcome into a one-slot inbox;
//! the dashboard collects it on the next frame, so state is only ever
//! touched from the UI thread.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

use super::snapshot::Snapshot;
use super::torn::{DataSource, SourceError};

type Outcome = Result<Snapshot, SourceError>;

/// One-slot hand-off between the worker and the UI thread
#[derive(Default)]
struct Inbox {
    slot: Mutex<Option<Outcome>>,
    ready: Condvar,
}

impl Inbox {
    fn put(&self, outcome: Outcome) {
        *self.slot.lock() = Some(outcome);
        self.ready.notify_all();
    }

    fn take(&self) -> Option<Outcome> {
        self.slot.lock().take()
    }

    fn wait(&self, timeout: Duration) -> Option<Outcome> {
        let deadline = Instant::now() + timeout;
        let mut slot = self.slot.lock();
        while slot.is_none() {
            if self.ready.wait_until(&mut slot, deadline).timed_out() {
                break;
            }
        }
        slot.take()
    }
}

/// Periodic, single-flight snapshot fetcher
pub struct SnapshotPoller {
    source: Arc<dyn DataSource>,
    interval: Duration,
    /// When the next poll should start (`None` = as soon as possible)
    next_due: Option<Instant>,
    inbox: Arc<Inbox>,
    worker: Option<JoinHandle<()>>,
    /// Polls skipped because the previous one had not finished
    skipped: u64,
    started: u64,
    /// Spawn failure not yet reported because a result was returned instead
    pending_error: Option<SourceError>,
}

impl SnapshotPoller {
    /// Create a poller; the first poll is due immediately
    pub fn new(source: Arc<dyn DataSource>, interval: Duration) -> Self {
        Self {
            source,
            interval,
            next_due: None,
            inbox: Arc::new(Inbox::default()),
            worker: None,
            skipped: 0,
            started: 0,
            pending_error: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Whether a request is currently running
    pub fn in_flight(&self) -> bool {
        self.worker.is_some()
    }

    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    pub fn started(&self) -> u64 {
        self.started
    }

    /// Time left until the next scheduled poll
    pub fn time_until_next(&self, now: Instant) -> Duration {
        self.next_due
            .map(|due| due.saturating_duration_since(now))
            .unwrap_or(Duration::ZERO)
    }

    /// Ask for a poll on the next update, ignoring the schedule
    pub fn request_now(&mut self) {
        self.next_due = None;
    }

    /// Collect a finished poll, then start a new one if it is due.
    ///
    /// Returns the outcome of a poll that completed since the last call.
    pub fn update(&mut self, now: Instant) -> Option<Outcome> {
        let outcome = self
            .collect()
            .or_else(|| self.pending_error.take().map(Err));

        let due = self.next_due.map_or(true, |due| now >= due);
        if due {
            self.next_due = Some(now + self.interval);
            if self.in_flight() {
                self.skipped += 1;
                log::debug!("Previous poll still running, skipping this one");
            } else if let Err(e) = self.spawn() {
                log::warn!("Could not start poll: {}", e);
                return self.report_spawn_error(outcome, e);
            }
        }

        outcome
    }

    /// Return the spawn error now, or hold it for the next update if a
    /// finished poll is already being returned
    fn report_spawn_error(&mut self, outcome: Option<Outcome>, error: SourceError) -> Option<Outcome> {
        match outcome {
            Some(outcome) => {
                self.pending_error = Some(error);
                Some(outcome)
            }
            None => Some(Err(error)),
        }
    }

    /// Block until the running poll finishes or `timeout` elapses
    pub fn wait_for_result(&mut self, timeout: Duration) -> Option<Outcome> {
        if !self.in_flight() {
            return None;
        }
        let outcome = self.inbox.wait(timeout)?;
        self.join_worker();
        Some(outcome)
    }

    fn spawn(&mut self) -> Result<(), SourceError> {
        let source = Arc::clone(&self.source);
        let inbox = Arc::clone(&self.inbox);

        let handle = thread::Builder::new()
            .name("barwatch-poll".to_string())
            .spawn(move || inbox.put(source.fetch()))
            .map_err(|e| SourceError::Worker(e.to_string()))?;

        self.started += 1;
        self.worker = Some(handle);
        log::debug!("Poll #{} started", self.started);
        Ok(())
    }

    fn collect(&mut self) -> Option<Outcome> {
        if let Some(outcome) = self.inbox.take() {
            self.join_worker();
            return Some(outcome);
        }

        // A worker that exited without reporting has panicked
        let finished = self.worker.as_ref().is_some_and(|w| w.is_finished());
        if finished {
            self.join_worker();
            if let Some(outcome) = self.inbox.take() {
                return Some(outcome);
            }
            return Some(Err(SourceError::Worker("poll thread exited without a result".to_string())));
        }

        None
    }

    fn join_worker(&mut self) {
        if let Some(handle) = self.worker.take() {
            if handle.join().is_err() {
                log::warn!("Poll thread panicked");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::mpsc;

    const WAIT: Duration = Duration::from_secs(5);

    /// Source returning canned snapshots and counting calls
    struct CountingSource {
        calls: AtomicUsize,
        fail: bool,
    }

    impl DataSource for CountingSource {
        fn fetch(&self) -> Result<Snapshot, SourceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(SourceError::Status(503))
            } else {
                Ok(Snapshot::default())
            }
        }
    }

    /// Source that blocks until the test releases it
    struct GatedSource {
        gate: Mutex<mpsc::Receiver<()>>,
    }

    impl DataSource for GatedSource {
        fn fetch(&self) -> Result<Snapshot, SourceError> {
            let _ = self.gate.lock().recv_timeout(WAIT);
            Ok(Snapshot::default())
        }
    }

    fn counting(fail: bool) -> Arc<CountingSource> {
        Arc::new(CountingSource { calls: AtomicUsize::new(0), fail })
    }

    #[test]
    fn test_first_poll_is_immediate() {
        let source = counting(false);
        let mut poller = SnapshotPoller::new(source.clone(), Duration::from_secs(60));
        let now = Instant::now();

        assert!(poller.update(now).is_none());
        assert!(poller.in_flight());
        let outcome = poller.wait_for_result(WAIT).expect("poll should finish");
        assert!(outcome.is_ok());
        assert!(!poller.in_flight());
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_respects_interval() {
        let source = counting(false);
        let mut poller = SnapshotPoller::new(source.clone(), Duration::from_secs(60));
        let now = Instant::now();

        poller.update(now);
        poller.wait_for_result(WAIT);

        assert!(poller.update(now + Duration::from_secs(30)).is_none());
        assert!(!poller.in_flight());
        assert_eq!(poller.time_until_next(now + Duration::from_secs(30)), Duration::from_secs(30));

        poller.update(now + Duration::from_secs(60));
        assert!(poller.in_flight());
        poller.wait_for_result(WAIT);
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_overlapping_poll_is_skipped() {
        let (release, gate) = mpsc::channel();
        let source = Arc::new(GatedSource { gate: Mutex::new(gate) });
        let mut poller = SnapshotPoller::new(source, Duration::from_secs(15));
        let now = Instant::now();

        poller.update(now);
        assert!(poller.in_flight());

        // Next poll comes due while the first is still blocked
        assert!(poller.update(now + Duration::from_secs(15)).is_none());
        assert_eq!(poller.skipped(), 1);
        assert_eq!(poller.started(), 1);

        release.send(()).unwrap();
        let outcome = poller.wait_for_result(WAIT).expect("poll should finish");
        assert!(outcome.is_ok());
        assert_eq!(poller.started(), 1);
    }

    #[test]
    fn test_failures_are_reported() {
        let source = counting(true);
        let mut poller = SnapshotPoller::new(source, Duration::from_secs(60));

        poller.update(Instant::now());
        let outcome = poller.wait_for_result(WAIT).expect("poll should finish");
        assert!(matches!(outcome, Err(SourceError::Status(503))));
    }

    #[test]
    fn test_spawn_error_is_not_lost() {
        let mut poller = SnapshotPoller::new(counting(false), Duration::from_secs(60));
        let now = Instant::now();

        // No result this frame: the error is returned straight away
        let outcome = poller.report_spawn_error(None, SourceError::Worker("no threads".to_string()));
        assert!(matches!(outcome, Some(Err(SourceError::Worker(_)))));

        // A finished poll goes out first, the error on the next update
        let outcome = poller.report_spawn_error(
            Some(Ok(Snapshot::default())),
            SourceError::Worker("no threads".to_string()),
        );
        assert!(matches!(outcome, Some(Ok(_))));

        let outcome = poller.update(now);
        assert!(matches!(outcome, Some(Err(SourceError::Worker(_)))));
        assert!(poller.in_flight());
        assert!(poller.wait_for_result(WAIT).expect("poll should finish").is_ok());
        assert!(poller.update(now + Duration::from_secs(1)).is_none());
    }

    #[test]
    fn test_request_now_overrides_schedule() {
        let source = counting(false);
        let mut poller = SnapshotPoller::new(source.clone(), Duration::from_secs(60));
        let now = Instant::now();

        poller.update(now);
        poller.wait_for_result(WAIT);

        poller.request_now();
        poller.update(now + Duration::from_secs(1));
        poller.wait_for_result(WAIT);
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }
}
