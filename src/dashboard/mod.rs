//! Dashboard module - Core state, countdowns and polling
//!
//! [`Dashboard`] owns the state container, the one-second ticker, the
//! snapshot poller and the view model. The main loop calls
//! [`Dashboard::update`] every frame; nothing else mutates state.

mod state;
mod ticker;
mod view;

pub use state::{BarSlot, DashboardState, PollStatus, RacingState};
pub use ticker::{
    render_bar, render_cooldown, render_racing, render_regen, LocalTicker, RACE_LABEL,
    USE_NOW_LABEL,
};
pub use view::{ElementId, ElementView, Renderer, ViewModel};

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;

use crate::clock::Timestamp;
use crate::config::Config;
use crate::source::{DataSource, SnapshotPoller, Snapshot, SourceError};

/// The live dashboard
pub struct Dashboard {
    state: DashboardState,
    ticker: LocalTicker,
    poller: SnapshotPoller,
    view: ViewModel,
}

impl Dashboard {
    /// Build an empty dashboard; the first poll starts on the first update
    pub fn new(config: &Config, source: Arc<dyn DataSource>) -> Self {
        let state = DashboardState::new(config.rates);
        let ticker = LocalTicker::new(config.links.clone());
        let mut view = ViewModel::new();
        ticker.render_all(&state, Utc::now(), &mut view);

        Self {
            state,
            ticker,
            poller: SnapshotPoller::new(source, config.poll_interval()),
            view,
        }
    }

    /// Advance by one frame using the system clocks
    pub fn update(&mut self, delta: Duration) {
        self.update_at(delta, Instant::now(), Utc::now());
    }

    /// Advance by one frame.
    ///
    /// A completed poll is applied before the ticker runs, so a tick in the
    /// same frame already sees the new snapshot.
    pub fn update_at(&mut self, delta: Duration, instant: Instant, now: Timestamp) {
        if let Some(outcome) = self.poller.update(instant) {
            self.apply_outcome(outcome, now);
        }
        self.state.status.in_flight = self.poller.in_flight();

        self.ticker.update(delta, &mut self.state, now, &mut self.view);
    }

    /// Apply the result of a poll
    pub fn apply_outcome(&mut self, outcome: Result<Snapshot, SourceError>, now: Timestamp) {
        match outcome {
            Ok(snapshot) => {
                self.state.apply_snapshot(&snapshot, now);
                self.ticker.render_all(&self.state, now, &mut self.view);
                log::info!("Snapshot applied (poll #{})", self.state.status.successes);
            }
            Err(e) => {
                log::warn!("Poll failed, keeping last known values: {}", e);
                self.state.record_failure(&e, now);
            }
        }
    }

    /// Poll as soon as the previous request (if any) has finished
    pub fn refresh(&mut self) {
        log::info!("Manual refresh requested");
        self.poller.request_now();
    }

    /// Block until the running poll completes and apply it.
    ///
    /// Returns false if nothing finished within `timeout`.
    pub fn wait_for_poll(&mut self, timeout: Duration) -> bool {
        self.wait_for_poll_with(timeout, Utc::now)
    }

    fn wait_for_poll_with(&mut self, timeout: Duration, now: impl FnOnce() -> Timestamp) -> bool {
        match self.poller.wait_for_result(timeout) {
            Some(outcome) => {
                self.apply_outcome(outcome, now());
                self.state.status.in_flight = self.poller.in_flight();
                true
            }
            None => false,
        }
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn view(&self) -> &ViewModel {
        &self.view
    }

    pub fn status(&self) -> &PollStatus {
        &self.state.status
    }

    pub fn poll_interval(&self) -> Duration {
        self.poller.interval()
    }

    /// Time until the next scheduled poll
    pub fn next_poll_in(&self, instant: Instant) -> Duration {
        self.poller.time_until_next(instant)
    }
}
