//! Dashboard state container
//!
//! Everything the poller writes and the ticker reads lives here, owned by
//! the UI thread. Snapshots are applied in one call so the ticker never sees
//! half of an update.

use crate::clock::Timestamp;
use crate::config::RegenRates;
use crate::cooldowns::CooldownStore;
use crate::regen::{RegenPrediction, ResourceKind, ResourceState};
use crate::source::{Snapshot, SourceError};

/// An active race
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RacingState {
    pub ends_at: Timestamp,
}

/// Bookkeeping about polling, shown in the status line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PollStatus {
    pub last_success: Option<Timestamp>,
    pub last_failure: Option<Timestamp>,
    /// Message of the most recent failure, cleared by the next success
    pub last_error: Option<String>,
    pub successes: u64,
    pub failures: u64,
    pub in_flight: bool,
}

impl PollStatus {
    /// True when the last poll failed and the shown data is older than it
    pub fn is_stale(&self) -> bool {
        self.last_error.is_some()
    }
}

/// One bar with its frozen prediction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BarSlot {
    pub state: Option<ResourceState>,
    pub prediction: Option<RegenPrediction>,
}

/// All state shared between the poller and the ticker
#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    rates: RegenRates,
    energy: BarSlot,
    nerve: BarSlot,
    pub cooldowns: CooldownStore,
    pub racing: Option<RacingState>,
    pub status: PollStatus,
}

impl DashboardState {
    /// Empty state: no bars, no predictions, no race, every cooldown ready
    pub fn new(rates: RegenRates) -> Self {
        Self {
            rates,
            ..Self::default()
        }
    }

    pub fn bar(&self, kind: ResourceKind) -> &BarSlot {
        match kind {
            ResourceKind::Energy => &self.energy,
            ResourceKind::Nerve => &self.nerve,
        }
    }

    fn bar_mut(&mut self, kind: ResourceKind) -> &mut BarSlot {
        match kind {
            ResourceKind::Energy => &mut self.energy,
            ResourceKind::Nerve => &mut self.nerve,
        }
    }

    pub fn prediction(&self, kind: ResourceKind) -> Option<RegenPrediction> {
        self.bar(kind).prediction
    }

    /// Overwrite local state with server truth.
    ///
    /// Bars and cooldowns absent from the snapshot are left as they were;
    /// the race is cleared when the snapshot has none.
    pub fn apply_snapshot(&mut self, snapshot: &Snapshot, now: Timestamp) {
        for kind in ResourceKind::ALL {
            if let Some(state) = snapshot.bar(kind) {
                let rate = self.rates.get(kind);
                let prediction = RegenPrediction::from_state(&state, rate, now);
                if prediction.is_none() && state.current < state.maximum {
                    log::warn!(
                        "Ignoring {} bar {}: full time is out of range",
                        kind.name(),
                        state.label()
                    );
                    continue;
                }
                *self.bar_mut(kind) = BarSlot {
                    state: Some(state),
                    prediction,
                };
            }
        }

        if let Some(cooldowns) = snapshot.cooldowns {
            self.cooldowns.apply_snapshot(cooldowns.entries());
        }

        self.racing = snapshot.race_ends_at().map(|ends_at| RacingState { ends_at });

        self.status.last_success = Some(now);
        self.status.last_error = None;
        self.status.successes += 1;
    }

    /// Note a failed poll; the displayed state is kept as is
    pub fn record_failure(&mut self, error: &SourceError, now: Timestamp) {
        self.status.last_failure = Some(now);
        self.status.last_error = Some(error.to_string());
        self.status.failures += 1;
    }

    /// Drop predictions and races whose deadline has passed
    pub fn clear_elapsed(&mut self, now: Timestamp) {
        for kind in ResourceKind::ALL {
            let slot = self.bar_mut(kind);
            if slot.prediction.is_some_and(|p| p.is_elapsed(now)) {
                slot.prediction = None;
                log::debug!("{} regeneration complete", kind.name());
            }
        }

        if self.racing.is_some_and(|race| race.ends_at <= now) {
            self.racing = None;
            log::debug!("Race finished");
        }
    }
}
