//! Regeneration predictor
//!
//! Converts a bar's deficit into the absolute moment it will be full.
//! The prediction is made once per snapshot and then only read, so the
//! countdown derived from it can't drift between polls.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::clock::{percent_full, Timestamp};

/// Regenerating bars shown on the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Energy,
    Nerve,
}

impl ResourceKind {
    /// All bars in display order
    pub const ALL: [ResourceKind; 2] = [ResourceKind::Energy, ResourceKind::Nerve];

    /// Get display name for this bar
    pub fn name(&self) -> &'static str {
        match self {
            ResourceKind::Energy => "Energy",
            ResourceKind::Nerve => "Nerve",
        }
    }

    /// Icon prefixed to the regen timer
    pub fn icon(&self) -> &'static str {
        match self {
            ResourceKind::Energy => "⚡",
            ResourceKind::Nerve => "🧠",
        }
    }

    /// Display color for the bar (RGB)
    pub fn color(&self) -> (u8, u8, u8) {
        match self {
            ResourceKind::Energy => (100, 200, 100), // Green
            ResourceKind::Nerve => (220, 80, 80),    // Red
        }
    }
}

/// Fixed regeneration rate: `units_per_tick` gained every `minutes_per_tick`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegenRate {
    pub units_per_tick: u32,
    pub minutes_per_tick: u32,
}

impl RegenRate {
    /// Energy: +5 every 10 minutes
    pub const ENERGY: RegenRate = RegenRate::new(5, 10);
    /// Nerve: +1 every 5 minutes
    pub const NERVE: RegenRate = RegenRate::new(1, 5);

    pub const fn new(units_per_tick: u32, minutes_per_tick: u32) -> Self {
        Self {
            units_per_tick,
            minutes_per_tick,
        }
    }

    /// Minutes needed to regenerate `deficit` units, counting partial ticks as whole.
    ///
    /// `None` if the answer does not fit in an `i64`.
    pub fn minutes_to_recover(&self, deficit: i64) -> Option<i64> {
        if deficit <= 0 || self.units_per_tick == 0 {
            return Some(0);
        }
        let units = i64::from(self.units_per_tick);
        let ticks = deficit / units + i64::from(deficit % units != 0);
        ticks.checked_mul(i64::from(self.minutes_per_tick))
    }
}

/// Current and maximum value of a bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResourceState {
    pub current: i64,
    pub maximum: i64,
}

impl ResourceState {
    /// Create a bar, clamping so that `0 <= current <= maximum` holds
    pub fn new(current: i64, maximum: i64) -> Self {
        let maximum = maximum.max(0);
        Self {
            current: current.clamp(0, maximum),
            maximum,
        }
    }

    /// Rounded fill percentage (0 when the maximum is unknown)
    pub fn percent(&self) -> u8 {
        percent_full(self.current, self.maximum)
    }

    /// `"current / maximum"` label
    pub fn label(&self) -> String {
        format!("{} / {}", self.current, self.maximum)
    }
}

/// Frozen prediction of when a bar will be full
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegenPrediction {
    pub ready_at: Timestamp,
}

impl RegenPrediction {
    /// Predict from a bar snapshot; `None` when the bar is already full
    pub fn from_state(state: &ResourceState, rate: RegenRate, now: Timestamp) -> Option<Self> {
        predict_ready(state.current, state.maximum, rate, now).map(|ready_at| Self { ready_at })
    }

    /// Whether the bar has filled by `now`
    pub fn is_elapsed(&self, now: Timestamp) -> bool {
        self.ready_at <= now
    }
}

/// Absolute time at which a bar at `current / maximum` will be full.
///
/// Returns `None` when there is no deficit, or when the moment lies beyond
/// what a timestamp can represent.
pub fn predict_ready(
    current: i64,
    maximum: i64,
    rate: RegenRate,
    now: Timestamp,
) -> Option<Timestamp> {
    let deficit = maximum.checked_sub(current)?;
    if deficit <= 0 {
        return None;
    }
    let minutes = Duration::try_minutes(rate.minutes_to_recover(deficit)?)?;
    now.checked_add_signed(minutes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn t0() -> Timestamp {
        Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap()
    }

    #[test]
    fn test_full_bar_has_no_prediction() {
        for max in [0, 1, 100, 150] {
            assert_eq!(predict_ready(max, max, RegenRate::ENERGY, t0()), None);
            assert_eq!(predict_ready(max, max, RegenRate::NERVE, t0()), None);
        }
        // Overfilled bars (refills past the cap) are full too
        assert_eq!(predict_ready(160, 150, RegenRate::ENERGY, t0()), None);
    }

    #[test]
    fn test_energy_prediction() {
        // 50 missing at +5/10min = 100 minutes
        let ready = predict_ready(50, 100, RegenRate::ENERGY, t0());
        assert_eq!(ready, Some(t0() + Duration::minutes(100)));

        // Partial ticks round up: 3 missing still needs a full tick
        let ready = predict_ready(97, 100, RegenRate::ENERGY, t0());
        assert_eq!(ready, Some(t0() + Duration::minutes(10)));
    }

    #[test]
    fn test_nerve_prediction() {
        // 1 nerve per 5 minutes
        let ready = predict_ready(40, 60, RegenRate::NERVE, t0());
        assert_eq!(ready, Some(t0() + Duration::minutes(100)));
    }

    #[test]
    fn test_larger_deficit_never_earlier() {
        for rate in [RegenRate::ENERGY, RegenRate::NERVE, RegenRate::new(3, 7)] {
            let mut previous = t0();
            for current in (0..=100).rev() {
                let ready = predict_ready(current, 100, rate, t0()).unwrap_or(t0());
                assert!(ready >= previous, "deficit {} went backwards", 100 - current);
                previous = ready;
            }
        }
    }

    #[test]
    fn test_out_of_range_deficit_has_no_prediction() {
        assert_eq!(predict_ready(0, 1_000_000_000_000, RegenRate::ENERGY, t0()), None);
        assert_eq!(predict_ready(0, i64::MAX, RegenRate::ENERGY, t0()), None);
        assert_eq!(predict_ready(0, i64::MAX, RegenRate::new(1, u32::MAX), t0()), None);
        assert_eq!(predict_ready(i64::MIN, i64::MAX, RegenRate::NERVE, t0()), None);
        assert_eq!(RegenRate::new(1, 2).minutes_to_recover(i64::MAX), None);
        assert_eq!(RegenRate::new(5, 1).minutes_to_recover(i64::MAX), Some(i64::MAX / 5 + 1));
    }

    #[test]
    fn test_resource_state_clamps() {
        assert_eq!(ResourceState::new(120, 100), ResourceState { current: 100, maximum: 100 });
        assert_eq!(ResourceState::new(-5, 100), ResourceState { current: 0, maximum: 100 });
        assert_eq!(ResourceState::new(5, -1), ResourceState { current: 0, maximum: 0 });
        assert_eq!(ResourceState::new(0, 0).percent(), 0);
        assert_eq!(ResourceState::new(25, 50).label(), "25 / 50");
    }

    #[test]
    fn test_prediction_elapsed() {
        let state = ResourceState::new(99, 100);
        let prediction = RegenPrediction::from_state(&state, RegenRate::ENERGY, t0()).unwrap();
        assert!(!prediction.is_elapsed(t0() + Duration::minutes(9)));
        assert!(prediction.is_elapsed(t0() + Duration::minutes(10)));
    }
}
