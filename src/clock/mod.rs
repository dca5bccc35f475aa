//! Clock module - Time formatting and tick cadence
//!
//! Pure helpers for turning seconds and minutes into labels, plus the
//! accumulator that decides when the one-second ticker fires.

mod cadence;
mod format;

pub use cadence::TickCadence;
pub use format::{
    format_clock, format_duration, format_minutes_compact, minutes_until, percent_full,
    seconds_until, READY_LABEL,
};

/// Absolute point in time used for every deadline on the dashboard
pub type Timestamp = chrono::DateTime<chrono::Utc>;
