//! Human-readable durations and percentages

use chrono::Local;

use super::Timestamp;

/// Label shown for any countdown that has reached zero
pub const READY_LABEL: &str = "ready";

const MILLIS_PER_SECOND: i64 = 1_000;
const MILLIS_PER_MINUTE: i64 = 60_000;

/// Format a countdown in seconds as `"1h 2m 5s"`, skipping zero components.
///
/// Anything at or below zero is [`READY_LABEL`].
pub fn format_duration(seconds: i64) -> String {
    if seconds <= 0 {
        return READY_LABEL.to_string();
    }

    let h = seconds / 3600;
    let m = (seconds % 3600) / 60;
    let s = seconds % 60;

    [(h, 'h'), (m, 'm'), (s, 's')]
        .iter()
        .filter(|(value, _)| *value > 0)
        .map(|(value, unit)| format!("{}{}", value, unit))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Format a whole number of minutes as `"2h 5m"`, `"2h"` or `"5m"`
pub fn format_minutes_compact(total_minutes: i64) -> String {
    let total_minutes = total_minutes.max(0);
    let h = total_minutes / 60;
    let m = total_minutes % 60;

    if h > 0 && m > 0 {
        format!("{}h {}m", h, m)
    } else if h > 0 {
        format!("{}h", h)
    } else {
        format!("{}m", m)
    }
}

/// Rounded fill percentage of a bar, always within `0..=100`.
///
/// A bar with no maximum (not loaded yet, or a malformed payload) is 0%.
pub fn percent_full(current: i64, maximum: i64) -> u8 {
    if maximum <= 0 {
        return 0;
    }
    let pct = (current as f64 / maximum as f64 * 100.0).round();
    pct.clamp(0.0, 100.0) as u8
}

/// Local wall-clock time of a deadline, e.g. `"14:05"`
pub fn format_clock(at: Timestamp) -> String {
    at.with_timezone(&Local).format("%H:%M").to_string()
}

/// Whole seconds left until `deadline`, rounded up; 0 once it has passed
pub fn seconds_until(deadline: Timestamp, now: Timestamp) -> i64 {
    ceil_div((deadline - now).num_milliseconds(), MILLIS_PER_SECOND)
}

/// Whole minutes left until `deadline`, rounded up; 0 once it has passed
pub fn minutes_until(deadline: Timestamp, now: Timestamp) -> i64 {
    ceil_div((deadline - now).num_milliseconds(), MILLIS_PER_MINUTE)
}

fn ceil_div(millis: i64, unit: i64) -> i64 {
    if millis <= 0 {
        0
    } else {
        (millis + unit - 1) / unit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0), "ready");
        assert_eq!(format_duration(-5), "ready");
        assert_eq!(format_duration(59), "59s");
        assert_eq!(format_duration(125), "2m 5s");
        assert_eq!(format_duration(3661), "1h 1m 1s");
        assert_eq!(format_duration(3725), "1h 2m 5s");
        assert_eq!(format_duration(7200), "2h"); // Zero parts are dropped
        assert_eq!(format_duration(3605), "1h 5s");
    }

    #[test]
    fn test_format_minutes_compact() {
        assert_eq!(format_minutes_compact(125), "2h 5m");
        assert_eq!(format_minutes_compact(120), "2h");
        assert_eq!(format_minutes_compact(5), "5m");
        assert_eq!(format_minutes_compact(0), "0m");
        assert_eq!(format_minutes_compact(70), "1h 10m");
    }

    #[test]
    fn test_percent_full_bounds() {
        for maximum in [1, 7, 100, 150] {
            for current in 0..=maximum {
                assert!(percent_full(current, maximum) <= 100);
            }
            assert_eq!(percent_full(maximum, maximum), 100);
            assert_eq!(percent_full(0, maximum), 0);
        }
        assert_eq!(percent_full(50, 100), 50);
        assert_eq!(percent_full(1, 3), 33);
        assert_eq!(percent_full(2, 3), 67);
    }

    #[test]
    fn test_percent_full_guards_empty_maximum() {
        assert_eq!(percent_full(0, 0), 0);
        assert_eq!(percent_full(10, 0), 0);
        assert_eq!(percent_full(200, 100), 100); // Overfilled bars clamp
    }

    #[test]
    fn test_time_until_rounds_up() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();

        assert_eq!(seconds_until(now + Duration::milliseconds(1500), now), 2);
        assert_eq!(seconds_until(now, now), 0);
        assert_eq!(seconds_until(now - Duration::seconds(3), now), 0);

        assert_eq!(minutes_until(now + Duration::minutes(70), now), 70);
        assert_eq!(minutes_until(now + Duration::seconds(61), now), 2);
        assert_eq!(minutes_until(now - Duration::minutes(1), now), 0);
    }
}
