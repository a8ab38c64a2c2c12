//! Duration math for timers. Pause totals are kept as fractional seconds so
//! they serialize as plain numbers; conversions here keep microsecond precision.

use chrono::{DateTime, Duration, Utc};

use crate::db::Timer;

const MICROS_PER_SEC: f64 = 1_000_000.0;
const MICROS_PER_DAY: i64 = 86_400_000_000;

pub fn duration_to_secs(duration: Duration) -> f64 {
    match duration.num_microseconds() {
        Some(micros) => micros as f64 / MICROS_PER_SEC,
        None => duration.num_milliseconds() as f64 / 1_000.0,
    }
}

pub fn secs_to_duration(secs: f64) -> Duration {
    if !secs.is_finite() {
        return Duration::zero();
    }
    Duration::microseconds((secs * MICROS_PER_SEC).round() as i64)
}

/// Seconds spent paused between `paused_at` and `now`. A clock that stepped
/// backwards yields zero so the running total never shrinks.
pub fn pause_interval_secs(paused_at: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    duration_to_secs(now - paused_at).max(0.0)
}

/// Wall-clock time since start, net of the accumulated pause total.
///
/// A pause that is still open is not subtracted; only closed intervals are in
/// `total_pause_time`.
pub fn elapsed_active(timer: &Timer, now: DateTime<Utc>) -> Duration {
    now - timer.start_time - secs_to_duration(timer.total_pause_time)
}

/// Formats as `H:MM:SS`, with `.ffffff` when there are microseconds and a
/// `N day(s), ` prefix past a day. Negative spans borrow from the day count,
/// so minus one second reads `-1 day, 23:59:59`.
pub fn format_elapsed(duration: Duration) -> String {
    let total_micros = duration
        .num_microseconds()
        .unwrap_or_else(|| duration.num_milliseconds().saturating_mul(1_000));

    let days = total_micros.div_euclid(MICROS_PER_DAY);
    let rem = total_micros.rem_euclid(MICROS_PER_DAY);
    let secs_of_day = rem / 1_000_000;
    let micros = rem % 1_000_000;

    let hours = secs_of_day / 3_600;
    let minutes = (secs_of_day % 3_600) / 60;
    let seconds = secs_of_day % 60;

    let mut out = String::new();
    if days != 0 {
        let plural = if days.abs() == 1 { "" } else { "s" };
        out.push_str(&format!("{days} day{plural}, "));
    }
    out.push_str(&format!("{hours}:{minutes:02}:{seconds:02}"));
    if micros != 0 {
        out.push_str(&format!(".{micros:06}"));
    }
    out
}
