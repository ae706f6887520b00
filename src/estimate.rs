//! Playback duration estimate.
//!
//! Showing a movie at a few seconds per frame stretches it over hours or
//! days. [`estimate_playback`] turns the frame count, the inter-frame delay and
//! the frame increment into a figure in the unit easiest to read.

use std::fmt::{Display, Formatter, Result as FmtResult};

/// Unit chosen for a [`PlaybackEstimate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Seconds,
    Minutes,
    Hours,
    Days,
}

impl TimeUnit {
    /// Plural lowercase name (`"hours"`).
    pub fn name(self) -> &'static str {
        match self {
            TimeUnit::Seconds => "seconds",
            TimeUnit::Minutes => "minutes",
            TimeUnit::Hours => "hours",
            TimeUnit::Days => "days",
        }
    }
}

impl Display for TimeUnit {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.name())
    }
}

/// Estimated wall-clock time to play a movie once.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackEstimate {
    /// Amount of time, expressed in [`unit`](Self::unit).
    pub magnitude: f64,
    /// Largest unit in which the magnitude exceeds one.
    pub unit: TimeUnit,
}

impl Display for PlaybackEstimate {
    /// Formats as `"1,234.50 hours"`.
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let fixed = format!("{:.2}", self.magnitude);
        let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
        let whole = whole.parse::<u64>().map(group_thousands).unwrap_or_else(|_| whole.to_string());
        write!(f, "{whole}.{fraction} {}", self.unit)
    }
}

/// Estimate how long one pass over a movie takes.
///
/// `elapsed = total_frames × delay_seconds / frame_increment`, then the
/// largest of days, hours, minutes whose value exceeds one is selected,
/// falling back to seconds. An increment that does not divide the frame count
/// evenly is fine; the fractional frame simply is not shown.
///
/// A zero `frame_increment` is treated as 1.
///
/// # Example
///
/// ```
/// use slow_movie::{estimate_playback, TimeUnit};
///
/// let estimate = estimate_playback(86_400, 1, 10);
/// assert_eq!(estimate.unit, TimeUnit::Hours);
/// assert!((estimate.magnitude - 2.4).abs() < 1e-9);
/// ```
pub fn estimate_playback(total_frames: u64, delay_seconds: u64, frame_increment: u64) -> PlaybackEstimate {
    let seconds = (total_frames as f64 * delay_seconds as f64) / frame_increment.max(1) as f64;
    let minutes = seconds / 60.0;
    let hours = minutes / 60.0;
    let days = hours / 24.0;

    let (magnitude, unit) = if days > 1.0 {
        (days, TimeUnit::Days)
    } else if hours > 1.0 {
        (hours, TimeUnit::Hours)
    } else if minutes > 1.0 {
        (minutes, TimeUnit::Minutes)
    } else {
        (seconds, TimeUnit::Seconds)
    };

    PlaybackEstimate { magnitude, unit }
}

/// Render an integer with `,` thousands separators.
pub(crate) fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}
