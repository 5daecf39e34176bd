//! Time unit conversion for plain integer durations.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConvertError;

/// Granularity of an integer duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeUnit {
    Nanoseconds,
    Microseconds,
    Milliseconds,
    Seconds,
    Minutes,
    Hours,
    Days,
}

impl TimeUnit {
    /// Length of one unit in nanoseconds.
    pub fn nanos(self) -> i128 {
        match self {
            TimeUnit::Nanoseconds => 1,
            TimeUnit::Microseconds => 1_000,
            TimeUnit::Milliseconds => 1_000_000,
            TimeUnit::Seconds => 1_000_000_000,
            TimeUnit::Minutes => 60 * 1_000_000_000,
            TimeUnit::Hours => 3_600 * 1_000_000_000,
            TimeUnit::Days => 86_400 * 1_000_000_000,
        }
    }

    /// Short suffix, as accepted by [`FromStr`].
    pub fn suffix(self) -> &'static str {
        match self {
            TimeUnit::Nanoseconds => "ns",
            TimeUnit::Microseconds => "us",
            TimeUnit::Milliseconds => "ms",
            TimeUnit::Seconds => "s",
            TimeUnit::Minutes => "m",
            TimeUnit::Hours => "h",
            TimeUnit::Days => "d",
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

impl FromStr for TimeUnit {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ns" | "nanos" | "nanoseconds" => Ok(TimeUnit::Nanoseconds),
            "us" | "micros" | "microseconds" => Ok(TimeUnit::Microseconds),
            "ms" | "millis" | "milliseconds" => Ok(TimeUnit::Milliseconds),
            "s" | "sec" | "seconds" => Ok(TimeUnit::Seconds),
            "m" | "min" | "minutes" => Ok(TimeUnit::Minutes),
            "h" | "hours" => Ok(TimeUnit::Hours),
            "d" | "days" => Ok(TimeUnit::Days),
            other => Err(ConvertError::invalid(format!("Unknown time unit '{}'", other))),
        }
    }
}

/// Re-express `duration` from one unit in another.
///
/// Converting to a coarser unit truncates toward zero; results beyond the
/// `i64` range saturate.
pub fn convert_time(duration: i64, from: TimeUnit, to: TimeUnit) -> i64 {
    let nanos = i128::from(duration) * from.nanos();
    let converted = nanos / to.nanos();
    i64::try_from(converted).unwrap_or(if converted < 0 { i64::MIN } else { i64::MAX })
}
