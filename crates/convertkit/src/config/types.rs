//! Configuration types.

use serde::{Deserialize, Serialize};

/// Conversion behavior shared by every converter in a registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConvertConfig {
    /// Consult user-registered converters before built-in ones.
    #[serde(default = "default_true")]
    pub prefer_custom: bool,

    /// What to do when an integer does not fit the target width.
    #[serde(default)]
    pub narrowing: NarrowingPolicy,

    /// How fractional values become integers.
    #[serde(default)]
    pub float_to_int: FloatRounding,

    /// Extra chrono patterns for dates, tried before the built-in list.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub date_formats: Vec<String>,

    /// Extra chrono patterns for times of day.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub time_formats: Vec<String>,

    /// Extra chrono patterns for timestamps.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub datetime_formats: Vec<String>,

    /// Separator used when splitting a string into collection elements.
    #[serde(default = "default_separator")]
    pub list_separator: String,

    /// Match bean fields ignoring case, `_` and `-`.
    #[serde(default = "default_true")]
    pub relaxed_field_names: bool,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            prefer_custom: true,
            narrowing: NarrowingPolicy::default(),
            float_to_int: FloatRounding::default(),
            date_formats: Vec::new(),
            time_formats: Vec::new(),
            datetime_formats: Vec::new(),
            list_separator: default_separator(),
            relaxed_field_names: true,
        }
    }
}

/// Out-of-range handling for integer and `f32` narrowing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NarrowingPolicy {
    /// Out of range is a no-match; the caller's default is returned.
    #[default]
    Checked,

    /// Clamp to the target's minimum or maximum.
    Saturating,

    /// Keep the low-order bits (two's complement truncation).
    Wrapping,
}

/// Rounding applied when a fractional value becomes an integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FloatRounding {
    /// Round half away from zero.
    #[default]
    Round,

    /// Drop the fractional part.
    Truncate,
}

// Default value functions for serde
fn default_true() -> bool {
    true
}

fn default_separator() -> String {
    ",".to_string()
}
