//! Duration conversion.

use std::time::Duration;

use crate::core::{Converter, Registry, TargetType, Value};

use super::number::parse_number;

/// Converts integer milliseconds and `<number><unit>` text to `Duration`.
///
/// Units: `ns`, `us`, `ms`, `s`, `m`, `h`, `d`. Bare numbers are milliseconds.
#[derive(Debug, Clone, Copy, Default)]
pub struct DurationConverter;

impl Converter for DurationConverter {
    fn convert_internal(
        &self,
        target: &TargetType,
        value: &Value,
        registry: &Registry,
    ) -> Option<Value> {
        match value {
            Value::String(s) => parse_duration(s).map(Value::Duration),
            Value::F32(_) | Value::F64(_) | Value::Decimal(_) => {
                from_nanos(value.as_f64()? * 1e6).map(Value::Duration)
            }
            Value::Shared(inner) => self.convert_internal(target, inner, registry),
            other => {
                let millis = u64::try_from(other.as_i128()?).ok()?;
                Some(Value::Duration(Duration::from_millis(millis)))
            }
        }
    }
}

/// Parse `1500`, `1.5s`, `250ms`, `2h`, ...
pub fn parse_duration(text: &str) -> Option<Duration> {
    let text = text.trim();
    let split = text
        .find(|c: char| c.is_ascii_alphabetic())
        .unwrap_or(text.len());
    let (amount, unit) = text.split_at(split);
    let amount = parse_number(amount)?.to_f64()?;

    let nanos_per_unit = match unit.trim() {
        "" | "ms" => 1e6,
        "ns" => 1.0,
        "us" => 1e3,
        "s" => 1e9,
        "m" => 60e9,
        "h" => 3_600e9,
        "d" => 86_400e9,
        _ => return None,
    };
    from_nanos(amount * nanos_per_unit)
}

fn from_nanos(nanos: f64) -> Option<Duration> {
    if !nanos.is_finite() || nanos < 0.0 || nanos > u64::MAX as f64 {
        return None;
    }
    Some(Duration::from_nanos(nanos.round() as u64))
}
