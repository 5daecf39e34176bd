//! Date and time conversion.
//!
//! Inputs are normalized to a [`Moment`] first (epoch milliseconds,
//! formatted text or another temporal value), then projected onto the
//! requested representation. Naive values are treated as UTC wherever an
//! offset is needed.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Utc};

use crate::config::ConvertConfig;
use crate::core::{Converter, Registry, TargetType, Value};

/// Timestamp patterns with an explicit offset.
const ZONED_PATTERNS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f %z",
    "%Y/%m/%d %H:%M:%S%.f%:z",
];

/// Timestamp patterns without offset.
const DATETIME_PATTERNS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y.%m.%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M",
    "%Y年%m月%d日 %H时%M分%S秒",
    "%Y年%m月%d日%H时%M分%S秒",
    "%Y年%m月%d日 %H:%M:%S",
];

const DATE_PATTERNS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d", "%Y年%m月%d日"];

const TIME_PATTERNS: &[&str] = &["%H:%M:%S%.f", "%H:%M", "%H时%M分%S秒"];

/// A parsed point in time, at whatever precision the input carried.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Moment {
    Date(NaiveDate),
    Time(NaiveTime),
    Naive(NaiveDateTime),
    Zoned(DateTime<FixedOffset>),
}

/// Converts to `Date`, `Time`, `DateTime` and `DateTimeTz`.
///
/// The registered instance tries configured patterns, then a built-in
/// list. A converter built with [`TemporalConverter::with_format`] only
/// accepts text in its own format.
#[derive(Debug, Clone, Default)]
pub struct TemporalConverter {
    format: Option<String>,
}

impl TemporalConverter {
    /// Create a converter using the configured and built-in patterns.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a converter that parses text with a single chrono pattern.
    pub fn with_format(format: impl Into<String>) -> Self {
        Self {
            format: Some(format.into()),
        }
    }

    /// The fixed pattern, if any.
    pub fn format(&self) -> Option<&str> {
        self.format.as_deref()
    }

    fn parse(&self, text: &str, config: &ConvertConfig) -> Option<Moment> {
        if text.is_empty() {
            return None;
        }

        if let Some(format) = &self.format {
            return parse_with(text, format);
        }

        let configured = config
            .datetime_formats
            .iter()
            .find_map(|f| NaiveDateTime::parse_from_str(text, f).ok().map(Moment::Naive))
            .or_else(|| {
                config
                    .date_formats
                    .iter()
                    .find_map(|f| NaiveDate::parse_from_str(text, f).ok().map(Moment::Date))
            })
            .or_else(|| {
                config
                    .time_formats
                    .iter()
                    .find_map(|f| NaiveTime::parse_from_str(text, f).ok().map(Moment::Time))
            });
        if configured.is_some() {
            return configured;
        }

        if text.bytes().all(|b| b.is_ascii_digit()) {
            return parse_digits(text);
        }

        if let Ok(zoned) = DateTime::parse_from_rfc3339(text) {
            return Some(Moment::Zoned(zoned));
        }

        ZONED_PATTERNS
            .iter()
            .find_map(|p| DateTime::parse_from_str(text, p).ok().map(Moment::Zoned))
            .or_else(|| {
                DATETIME_PATTERNS
                    .iter()
                    .find_map(|p| NaiveDateTime::parse_from_str(text, p).ok().map(Moment::Naive))
            })
            .or_else(|| {
                DATE_PATTERNS
                    .iter()
                    .find_map(|p| NaiveDate::parse_from_str(text, p).ok().map(Moment::Date))
            })
            .or_else(|| {
                TIME_PATTERNS
                    .iter()
                    .find_map(|p| NaiveTime::parse_from_str(text, p).ok().map(Moment::Time))
            })
    }
}

impl Converter for TemporalConverter {
    fn convert_internal(
        &self,
        target: &TargetType,
        value: &Value,
        registry: &Registry,
    ) -> Option<Value> {
        let moment = match value {
            Value::Date(d) => Moment::Date(*d),
            Value::Time(t) => Moment::Time(*t),
            Value::DateTime(dt) => Moment::Naive(*dt),
            Value::DateTimeTz(dt) => Moment::Zoned(*dt),
            Value::String(s) => self.parse(s.trim(), registry.config())?,
            Value::Shared(inner) => return self.convert_internal(target, inner, registry),
            other => from_epoch_millis(i64::try_from(other.as_i128()?).ok()?)?,
        };
        project(moment, target)
    }
}

fn from_epoch_millis(millis: i64) -> Option<Moment> {
    DateTime::<Utc>::from_timestamp_millis(millis).map(|dt| Moment::Zoned(dt.fixed_offset()))
}

/// Parse text with one caller-supplied pattern at any precision.
fn parse_with(text: &str, format: &str) -> Option<Moment> {
    DateTime::parse_from_str(text, format)
        .map(Moment::Zoned)
        .or_else(|_| NaiveDateTime::parse_from_str(text, format).map(Moment::Naive))
        .or_else(|_| NaiveDate::parse_from_str(text, format).map(Moment::Date))
        .or_else(|_| NaiveTime::parse_from_str(text, format).map(Moment::Time))
        .ok()
}

/// Compact `yyyyMMdd` and `yyyyMMddHHmmss`; other digit runs are epoch millis.
fn parse_digits(text: &str) -> Option<Moment> {
    let field = |range: std::ops::Range<usize>| text.get(range)?.parse::<u32>().ok();

    match text.len() {
        8 => {
            let year = i32::try_from(field(0..4)?).ok()?;
            NaiveDate::from_ymd_opt(year, field(4..6)?, field(6..8)?).map(Moment::Date)
        }
        14 => {
            let year = i32::try_from(field(0..4)?).ok()?;
            NaiveDate::from_ymd_opt(year, field(4..6)?, field(6..8)?)?
                .and_hms_opt(field(8..10)?, field(10..12)?, field(12..14)?)
                .map(Moment::Naive)
        }
        _ => from_epoch_millis(text.parse().ok()?),
    }
}

fn project(moment: Moment, target: &TargetType) -> Option<Value> {
    let midnight = |d: NaiveDate| d.and_hms_opt(0, 0, 0);

    match (target, moment) {
        (TargetType::Date, Moment::Date(d)) => Some(Value::Date(d)),
        (TargetType::Date, Moment::Naive(dt)) => Some(Value::Date(dt.date())),
        (TargetType::Date, Moment::Zoned(dt)) => Some(Value::Date(dt.date_naive())),

        (TargetType::Time, Moment::Time(t)) => Some(Value::Time(t)),
        (TargetType::Time, Moment::Naive(dt)) => Some(Value::Time(dt.time())),
        (TargetType::Time, Moment::Zoned(dt)) => Some(Value::Time(dt.time())),

        (TargetType::DateTime, Moment::Date(d)) => midnight(d).map(Value::DateTime),
        (TargetType::DateTime, Moment::Naive(dt)) => Some(Value::DateTime(dt)),
        (TargetType::DateTime, Moment::Zoned(dt)) => Some(Value::DateTime(dt.naive_local())),

        (TargetType::DateTimeTz, Moment::Date(d)) => {
            midnight(d).map(|dt| Value::DateTimeTz(dt.and_utc().fixed_offset()))
        }
        (TargetType::DateTimeTz, Moment::Naive(dt)) => {
            Some(Value::DateTimeTz(dt.and_utc().fixed_offset()))
        }
        (TargetType::DateTimeTz, Moment::Zoned(dt)) => Some(Value::DateTimeTz(dt)),

        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn convert(target: TargetType, value: impl Into<Value>) -> Value {
        Registry::default()
            .convert(Some(&target), &value.into(), &Value::Null)
            .unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_standard_patterns() {
        let expected = date(2021, 7, 28).and_hms_opt(10, 0, 0).unwrap();
        assert_eq!(
            convert(TargetType::DateTime, "2021-07-28 10:00:00"),
            Value::DateTime(expected)
        );
        assert_eq!(
            convert(TargetType::DateTime, "2021/07/28 10:00:00"),
            Value::DateTime(expected)
        );
        assert_eq!(
            convert(TargetType::DateTime, "2021-07-28T10:00:00.000"),
            Value::DateTime(expected)
        );
        assert_eq!(convert(TargetType::Date, "2021-07-28"), Value::Date(date(2021, 7, 28)));
        assert_eq!(convert(TargetType::Date, "2021年07月28日"), Value::Date(date(2021, 7, 28)));
    }

    #[test]
    fn test_compact_digits() {
        assert_eq!(convert(TargetType::Date, "20210728"), Value::Date(date(2021, 7, 28)));
        assert_eq!(
            convert(TargetType::DateTime, "20210728103000"),
            Value::DateTime(date(2021, 7, 28).and_hms_opt(10, 30, 0).unwrap())
        );
    }

    #[test]
    fn test_partial_date_fails() {
        assert_eq!(convert(TargetType::Date, "2021-01"), Value::Null);
        assert_eq!(convert(TargetType::DateTime, "not a date"), Value::Null);
    }

    #[test]
    fn test_epoch_millis() {
        assert_eq!(
            convert(TargetType::DateTime, 0i64),
            Value::DateTime(date(1970, 1, 1).and_hms_opt(0, 0, 0).unwrap())
        );
        assert_eq!(convert(TargetType::Date, 86_400_000i64), Value::Date(date(1970, 1, 2)));
    }

    #[test]
    fn test_rfc3339_and_projection() {
        let out = convert(TargetType::DateTimeTz, "2021-07-28T10:00:00+08:00");
        let Value::DateTimeTz(zoned) = out else {
            panic!("expected DateTimeTz, got {:?}", out);
        };
        assert_eq!(zoned.offset().local_minus_utc(), 8 * 3600);
        assert_eq!(
            convert(TargetType::Date, "2021-07-28T10:00:00+08:00"),
            Value::Date(date(2021, 7, 28))
        );
        assert_eq!(
            convert(TargetType::Time, "10:30:15"),
            Value::Time(NaiveTime::from_hms_opt(10, 30, 15).unwrap())
        );
    }

    #[test]
    fn test_cross_conversion() {
        let d = date(2021, 7, 28);
        assert_eq!(
            convert(TargetType::DateTime, d),
            Value::DateTime(d.and_hms_opt(0, 0, 0).unwrap())
        );
        assert_eq!(
            convert(TargetType::DateTimeTz, d),
            Value::DateTimeTz(d.and_hms_opt(0, 0, 0).unwrap().and_utc().fixed_offset())
        );
        assert_eq!(convert(TargetType::Time, d), Value::Null);
    }

    #[test]
    fn test_configured_patterns_first() {
        let config = ConvertConfig {
            date_formats: vec!["%d/%m/%Y".to_string()],
            ..Default::default()
        };
        let registry = Registry::with_builtins(config);
        let out = registry
            .convert(Some(&TargetType::Date), &Value::from("28/07/2021"), &Value::Null)
            .unwrap();
        assert_eq!(out, Value::Date(date(2021, 7, 28)));
    }

    #[test]
    fn test_fixed_format() {
        let registry = Registry::default();
        let converter = TemporalConverter::with_format("%d.%m.%Y %H:%M");
        assert_eq!(converter.format(), Some("%d.%m.%Y %H:%M"));

        let out = converter
            .convert(
                &TargetType::DateTime,
                &Value::from("28.07.2021 10:30"),
                &Value::Null,
                &registry,
            )
            .unwrap();
        assert_eq!(out, Value::DateTime(date(2021, 7, 28).and_hms_opt(10, 30, 0).unwrap()));

        let out = converter
            .convert(&TargetType::DateTime, &Value::from("2021-07-28 10:30:00"), &Value::Null, &registry)
            .unwrap();
        assert_eq!(out, Value::Null);
    }
}
