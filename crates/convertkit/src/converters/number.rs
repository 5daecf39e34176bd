//! Numeric conversion.
//!
//! Every input is first reduced to an intermediate [`Number`], then fitted
//! to the requested width according to the registry's narrowing and
//! rounding policies.

use std::str::FromStr;

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::config::{FloatRounding, NarrowingPolicy};
use crate::core::{Converter, Registry, TargetType, Value};

/// Converts to every numeric target, `Decimal` and `Number` included.
#[derive(Debug, Clone, Copy, Default)]
pub struct NumberConverter;

impl Converter for NumberConverter {
    fn convert_internal(
        &self,
        target: &TargetType,
        value: &Value,
        registry: &Registry,
    ) -> Option<Value> {
        if let Value::Bytes(data) = value {
            if let Some(decoded) = from_le_bytes(target, data) {
                return Some(decoded);
            }
        }

        let number = to_number(value)?;
        let config = registry.config();

        match target {
            TargetType::F32 => number
                .to_f64()
                .and_then(|v| narrow_f32(v, config.narrowing))
                .map(Value::F32),
            TargetType::F64 => number.to_f64().map(Value::F64),
            TargetType::Decimal => number.to_decimal().map(Value::Decimal),
            TargetType::Number => Some(match number {
                Number::Int(v) => i64::try_from(v).map_or(Value::I128(v), Value::I64),
                Number::Float(v) => Value::F64(v),
                Number::Decimal(v) => Value::Decimal(v),
            }),
            t if t.is_integral() => {
                let integer = number.to_integer(config.float_to_int)?;
                narrow(integer, t, config.narrowing)
            }
            _ => None,
        }
    }
}

/// Intermediate numeric form shared by the numeric-aware converters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Number {
    Int(i128),
    Float(f64),
    Decimal(Decimal),
}

impl Number {
    pub(crate) fn to_f64(self) -> Option<f64> {
        match self {
            Number::Int(v) => Some(v as f64),
            Number::Float(v) => Some(v),
            Number::Decimal(v) => v.to_f64(),
        }
    }

    pub(crate) fn to_decimal(self) -> Option<Decimal> {
        match self {
            Number::Int(v) => Decimal::try_from_i128_with_scale(v, 0).ok(),
            Number::Float(v) => Decimal::from_f64(v),
            Number::Decimal(v) => Some(v),
        }
    }

    pub(crate) fn to_integer(self, rounding: FloatRounding) -> Option<i128> {
        match self {
            Number::Int(v) => Some(v),
            Number::Float(v) => {
                if !v.is_finite() {
                    return None;
                }
                let whole = match rounding {
                    FloatRounding::Round => v.round(),
                    FloatRounding::Truncate => v.trunc(),
                };
                // i128 spans roughly ±1.7e38
                if whole.abs() >= 1.7e38 {
                    return None;
                }
                Some(whole as i128)
            }
            Number::Decimal(v) => {
                let whole = match rounding {
                    FloatRounding::Round => {
                        v.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
                    }
                    FloatRounding::Truncate => v.trunc(),
                };
                whole.to_i128()
            }
        }
    }

    /// True when the number is anything but zero.
    pub(crate) fn is_nonzero(self) -> bool {
        match self {
            Number::Int(v) => v != 0,
            Number::Float(v) => v != 0.0,
            Number::Decimal(v) => !v.is_zero(),
        }
    }
}

/// Reduce a value to its numeric meaning.
pub(crate) fn to_number(value: &Value) -> Option<Number> {
    match value {
        Value::Bool(b) => Some(Number::Int(i128::from(*b))),
        Value::Char(c) => Some(Number::Int(i128::from(u32::from(*c)))),
        // Go through the shortest decimal form so 406.1f32 stays 406.1
        Value::F32(v) => v.to_string().parse().ok().map(Number::Float),
        Value::F64(v) => Some(Number::Float(*v)),
        Value::Decimal(v) => Some(Number::Decimal(*v)),
        Value::String(s) => parse_number(s),
        Value::Date(d) => d
            .and_hms_opt(0, 0, 0)
            .map(|dt| Number::Int(i128::from(dt.and_utc().timestamp_millis()))),
        Value::DateTime(dt) => Some(Number::Int(i128::from(dt.and_utc().timestamp_millis()))),
        Value::DateTimeTz(dt) => Some(Number::Int(i128::from(dt.timestamp_millis()))),
        Value::Duration(d) => i128::try_from(d.as_millis()).ok().map(Number::Int),
        Value::Enum(e) => i128::try_from(e.ordinal()).ok().map(Number::Int),
        Value::Shared(inner) => to_number(inner),
        other => other.as_i128().map(Number::Int),
    }
}

/// Parse numeric text.
///
/// Accepts surrounding whitespace, `,` and `_` separators, a leading sign,
/// `0x` hexadecimal integers, decimals and exponents.
pub(crate) fn parse_number(text: &str) -> Option<Number> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let cleaned: String = text.chars().filter(|c| *c != ',' && *c != '_').collect();
    let (negative, body) = match cleaned.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, cleaned.strip_prefix('+').unwrap_or(&cleaned)),
    };
    if body.is_empty() || body.starts_with(['+', '-']) {
        return None;
    }

    let sign = |v: i128| if negative { v.checked_neg() } else { Some(v) };

    if let Some(hex) = body.strip_prefix("0x").or_else(|| body.strip_prefix("0X")) {
        // from_str_radix takes its own sign; only the one before 0x counts
        if hex.starts_with(['+', '-']) {
            return None;
        }
        let v = i128::from_str_radix(hex, 16).ok()?;
        return sign(v).map(Number::Int);
    }

    if body.bytes().all(|b| b.is_ascii_digit()) {
        if let Ok(v) = body.parse::<i128>() {
            return sign(v).map(Number::Int);
        }
    }

    let signed = if negative {
        format!("-{}", body)
    } else {
        body.to_string()
    };
    if let Ok(v) = Decimal::from_str(&signed) {
        return Some(Number::Decimal(v));
    }
    if let Ok(v) = Decimal::from_scientific(&signed) {
        return Some(Number::Decimal(v));
    }
    signed
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .map(Number::Float)
}

/// Fit an integer into an integral target.
fn narrow(value: i128, target: &TargetType, policy: NarrowingPolicy) -> Option<Value> {
    macro_rules! fit {
        ($ty:ty, $variant:ident) => {{
            let fitted = match policy {
                NarrowingPolicy::Checked => <$ty>::try_from(value).ok()?,
                NarrowingPolicy::Saturating => {
                    value.clamp(<$ty>::MIN as i128, <$ty>::MAX as i128) as $ty
                }
                NarrowingPolicy::Wrapping => value as $ty,
            };
            Some(Value::$variant(fitted))
        }};
    }

    match target {
        TargetType::I8 => fit!(i8, I8),
        TargetType::I16 => fit!(i16, I16),
        TargetType::I32 => fit!(i32, I32),
        TargetType::I64 => fit!(i64, I64),
        TargetType::I128 => Some(Value::I128(value)),
        TargetType::U8 => fit!(u8, U8),
        TargetType::U16 => fit!(u16, U16),
        TargetType::U32 => fit!(u32, U32),
        TargetType::U64 => fit!(u64, U64),
        _ => None,
    }
}

/// Fit a finite `f64` into `f32`. Wrapping keeps the plain cast, which
/// overflows to infinity.
fn narrow_f32(value: f64, policy: NarrowingPolicy) -> Option<f32> {
    let cast = value as f32;
    if cast.is_finite() || !value.is_finite() {
        return Some(cast);
    }
    match policy {
        NarrowingPolicy::Checked => None,
        NarrowingPolicy::Saturating => {
            Some(value.clamp(f64::from(f32::MIN), f64::from(f32::MAX)) as f32)
        }
        NarrowingPolicy::Wrapping => Some(cast),
    }
}

/// Decode a buffer of exactly the target's width, little-endian.
fn from_le_bytes(target: &TargetType, data: &[u8]) -> Option<Value> {
    macro_rules! decode {
        ($ty:ty, $variant:ident) => {
            data.try_into()
                .ok()
                .map(|raw| Value::$variant(<$ty>::from_le_bytes(raw)))
        };
    }

    match target {
        TargetType::I8 => decode!(i8, I8),
        TargetType::I16 => decode!(i16, I16),
        TargetType::I32 => decode!(i32, I32),
        TargetType::I64 => decode!(i64, I64),
        TargetType::I128 => decode!(i128, I128),
        TargetType::U8 => decode!(u8, U8),
        TargetType::U16 => decode!(u16, U16),
        TargetType::U32 => decode!(u32, U32),
        TargetType::U64 => decode!(u64, U64),
        TargetType::F32 => decode!(f32, F32),
        TargetType::F64 => decode!(f64, F64),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConvertConfig;
    use crate::core::EnumDef;
    use std::sync::Arc;

    fn convert(target: TargetType, value: impl Into<Value>) -> Value {
        Registry::default()
            .convert(Some(&target), &value.into(), &Value::Null)
            .unwrap()
    }

    fn convert_with(config: ConvertConfig, target: TargetType, value: impl Into<Value>) -> Value {
        Registry::with_builtins(config)
            .convert(Some(&target), &value.into(), &Value::Null)
            .unwrap()
    }

    #[test]
    fn test_parse_trimmed_decimal_string() {
        assert_eq!(convert(TargetType::I32, " 34232.00"), Value::I32(34232));
        assert_eq!(convert(TargetType::I32, "08"), Value::I32(8));
        assert_eq!(convert(TargetType::I64, "1,234,567"), Value::I64(1_234_567));
        assert_eq!(convert(TargetType::I64, "1_000"), Value::I64(1000));
        assert_eq!(convert(TargetType::I32, "+5"), Value::I32(5));
        assert_eq!(convert(TargetType::I32, "0x1F"), Value::I32(31));
        assert_eq!(convert(TargetType::I32, "-0x10"), Value::I32(-16));
        assert_eq!(convert(TargetType::I32, "1e3"), Value::I32(1000));
    }

    #[test]
    fn test_unparseable_yields_default() {
        let registry = Registry::default();
        for input in ["", "  ", "abc", "1.2.3", "--1", "NaN", "inf"] {
            let out = registry
                .convert(Some(&TargetType::I32), &Value::from(input), &Value::I32(-1))
                .unwrap();
            assert_eq!(out, Value::I32(-1), "input {:?}", input);
        }
    }

    #[test]
    fn test_hex_sign_only_before_prefix() {
        let registry = Registry::default();
        for input in ["0x-5", "0x+5", "-0x-5", "-0x-80000000000000000000000000000000"] {
            let out = registry
                .convert_quietly(Some(&TargetType::I64), &Value::from(input), &Value::I64(-1))
                .unwrap();
            assert_eq!(out, Value::I64(-1), "input {:?}", input);
        }
        assert_eq!(
            convert(TargetType::I128, "-0x7fffffffffffffffffffffffffffffff"),
            Value::I128(-i128::MAX)
        );
    }

    #[test]
    fn test_bool_and_char() {
        assert_eq!(convert(TargetType::I32, true), Value::I32(1));
        assert_eq!(convert(TargetType::I64, false), Value::I64(0));
        assert_eq!(convert(TargetType::I32, 'A'), Value::I32(65));
    }

    #[test]
    fn test_empty_list_yields_default() {
        let registry = Registry::default();
        let out = registry
            .convert(Some(&TargetType::I32), &Value::List(vec![]), &Value::I32(3))
            .unwrap();
        assert_eq!(out, Value::I32(3));
    }

    #[test]
    fn test_wide_integer_to_decimal() {
        let out = convert(TargetType::Decimal, "33020000210909112800000124");
        assert_eq!(
            out,
            Value::Decimal(Decimal::from_str("33020000210909112800000124").unwrap())
        );
        assert_eq!(
            convert(TargetType::Decimal, "12.50"),
            Value::Decimal(Decimal::new(1250, 2))
        );
    }

    #[test]
    fn test_le_bytes_to_float() {
        let out = convert(TargetType::F32, Value::bytes(vec![0xCD, 0x0C, 0xCB, 0x43]));
        assert_eq!(out, Value::F32(406.1));
        let out = convert(TargetType::I16, Value::bytes(vec![0x01, 0x02]));
        assert_eq!(out, Value::I16(0x0201));
    }

    #[test]
    fn test_enum_to_ordinal() {
        let def = Arc::new(EnumDef::new("Color", ["RED", "GREEN", "BLUE"]));
        let blue = Value::enum_constant(&def, "BLUE").unwrap();
        assert_eq!(convert(TargetType::I32, blue), Value::I32(2));
    }

    #[test]
    fn test_rounding_policies() {
        assert_eq!(convert(TargetType::I32, 2.5f64), Value::I32(3));
        assert_eq!(convert(TargetType::I32, "-2.5"), Value::I32(-3));
        assert_eq!(convert(TargetType::I32, 2.4f32), Value::I32(2));

        let truncate = ConvertConfig {
            float_to_int: FloatRounding::Truncate,
            ..Default::default()
        };
        assert_eq!(convert_with(truncate.clone(), TargetType::I32, 2.9f64), Value::I32(2));
        assert_eq!(convert_with(truncate, TargetType::I32, "-2.9"), Value::I32(-2));
    }

    #[test]
    fn test_narrowing_policies() {
        let registry = Registry::default();
        let out = registry
            .convert(Some(&TargetType::I8), &Value::I64(300), &Value::I8(0))
            .unwrap();
        assert_eq!(out, Value::I8(0));

        let saturating = ConvertConfig {
            narrowing: NarrowingPolicy::Saturating,
            ..Default::default()
        };
        assert_eq!(convert_with(saturating.clone(), TargetType::I8, 300i64), Value::I8(127));
        assert_eq!(convert_with(saturating, TargetType::U8, -5i32), Value::U8(0));

        let wrapping = ConvertConfig {
            narrowing: NarrowingPolicy::Wrapping,
            ..Default::default()
        };
        assert_eq!(convert_with(wrapping, TargetType::I8, 300i64), Value::I8(44));
    }

    #[test]
    fn test_f32_narrowing_policies() {
        let registry = Registry::default();
        for input in [Value::from("1e39"), Value::F64(f64::MAX), Value::F64(-1e39)] {
            let out = registry
                .convert(Some(&TargetType::F32), &input, &Value::F32(-1.0))
                .unwrap();
            assert_eq!(out, Value::F32(-1.0), "input {:?}", input);
        }
        assert_eq!(convert(TargetType::F32, "1.5"), Value::F32(1.5));

        let saturating = ConvertConfig {
            narrowing: NarrowingPolicy::Saturating,
            ..Default::default()
        };
        assert_eq!(
            convert_with(saturating.clone(), TargetType::F32, "1e39"),
            Value::F32(f32::MAX)
        );
        assert_eq!(
            convert_with(saturating, TargetType::F32, -1e39f64),
            Value::F32(f32::MIN)
        );

        let wrapping = ConvertConfig {
            narrowing: NarrowingPolicy::Wrapping,
            ..Default::default()
        };
        assert_eq!(
            convert_with(wrapping, TargetType::F32, f64::MAX),
            Value::F32(f32::INFINITY)
        );
    }

    #[test]
    fn test_number_target() {
        assert_eq!(convert(TargetType::Number, "12"), Value::I64(12));
        assert_eq!(
            convert(TargetType::Number, "1.5"),
            Value::Decimal(Decimal::new(15, 1))
        );
        assert_eq!(convert(TargetType::Number, 2.5f64), Value::F64(2.5));
    }

    #[test]
    fn test_temporal_to_epoch_millis() {
        let dt = chrono::NaiveDate::from_ymd_opt(1970, 1, 2)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(convert(TargetType::I64, dt), Value::I64(86_400_000));
        assert_eq!(
            convert(TargetType::I64, std::time::Duration::from_secs(2)),
            Value::I64(2000)
        );
    }

    #[test]
    fn test_string_round_trip() {
        let n = convert(TargetType::I32, "123");
        assert_eq!(convert(TargetType::String, n), Value::from("123"));
        let s = convert(TargetType::String, 123i32);
        assert_eq!(convert(TargetType::I32, s), Value::I32(123));
    }
}
