//! The `Convert` facade.
//!
//! Strict entry points surface [`ConvertError`] for programmer errors and
//! missing converters; quiet entry points swallow everything except an
//! ambiguous target and hand back the caller's default. Typed helpers wrap
//! both with [`FromValue`] extraction.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::ConvertConfig;
use crate::core::{
    BeanDef, Converter, EnumDef, EnumValue, FromValue, Registry, TargetType, Value,
};
use crate::error::{ConvertError, Result};
use crate::text::{chinese, words};

/// Conversion facade over a shared [`Registry`].
///
/// Cloning is cheap and every clone sees the same registry, so a custom
/// converter registered through one clone is visible to all of them.
///
/// # Example
///
/// ```rust
/// use convertkit::{Convert, TargetType, Value};
///
/// let convert = Convert::default();
/// assert_eq!(convert.to_int("1,024"), Some(1024));
/// assert_eq!(
///     convert.convert(&TargetType::list(TargetType::I32), "1, 2, 3").unwrap(),
///     Value::list([1i32, 2, 3])
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct Convert {
    registry: Arc<Registry>,
}

macro_rules! typed_helpers {
    ($($(#[$doc:meta])* $name:ident => $ty:ty),* $(,)?) => {
        $(
            $(#[$doc])*
            pub fn $name(&self, value: impl Into<Value>) -> Option<$ty> {
                self.try_to::<$ty>(value)
            }
        )*
    };
}

impl Convert {
    /// Wrap an owned registry.
    pub fn new(registry: Registry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }

    /// Share a registry with other facades or threads.
    pub fn with_shared(registry: Arc<Registry>) -> Self {
        Self { registry }
    }

    /// Validate `config` and build a facade over the built-in converters.
    pub fn from_config(config: ConvertConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(Registry::with_builtins(config)))
    }

    /// The underlying registry.
    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// Add or replace a custom converter.
    pub fn register_custom(&self, target: TargetType, converter: impl Converter + 'static) {
        self.registry.register_custom(target, converter);
    }

    // =========================================================================
    // Strict
    // =========================================================================

    /// Convert to `target`. Unparseable input yields [`Value::Null`].
    pub fn convert(&self, target: &TargetType, value: impl Into<Value>) -> Result<Value> {
        self.registry.convert(Some(target), &value.into(), &Value::Null)
    }

    /// Convert with a default; a `None` target is inferred from the default.
    pub fn convert_or(
        &self,
        target: Option<&TargetType>,
        value: impl Into<Value>,
        default: impl Into<Value>,
    ) -> Result<Value> {
        self.registry.convert(target, &value.into(), &default.into())
    }

    /// Convert to a type given by name, such as `"list<i64>"`.
    pub fn convert_by_name(&self, type_name: &str, value: impl Into<Value>) -> Result<Value> {
        let target: TargetType = type_name.parse()?;
        self.convert(&target, value)
    }

    /// Convert strictly or quietly depending on `quietly`.
    pub fn convert_with_check(
        &self,
        target: Option<&TargetType>,
        value: impl Into<Value>,
        default: impl Into<Value>,
        quietly: bool,
    ) -> Result<Value> {
        let (value, default) = (value.into(), default.into());
        if quietly {
            self.registry.convert_quietly(target, &value, &default)
        } else {
            self.registry.convert(target, &value, &default)
        }
    }

    // =========================================================================
    // Quiet
    // =========================================================================

    /// Convert, returning `default` on any failure except an ambiguous target.
    pub fn convert_quietly(
        &self,
        target: Option<&TargetType>,
        value: impl Into<Value>,
        default: impl Into<Value>,
    ) -> Result<Value> {
        self.registry
            .convert_quietly(target, &value.into(), &default.into())
    }

    // =========================================================================
    // Typed
    // =========================================================================

    /// Strict typed conversion. `Ok(None)` means the input did not convert.
    pub fn to<T: FromValue>(&self, value: impl Into<Value>) -> Result<Option<T>> {
        let converted = self.convert(&T::target_type(), value)?;
        Ok(match converted {
            Value::Null => None,
            other => T::from_value(other),
        })
    }

    /// Quiet typed conversion.
    pub fn try_to<T: FromValue>(&self, value: impl Into<Value>) -> Option<T> {
        let target = T::target_type();
        match self
            .registry
            .convert_quietly(Some(&target), &value.into(), &Value::Null)
        {
            Ok(Value::Null) => None,
            Ok(converted) => T::from_value(converted),
            Err(e) => {
                debug!("Typed conversion to {} failed: {}", target, e);
                None
            }
        }
    }

    /// Quiet typed conversion with a fallback.
    pub fn to_or<T: FromValue>(&self, value: impl Into<Value>, default: T) -> T {
        self.try_to(value).unwrap_or(default)
    }

    typed_helpers! {
        /// Convert to `String`.
        to_str => String,
        to_char => char,
        to_i8 => i8,
        to_i16 => i16,
        to_i32 => i32,
        to_i64 => i64,
        to_u8 => u8,
        to_u16 => u16,
        to_u32 => u32,
        to_u64 => u64,
        /// Convert to `i32`.
        to_int => i32,
        /// Convert to `i64`.
        to_long => i64,
        to_f32 => f32,
        to_f64 => f64,
        /// Convert using the boolean vocabulary (`yes`, `on`, `1`, `是`, ...).
        to_bool => bool,
        to_decimal => Decimal,
        to_date => NaiveDate,
        to_datetime => NaiveDateTime,
    }

    /// Convert to the narrowest faithful numeric [`Value`].
    pub fn to_number(&self, value: impl Into<Value>) -> Option<Value> {
        self.registry
            .convert_quietly(Some(&TargetType::Number), &value.into(), &Value::Null)
            .ok()
            .filter(|v| !v.is_null())
    }

    /// Convert to a byte buffer.
    pub fn to_bytes(&self, value: impl Into<Value>) -> Option<Vec<u8>> {
        match self
            .registry
            .convert_quietly(Some(&TargetType::Bytes), &value.into(), &Value::Null)
        {
            Ok(Value::Bytes(data)) => Some(data),
            _ => None,
        }
    }

    /// Convert to a list, converting every element to `T`.
    pub fn to_list<T: FromValue>(&self, value: impl Into<Value>) -> Option<Vec<T>> {
        self.try_to(value)
    }

    /// Convert to a set, converting every element to `T`.
    pub fn to_set<T: FromValue + Eq + Hash>(&self, value: impl Into<Value>) -> Option<HashSet<T>> {
        self.try_to(value)
    }

    /// Convert to a map, converting every key and value.
    pub fn to_map<K, V>(&self, value: impl Into<Value>) -> Option<HashMap<K, V>>
    where
        K: FromValue + Eq + Hash,
        V: FromValue,
    {
        self.try_to(value)
    }

    /// Convert to a constant of `def`.
    pub fn to_enum(&self, def: &Arc<EnumDef>, value: impl Into<Value>) -> Option<EnumValue> {
        let target = TargetType::Enum(Arc::clone(def));
        match self
            .registry
            .convert_quietly(Some(&target), &value.into(), &Value::Null)
        {
            Ok(Value::Enum(constant)) => Some(constant),
            _ => None,
        }
    }

    /// Populate `def` from `value` and deserialize the result into `T`.
    ///
    /// Field values are converted to their declared types first, so `T` sees
    /// already-coerced data.
    pub fn to_struct<T: DeserializeOwned>(
        &self,
        def: Arc<BeanDef>,
        value: impl Into<Value>,
    ) -> Result<T> {
        let name = def.name().to_string();
        let populated = self.convert(&TargetType::Bean(def), value)?;
        if populated.is_null() {
            return Err(ConvertError::invalid(format!(
                "Value cannot populate bean [{}]",
                name
            )));
        }
        Ok(serde_json::from_value(populated.to_json())?)
    }

    // =========================================================================
    // Formatting
    // =========================================================================

    /// English amount words, e.g. `ONE HUNDRED AND CENTS TWENTY THREE ONLY`.
    pub fn number_to_words(number: f64) -> Result<String> {
        words::number_to_words(number)
    }

    /// Short-scale abbreviation, e.g. `1.2k`.
    pub fn number_to_simple(number: i64) -> String {
        words::number_to_simple(number)
    }

    /// Chinese numerals, optionally in financial (traditional) digits.
    pub fn number_to_chinese(number: f64, traditional: bool) -> Result<String> {
        chinese::format(number, traditional, false)
    }

    /// Chinese money amount in financial digits, e.g. `壹仟零贰拾肆元整`.
    pub fn digit_to_chinese(amount: f64) -> Result<String> {
        chinese::format(amount, true, true)
    }

    /// Parse Chinese numerals.
    pub fn chinese_to_number(text: &str) -> Result<i64> {
        chinese::chinese_to_number(text)
    }

    /// Parse a Chinese money amount.
    pub fn chinese_money_to_number(text: &str) -> Result<Decimal> {
        chinese::chinese_money_to_number(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CodeMatcher, FnConverter};
    use serde::Deserialize;

    fn color() -> Arc<EnumDef> {
        Arc::new(EnumDef::new("Color", ["RED", "GREEN", "BLUE"]))
    }

    #[test]
    fn test_identity_for_instances() {
        let convert = Convert::default();
        let cases = [
            (TargetType::I32, Value::I32(7)),
            (TargetType::String, Value::from("abc")),
            (TargetType::Bool, Value::Bool(true)),
            (TargetType::F64, Value::F64(1.5)),
        ];
        for (target, value) in cases {
            assert_eq!(convert.convert(&target, value.clone()).unwrap(), value);
        }
    }

    #[test]
    fn test_null_yields_default() {
        let convert = Convert::default();
        for (target, default) in [
            (TargetType::I32, Value::I32(3)),
            (TargetType::String, Value::from("d")),
            (TargetType::list(TargetType::I32), Value::list([1i32])),
        ] {
            let out = convert
                .convert_or(Some(&target), Value::Null, default.clone())
                .unwrap();
            assert_eq!(out, default);
        }
    }

    #[test]
    fn test_string_integer_round_trip() {
        let convert = Convert::default();
        let n = convert.convert(&TargetType::I32, "123").unwrap();
        assert_eq!(convert.convert(&TargetType::String, n).unwrap(), Value::from("123"));

        let s = convert.convert(&TargetType::String, 123i32).unwrap();
        assert_eq!(convert.convert(&TargetType::I32, s).unwrap(), Value::I32(123));
    }

    #[test]
    fn test_boolean_vocabulary() {
        let convert = Convert::default();
        let quiet = |v: &str| {
            convert
                .convert_quietly(Some(&TargetType::Bool), v, Value::Null)
                .unwrap()
        };
        assert_eq!(quiet("YES"), Value::Bool(true));
        assert_eq!(quiet("0"), Value::Bool(false));
        assert_eq!(quiet("maybe"), Value::Null);
    }

    #[test]
    fn test_collection_from_string_and_array() {
        let convert = Convert::default();
        let target = TargetType::list(TargetType::I32);
        let expected = Value::list([1i32, 2, 3]);
        assert_eq!(convert.convert(&target, "1,2,3").unwrap(), expected);
        assert_eq!(
            convert.convert(&target, Value::array(["1", "2", "3"])).unwrap(),
            expected
        );
        assert_eq!(convert.to_list::<i32>("3, 2, 1"), Some(vec![3, 2, 1]));
    }

    #[test]
    fn test_enum_conversion() {
        let convert = Convert::default();
        let color = color();
        let target = TargetType::Enum(Arc::clone(&color));
        let red = Value::enum_constant(&color, "RED").unwrap();

        assert_eq!(convert.convert(&target, "RED").unwrap(), red);
        assert_eq!(
            convert.convert_or(Some(&target), "purple", red.clone()).unwrap(),
            red
        );
        let blue = convert.to_enum(&color, 2i32).unwrap();
        assert_eq!(blue.name(), "BLUE");
    }

    #[test]
    fn test_enum_matcher() {
        let convert = Convert::default();
        let status = Arc::new(
            EnumDef::new("Status", ["ACTIVE", "CLOSED"])
                .with_matcher(CodeMatcher::new([(10, "active"), (20, "closed")])),
        );
        let closed = convert.to_enum(&status, "closed").unwrap();
        assert_eq!(closed.name(), "CLOSED");
    }

    #[test]
    fn test_strict_vs_quiet_for_unregistered_type() {
        let convert = Convert::default();
        let target = TargetType::named("Money");

        let err = convert.convert(&target, "12").unwrap_err();
        assert!(matches!(err, ConvertError::NoConverter(_)));

        let fallback = Value::from("n/a");
        let out = convert
            .convert_quietly(Some(&target), "12", fallback.clone())
            .unwrap();
        assert_eq!(out, fallback);
    }

    #[test]
    fn test_quiet_returns_fallback() {
        let convert = Convert::default();
        let target = TargetType::named("Money");
        let out = convert
            .convert_quietly(Some(&target), "12", Value::Null)
            .unwrap();
        assert_eq!(out, Value::Null);

        let fallback = Value::I64(-1);
        let out = convert
            .convert_quietly(Some(&TargetType::I64), "x", fallback.clone())
            .unwrap();
        assert_eq!(out, fallback);
    }

    #[test]
    fn test_quiet_is_idempotent() {
        let convert = Convert::default();
        let before = convert.registry().custom_types().len();
        let first = convert.convert_quietly(Some(&TargetType::I64), "42", Value::Null);
        let second = convert.convert_quietly(Some(&TargetType::I64), "42", Value::Null);
        assert_eq!(first.unwrap(), second.unwrap());
        assert_eq!(convert.registry().custom_types().len(), before);
    }

    #[test]
    fn test_ambiguous_target_escapes_quiet_mode() {
        let convert = Convert::default();
        let err = convert.convert_quietly(None, "1", Value::Null).unwrap_err();
        assert!(matches!(err, ConvertError::AmbiguousTarget));
    }

    #[test]
    fn test_default_mismatch() {
        let convert = Convert::default();
        let err = convert
            .convert_or(Some(&TargetType::I32), "1", "not a number")
            .unwrap_err();
        assert!(matches!(err, ConvertError::DefaultTypeMismatch { .. }));
    }

    #[test]
    fn test_target_inferred_from_default() {
        let convert = Convert::default();
        let out = convert.convert_or(None, "17", 0i64).unwrap();
        assert_eq!(out, Value::I64(17));
    }

    #[test]
    fn test_convert_by_name() {
        let convert = Convert::default();
        assert_eq!(
            convert.convert_by_name("list<long>", "[4, 5]").unwrap(),
            Value::list([4i64, 5])
        );
        assert!(matches!(
            convert.convert_by_name("list<", "1").unwrap_err(),
            ConvertError::UnknownType(_)
        ));
    }

    #[test]
    fn test_convert_with_check() {
        let convert = Convert::default();
        let target = TargetType::named("Nope");
        assert!(convert
            .convert_with_check(Some(&target), "1", Value::Null, false)
            .is_err());
        assert_eq!(
            convert
                .convert_with_check(Some(&target), "1", Value::Null, true)
                .unwrap(),
            Value::Null
        );
    }

    #[test]
    fn test_typed_helpers() {
        let convert = Convert::default();
        assert_eq!(convert.to_int(" 42 "), Some(42));
        assert_eq!(convert.to_long("1_000"), Some(1000));
        assert_eq!(convert.to_u8("300"), None);
        assert_eq!(convert.to_f64("2.5"), Some(2.5));
        assert_eq!(convert.to_bool("on"), Some(true));
        assert_eq!(convert.to_char("xyz"), Some('x'));
        assert_eq!(convert.to_str(12i32), Some("12".to_string()));
        assert_eq!(convert.to_decimal("1.10"), "1.10".parse().ok());
        assert_eq!(
            convert.to_date("2021-07-28"),
            NaiveDate::from_ymd_opt(2021, 7, 28)
        );
        assert_eq!(convert.to_bytes("ab"), Some(b"ab".to_vec()));
        assert_eq!(convert.to_number("12"), Some(Value::I64(12)));
        assert_eq!(convert.to_or::<i32>("oops", -1), -1);
        assert_eq!(convert.to::<i32>("8").unwrap(), Some(8));
        assert_eq!(convert.to::<i32>("eight").unwrap(), None);
    }

    #[test]
    fn test_collection_helpers() {
        let convert = Convert::default();
        let set = convert.to_set::<i32>("1,2,2,3").unwrap();
        assert_eq!(set.len(), 3);

        let map = convert
            .to_map::<String, i32>(Value::map([("a", "1"), ("b", "2")]))
            .unwrap();
        assert_eq!(map.get("b"), Some(&2));
    }

    #[test]
    fn test_register_custom_visible_to_clones() {
        let convert = Convert::default();
        let clone = convert.clone();
        clone.register_custom(
            TargetType::named("Upper"),
            FnConverter::new(|_: &TargetType, v: &Value, _: &Registry| {
                v.as_str().map(|s| Value::from(s.to_uppercase()))
            }),
        );
        assert_eq!(
            convert.convert(&TargetType::named("Upper"), "abc").unwrap(),
            Value::from("ABC")
        );
    }

    #[test]
    fn test_to_struct() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct User {
            name: String,
            age: i32,
            tags: Vec<String>,
        }

        let convert = Convert::default();
        let def = Arc::new(
            BeanDef::new("User")
                .field("name", TargetType::String)
                .field("age", TargetType::I32)
                .field("tags", TargetType::list(TargetType::String)),
        );
        let source = Value::map([
            ("name", Value::from("amy")),
            ("age", Value::from("31")),
            ("tags", Value::from("x,y")),
        ]);
        let user: User = convert.to_struct(def, source).unwrap();
        assert_eq!(
            user,
            User {
                name: "amy".to_string(),
                age: 31,
                tags: vec!["x".to_string(), "y".to_string()],
            }
        );
    }

    #[test]
    fn test_from_config() {
        let config = ConvertConfig {
            list_separator: ";".to_string(),
            ..Default::default()
        };
        let convert = Convert::from_config(config).unwrap();
        assert_eq!(convert.to_list::<i32>("1;2"), Some(vec![1, 2]));

        let bad = ConvertConfig {
            list_separator: String::new(),
            ..Default::default()
        };
        assert!(Convert::from_config(bad).is_err());
    }

    #[test]
    fn test_formatting_pass_through() {
        assert_eq!(
            Convert::number_to_words(100.23).unwrap(),
            "ONE HUNDRED AND CENTS TWENTY THREE ONLY"
        );
        assert_eq!(Convert::number_to_simple(1200), "1.2k");
        assert_eq!(Convert::number_to_chinese(12.0, true).unwrap(), "壹拾贰");
        assert_eq!(Convert::digit_to_chinese(1024.0).unwrap(), "壹仟零贰拾肆元整");
        assert_eq!(Convert::chinese_to_number("两万二").unwrap(), 22000);
        assert_eq!(
            Convert::chinese_money_to_number("叁角贰分").unwrap(),
            Decimal::new(32, 2)
        );
    }
}
