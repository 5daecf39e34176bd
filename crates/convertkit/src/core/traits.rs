//! Core traits for the conversion engine.
//!
//! - [`Converter`]: one coercion policy for a family of target types
//! - [`FromValue`]: typed extraction from a converted [`Value`]
//!
//! # Design Patterns
//!
//! - **Strategy**: each converter encapsulates one family's parsing rules
//! - **Template Method**: [`Converter::convert`] wraps the type-specific
//!   [`Converter::convert_internal`] with the shared null/default handling

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::hash::Hash;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use tracing::trace;
use uuid::Uuid;

use crate::error::{ConvertError, Result};

use super::registry::Registry;
use super::target::TargetType;
use super::value::Value;

/// Convert a value into one family of target types.
///
/// Implementations must not mutate their own configuration once
/// registered; the registry shares them across threads.
pub trait Converter: Send + Sync {
    /// Type-specific conversion.
    ///
    /// Returns `None` when the value cannot be coerced. `value` is never
    /// null here, and `target` is never `Any`.
    fn convert_internal(&self, target: &TargetType, value: &Value, registry: &Registry)
        -> Option<Value>;

    /// Convert `value`, falling back to `default` when it cannot be coerced.
    ///
    /// Only an unresolvable target (an `Any` target with a null default)
    /// is an error.
    fn convert(
        &self,
        target: &TargetType,
        value: &Value,
        default: &Value,
        registry: &Registry,
    ) -> Result<Value> {
        let target = if target.is_opaque() {
            if default.is_null() {
                return Err(ConvertError::AmbiguousTarget);
            }
            Cow::Owned(default.value_type())
        } else {
            Cow::Borrowed(target)
        };

        if value.is_null() {
            return Ok(default.clone());
        }

        if !target.needs_element_conversion() && value.is_instance_of(&target) {
            return Ok(value.clone());
        }

        match self.convert_internal(&target, value, registry) {
            Some(converted) => Ok(converted),
            None => {
                trace!("{} did not convert {:?}, using default", target, value);
                Ok(default.clone())
            }
        }
    }
}

/// Adapts a closure into a [`Converter`].
///
/// ```rust
/// use convertkit::core::{FnConverter, Registry, TargetType, Value};
///
/// let registry = Registry::default();
/// registry.register_custom(
///     TargetType::named("Upper"),
///     FnConverter::new(|_, value: &Value, _: &Registry| {
///         value.as_str().map(|s| Value::from(s.to_uppercase()))
///     }),
/// );
/// ```
pub struct FnConverter<F>(F);

impl<F> FnConverter<F>
where
    F: Fn(&TargetType, &Value, &Registry) -> Option<Value> + Send + Sync,
{
    /// Wrap a closure.
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

impl<F> Converter for FnConverter<F>
where
    F: Fn(&TargetType, &Value, &Registry) -> Option<Value> + Send + Sync,
{
    fn convert_internal(
        &self,
        target: &TargetType,
        value: &Value,
        registry: &Registry,
    ) -> Option<Value> {
        (self.0)(target, value, registry)
    }
}

/// Extract a native Rust value from a converted [`Value`].
///
/// `target_type` tells the registry what to produce; `from_value` then
/// unwraps the matching variant.
pub trait FromValue: Sized {
    /// Target type describing `Self`.
    fn target_type() -> TargetType;

    /// Unwrap the variant produced for [`FromValue::target_type`].
    fn from_value(value: Value) -> Option<Self>;
}

macro_rules! impl_from_value {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl FromValue for $ty {
                fn target_type() -> TargetType {
                    TargetType::$variant
                }

                fn from_value(value: Value) -> Option<Self> {
                    match value {
                        Value::$variant(v) => Some(v),
                        _ => None,
                    }
                }
            }
        )*
    };
}

impl_from_value! {
    bool => Bool,
    char => Char,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    i128 => I128,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    f32 => F32,
    f64 => F64,
    Decimal => Decimal,
    String => String,
    NaiveDate => Date,
    NaiveTime => Time,
    NaiveDateTime => DateTime,
    DateTime<FixedOffset> => DateTimeTz,
    Duration => Duration,
    Uuid => Uuid,
    PathBuf => Path,
}

impl FromValue for Value {
    fn target_type() -> TargetType {
        TargetType::Any
    }

    fn from_value(value: Value) -> Option<Self> {
        Some(value)
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn target_type() -> TargetType {
        TargetType::list(T::target_type())
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::List(items) | Value::Set(items) | Value::Array(items) => {
                items.into_iter().map(T::from_value).collect()
            }
            _ => None,
        }
    }
}

impl<T: FromValue + Eq + Hash> FromValue for HashSet<T> {
    fn target_type() -> TargetType {
        TargetType::set(T::target_type())
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::List(items) | Value::Set(items) | Value::Array(items) => {
                items.into_iter().map(T::from_value).collect()
            }
            _ => None,
        }
    }
}

impl<K: FromValue + Eq + Hash, V: FromValue> FromValue for HashMap<K, V> {
    fn target_type() -> TargetType {
        TargetType::map(K::target_type(), V::target_type())
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Map(entries) => entries
                .into_iter()
                .map(|(k, v)| Some((K::from_value(k)?, V::from_value(v)?)))
                .collect(),
            _ => None,
        }
    }
}

impl<K: FromValue + Ord, V: FromValue> FromValue for BTreeMap<K, V> {
    fn target_type() -> TargetType {
        TargetType::map(K::target_type(), V::target_type())
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Map(entries) => entries
                .into_iter()
                .map(|(k, v)| Some((K::from_value(k)?, V::from_value(v)?)))
                .collect(),
            _ => None,
        }
    }
}

impl<T: FromValue> FromValue for Arc<T> {
    fn target_type() -> TargetType {
        TargetType::shared(T::target_type())
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Shared(inner) => {
                let inner = Arc::try_unwrap(inner).unwrap_or_else(|shared| (*shared).clone());
                T::from_value(inner).map(Arc::new)
            }
            _ => None,
        }
    }
}
