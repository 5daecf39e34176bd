//! Collection conversion.
//!
//! This is where dispatch recurses: every element re-enters the registry
//! with the declared element type.

use tracing::trace;

use crate::core::{Converter, Registry, TargetType, Value};

/// Converts iterables, strings, bytes and scalars to `List(T)` or `Set(T)`.
///
/// A single element that fails to convert fails the whole collection.
#[derive(Debug, Clone, Copy, Default)]
pub struct CollectionConverter;

impl Converter for CollectionConverter {
    fn convert_internal(
        &self,
        target: &TargetType,
        value: &Value,
        registry: &Registry,
    ) -> Option<Value> {
        let (elem, is_set) = match target {
            TargetType::List(elem) => (elem.as_ref(), false),
            TargetType::Set(elem) => (elem.as_ref(), true),
            _ => return None,
        };

        let items = elements_of(value, &registry.config().list_separator)?;
        let converted = convert_elements(elem, items, registry)?;

        Some(if is_set {
            Value::set(converted)
        } else {
            Value::List(converted)
        })
    }
}

/// Split a value into its elements.
///
/// Text like `[a, b]` or `a,b` is split on `separator`; a lone scalar
/// becomes a one-element sequence. Maps and objects have no element form.
pub(crate) fn elements_of(value: &Value, separator: &str) -> Option<Vec<Value>> {
    match value {
        Value::List(items) | Value::Set(items) | Value::Array(items) => Some(items.clone()),
        Value::String(s) => Some(split_text(s, separator)),
        Value::Bytes(data) => Some(data.iter().map(|b| Value::U8(*b)).collect()),
        Value::Shared(inner) => elements_of(inner, separator),
        Value::Map(_) | Value::Object(_) => None,
        other => Some(vec![other.clone()]),
    }
}

fn split_text(text: &str, separator: &str) -> Vec<Value> {
    let trimmed = text.trim();
    let inner = trimmed
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .unwrap_or(trimmed);
    if inner.trim().is_empty() {
        return Vec::new();
    }
    inner
        .split(separator)
        .map(|part| Value::from(part.trim()))
        .collect()
}

/// Convert every element, or nothing at all.
pub(crate) fn convert_elements(
    elem: &TargetType,
    items: Vec<Value>,
    registry: &Registry,
) -> Option<Vec<Value>> {
    items
        .iter()
        .map(|item| convert_element(elem, item, registry))
        .collect()
}

/// Convert one element through dispatch. Nulls stay null.
pub(crate) fn convert_element(elem: &TargetType, item: &Value, registry: &Registry) -> Option<Value> {
    if item.is_null() {
        return Some(Value::Null);
    }
    match registry.convert(Some(elem), item, &Value::Null) {
        Ok(converted) if !converted.is_null() => Some(converted),
        Ok(_) => {
            trace!("Element {:?} did not convert to {}", item, elem);
            None
        }
        Err(e) => {
            trace!("Element {:?} failed: {}", item, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConvertConfig;

    fn convert(target: TargetType, value: impl Into<Value>) -> Value {
        Registry::default()
            .convert(Some(&target), &value.into(), &Value::Null)
            .unwrap()
    }

    #[test]
    fn test_comma_separated_string() {
        let out = convert(TargetType::list(TargetType::I32), "1, 2,3");
        assert_eq!(out, Value::list([1i32, 2, 3]));
        let out = convert(TargetType::list(TargetType::I32), "[4,5]");
        assert_eq!(out, Value::list([4i32, 5]));
        let out = convert(TargetType::list(TargetType::I32), "  ");
        assert_eq!(out, Value::List(vec![]));
    }

    #[test]
    fn test_native_array_preserves_order() {
        let out = convert(TargetType::list(TargetType::I32), Value::array(["3", "1", "2"]));
        assert_eq!(out, Value::list([3i32, 1, 2]));
    }

    #[test]
    fn test_list_elements_reconverted() {
        let out = convert(TargetType::list(TargetType::String), Value::list([1i32, 2]));
        assert_eq!(out, Value::list(["1", "2"]));
    }

    #[test]
    fn test_element_failure_fails_collection() {
        let registry = Registry::default();
        let fallback = Value::list([0i32]);
        let out = registry
            .convert(
                Some(&TargetType::list(TargetType::I32)),
                &Value::from("1,x,3"),
                &fallback,
            )
            .unwrap();
        assert_eq!(out, fallback);
    }

    #[test]
    fn test_set_dedups_first_occurrence() {
        let out = convert(TargetType::set(TargetType::I64), "3,1,3,2,1");
        assert_eq!(out, Value::set([3i64, 1, 2]));
    }

    #[test]
    fn test_scalar_becomes_singleton() {
        let out = convert(TargetType::list(TargetType::I64), 5i32);
        assert_eq!(out, Value::list([5i64]));
    }

    #[test]
    fn test_untyped_elements_kept() {
        let out = convert(TargetType::list(TargetType::Any), Value::array([1i32, 2]));
        assert_eq!(out, Value::list([1i32, 2]));
    }

    #[test]
    fn test_custom_separator() {
        let config = ConvertConfig {
            list_separator: ";".to_string(),
            ..Default::default()
        };
        let out = Registry::with_builtins(config)
            .convert(
                Some(&TargetType::list(TargetType::String)),
                &Value::from("a;b, c"),
                &Value::Null,
            )
            .unwrap();
        assert_eq!(out, Value::list(["a", "b, c"]));
    }

    #[test]
    fn test_nested_collections() {
        let out = convert(
            TargetType::list(TargetType::list(TargetType::U8)),
            Value::list(["1,2", "3"]),
        );
        assert_eq!(
            out,
            Value::List(vec![Value::list([1u8, 2]), Value::list([3u8])])
        );
    }
}
