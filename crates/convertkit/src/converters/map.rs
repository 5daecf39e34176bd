//! Map conversion.

use crate::core::{Converter, Registry, TargetType, Value};

use super::collection::convert_element;

/// Converts maps and bean objects to `Map(K, V)`.
///
/// Keys and values are re-converted even when the input is already a map,
/// since the declared argument types may differ from the runtime ones.
/// A later duplicate key replaces the earlier entry.
#[derive(Debug, Clone, Copy, Default)]
pub struct MapConverter;

impl Converter for MapConverter {
    fn convert_internal(
        &self,
        target: &TargetType,
        value: &Value,
        registry: &Registry,
    ) -> Option<Value> {
        let TargetType::Map(key_type, value_type) = target else {
            return None;
        };

        let entries: Vec<(Value, Value)> = match value {
            Value::Map(entries) => entries.clone(),
            Value::Object(object) => object
                .fields()
                .iter()
                .map(|(name, v)| (Value::from(name.as_str()), v.clone()))
                .collect(),
            Value::Shared(inner) => return self.convert_internal(target, inner, registry),
            _ => return None,
        };

        let converted = entries
            .iter()
            .map(|(k, v)| {
                Some((
                    convert_element(key_type, k, registry)?,
                    convert_element(value_type, v, registry)?,
                ))
            })
            .collect::<Option<Vec<_>>>()?;

        Some(Value::map(converted))
    }
}
