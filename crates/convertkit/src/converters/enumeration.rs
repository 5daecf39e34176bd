//! Enum conversion.

use std::sync::Arc;

use crate::core::{Converter, EnumValue, Registry, TargetType, Value};

/// Converts names, matcher-recognized values and ordinals to enum constants.
///
/// Matching order: exact constant name, then the enum's own
/// [`EnumMatcher`](crate::core::EnumMatcher) if it has one, then integer
/// ordinal.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnumConverter;

impl Converter for EnumConverter {
    fn convert_internal(
        &self,
        target: &TargetType,
        value: &Value,
        registry: &Registry,
    ) -> Option<Value> {
        let TargetType::Enum(def) = target else {
            return None;
        };

        let name = match value {
            Value::String(s) => Some(s.trim()),
            Value::Enum(e) => Some(e.name()),
            Value::Shared(inner) => return self.convert_internal(target, inner, registry),
            _ => None,
        };
        if let Some(constant) = name.and_then(|n| EnumValue::named(def, n)) {
            return Some(Value::Enum(constant));
        }

        if let Some(ordinal) = def
            .matcher()
            .and_then(|matcher| matcher.match_constant(def, value))
        {
            return EnumValue::new(Arc::clone(def), ordinal).map(Value::Enum);
        }

        let ordinal = usize::try_from(value.as_i128()?).ok()?;
        EnumValue::new(Arc::clone(def), ordinal).map(Value::Enum)
    }
}
