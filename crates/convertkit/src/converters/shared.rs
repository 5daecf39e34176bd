//! Shared reference conversion.

use std::sync::Arc;

use crate::core::{Converter, Registry, TargetType, Value};

/// Converts the inner value through dispatch and wraps it in `Shared`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SharedConverter;

impl Converter for SharedConverter {
    fn convert_internal(
        &self,
        target: &TargetType,
        value: &Value,
        registry: &Registry,
    ) -> Option<Value> {
        let inner_type = match target {
            TargetType::Shared(inner) => inner.as_ref(),
            _ => &TargetType::Any,
        };
        let source = match value {
            Value::Shared(inner) => inner.as_ref(),
            other => other,
        };

        let converted = registry
            .convert_quietly(Some(inner_type), source, &Value::Null)
            .ok()?;
        if converted.is_null() {
            return None;
        }
        Some(Value::Shared(Arc::new(converted)))
    }
}
