//! Identifier conversions: UUIDs and filesystem paths.

use std::path::PathBuf;

use uuid::Uuid;

use crate::core::{Converter, Registry, TargetType, Value};

/// Converts hyphenated, simple or braced text and 16-byte buffers to `Uuid`.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidConverter;

impl Converter for UuidConverter {
    fn convert_internal(
        &self,
        target: &TargetType,
        value: &Value,
        registry: &Registry,
    ) -> Option<Value> {
        match value {
            Value::String(s) => Uuid::parse_str(s.trim()).ok().map(Value::Uuid),
            Value::Bytes(data) => Uuid::from_slice(data).ok().map(Value::Uuid),
            Value::Shared(inner) => self.convert_internal(target, inner, registry),
            _ => None,
        }
    }
}

/// Converts text to `Path`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathConverter;

impl Converter for PathConverter {
    fn convert_internal(
        &self,
        target: &TargetType,
        value: &Value,
        registry: &Registry,
    ) -> Option<Value> {
        match value {
            Value::String(s) if !s.is_empty() => Some(Value::Path(PathBuf::from(s))),
            Value::Shared(inner) => self.convert_internal(target, inner, registry),
            _ => None,
        }
    }
}
