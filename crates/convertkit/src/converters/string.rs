//! String conversion.

use crate::core::{Converter, Registry, TargetType, Value};

/// Renders any value through its canonical display form.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringConverter;

impl Converter for StringConverter {
    fn convert_internal(&self, _: &TargetType, value: &Value, _: &Registry) -> Option<Value> {
        Some(Value::String(value.to_string()))
    }
}
