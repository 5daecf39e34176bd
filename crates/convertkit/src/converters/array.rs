//! Array conversion.

use crate::core::{Converter, Registry, TargetType, Value};

use super::collection::{convert_elements, elements_of};

/// Converts sequences, strings and scalars to `Array(T)`.
///
/// The registry treats a failed array conversion as "did not apply" and
/// keeps dispatching.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArrayConverter;

impl Converter for ArrayConverter {
    fn convert_internal(
        &self,
        target: &TargetType,
        value: &Value,
        registry: &Registry,
    ) -> Option<Value> {
        let TargetType::Array(elem) = target else {
            return None;
        };
        let items = elements_of(value, &registry.config().list_separator)?;
        convert_elements(elem, items, registry).map(Value::Array)
    }
}
