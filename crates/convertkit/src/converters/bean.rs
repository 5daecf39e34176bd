//! Bean population.
//!
//! Builds an [`Object`] for a [`BeanDef`] from a map or another object,
//! converting each field through dispatch.

use std::collections::HashMap;

use crate::core::{Converter, Object, Registry, TargetType, Value};

/// Populates `Bean(def)` targets field by field.
///
/// Each field is looked up by caller mapping, then exact name, then (when
/// `relaxed_field_names` is on) ignoring case, `_` and `-`. Field values
/// are converted quietly: a value that does not convert, or a missing
/// one, leaves the field's default.
#[derive(Debug, Clone, Default)]
pub struct BeanConverter {
    /// Target field name → source key.
    field_mapping: HashMap<String, String>,
}

impl BeanConverter {
    /// Create a converter without field mappings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read `field` from `source_key` in the input.
    pub fn with_field_mapping(
        mut self,
        source_key: impl Into<String>,
        field: impl Into<String>,
    ) -> Self {
        self.field_mapping.insert(field.into(), source_key.into());
        self
    }

    fn lookup<'a>(
        &self,
        source: &[(String, &'a Value)],
        field: &str,
        relaxed: bool,
    ) -> Option<&'a Value> {
        let exact = |key: &str| source.iter().find(|(k, _)| k == key).map(|(_, v)| *v);

        if let Some(found) = self.field_mapping.get(field).and_then(|key| exact(key)) {
            return Some(found);
        }
        if let Some(found) = exact(field) {
            return Some(found);
        }
        if !relaxed {
            return None;
        }
        let wanted = normalize(field);
        source
            .iter()
            .find(|(k, _)| normalize(k) == wanted)
            .map(|(_, v)| *v)
    }
}

fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| *c != '_' && *c != '-')
        .flat_map(char::to_lowercase)
        .collect()
}

impl Converter for BeanConverter {
    fn convert_internal(
        &self,
        target: &TargetType,
        value: &Value,
        registry: &Registry,
    ) -> Option<Value> {
        let TargetType::Bean(def) = target else {
            return None;
        };

        let source: Vec<(String, &Value)> = match value {
            Value::Map(entries) => entries.iter().map(|(k, v)| (k.to_string(), v)).collect(),
            Value::Object(object) => object.fields().iter().map(|(k, v)| (k.clone(), v)).collect(),
            Value::Shared(inner) => return self.convert_internal(target, inner, registry),
            _ => return None,
        };

        let relaxed = registry.config().relaxed_field_names;
        let mut object = Object::new(def.name());
        for field in def.fields() {
            let converted = match self.lookup(&source, &field.name, relaxed) {
                Some(v) if !v.is_null() => registry
                    .convert_quietly(Some(&field.ty), v, &field.default)
                    .unwrap_or_else(|_| field.default.clone()),
                _ => field.default.clone(),
            };
            object.set(field.name.clone(), converted);
        }
        Some(Value::Object(object))
    }
}
