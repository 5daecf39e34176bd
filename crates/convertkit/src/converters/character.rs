//! Character conversion.

use crate::core::{Converter, Registry, TargetType, Value};

/// Converts strings (first character) and code points to `Char`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CharConverter;

impl Converter for CharConverter {
    fn convert_internal(
        &self,
        target: &TargetType,
        value: &Value,
        registry: &Registry,
    ) -> Option<Value> {
        match value {
            Value::String(s) if !s.trim().is_empty() => s.chars().next().map(Value::Char),
            Value::Shared(inner) => self.convert_internal(target, inner, registry),
            other => other
                .as_i128()
                .and_then(|code| u32::try_from(code).ok())
                .and_then(char::from_u32)
                .map(Value::Char),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn convert(value: impl Into<Value>) -> Value {
        Registry::default()
            .convert(Some(&TargetType::Char), &value.into(), &Value::Null)
            .unwrap()
    }

    #[test]
    fn test_first_char() {
        assert_eq!(convert("abc"), Value::Char('a'));
        assert_eq!(convert("中文"), Value::Char('中'));
        assert_eq!(convert("   "), Value::Null);
    }

    #[test]
    fn test_code_point() {
        assert_eq!(convert(65i32), Value::Char('A'));
        assert_eq!(convert(-1i32), Value::Null);
        assert_eq!(convert(0xD800u32), Value::Null);
    }
}
