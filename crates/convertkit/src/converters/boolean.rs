//! Boolean conversion.

use crate::core::{Converter, Registry, TargetType, Value};

use super::number::to_number;

const TRUE_WORDS: &[&str] = &[
    "true", "yes", "y", "t", "ok", "1", "on", "是", "对", "真", "對", "√",
];

const FALSE_WORDS: &[&str] = &[
    "false", "no", "n", "f", "0", "off", "否", "错", "假", "錯", "×",
];

/// Converts truthy and falsy words or numbers to `Bool`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanConverter;

impl Converter for BooleanConverter {
    fn convert_internal(
        &self,
        target: &TargetType,
        value: &Value,
        registry: &Registry,
    ) -> Option<Value> {
        match value {
            Value::String(s) => parse_bool(s).map(Value::Bool),
            Value::Char(c) => parse_bool(c.encode_utf8(&mut [0; 4])).map(Value::Bool),
            Value::Shared(inner) => self.convert_internal(target, inner, registry),
            other if other.is_numeric() => to_number(other).map(|n| Value::Bool(n.is_nonzero())),
            _ => None,
        }
    }
}

/// Match a word against the boolean vocabulary, ignoring case and padding.
pub fn parse_bool(text: &str) -> Option<bool> {
    let word = text.trim().to_lowercase();
    if TRUE_WORDS.contains(&word.as_str()) {
        Some(true)
    } else if FALSE_WORDS.contains(&word.as_str()) {
        Some(false)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quietly(value: impl Into<Value>) -> Value {
        Registry::default()
            .convert_quietly(Some(&TargetType::Bool), &value.into(), &Value::Null)
            .unwrap()
    }

    #[test]
    fn test_vocabulary() {
        assert_eq!(quietly("YES"), Value::Bool(true));
        assert_eq!(quietly(" on "), Value::Bool(true));
        assert_eq!(quietly("是"), Value::Bool(true));
        assert_eq!(quietly("√"), Value::Bool(true));
        assert_eq!(quietly("0"), Value::Bool(false));
        assert_eq!(quietly("Off"), Value::Bool(false));
        assert_eq!(quietly("錯"), Value::Bool(false));
        assert_eq!(quietly('×'), Value::Bool(false));
    }

    #[test]
    fn test_unrecognized_is_default() {
        assert_eq!(quietly("maybe"), Value::Null);
        assert_eq!(quietly(""), Value::Null);
    }

    #[test]
    fn test_numbers() {
        assert_eq!(quietly(2i32), Value::Bool(true));
        assert_eq!(quietly(0u8), Value::Bool(false));
        assert_eq!(quietly(0.5f64), Value::Bool(true));
    }
}
