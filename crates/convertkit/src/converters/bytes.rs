//! Byte buffer conversion.

use crate::core::{Converter, Registry, TargetType, Value};

/// Converts strings, numbers, UUIDs and small-integer sequences to `Bytes`.
///
/// Numbers are written little-endian at their own width.
#[derive(Debug, Clone, Copy, Default)]
pub struct BytesConverter;

impl Converter for BytesConverter {
    fn convert_internal(
        &self,
        target: &TargetType,
        value: &Value,
        registry: &Registry,
    ) -> Option<Value> {
        let data = match value {
            Value::String(s) => s.as_bytes().to_vec(),
            Value::Char(c) => c.to_string().into_bytes(),
            Value::I8(v) => v.to_le_bytes().to_vec(),
            Value::I16(v) => v.to_le_bytes().to_vec(),
            Value::I32(v) => v.to_le_bytes().to_vec(),
            Value::I64(v) => v.to_le_bytes().to_vec(),
            Value::I128(v) => v.to_le_bytes().to_vec(),
            Value::U8(v) => vec![*v],
            Value::U16(v) => v.to_le_bytes().to_vec(),
            Value::U32(v) => v.to_le_bytes().to_vec(),
            Value::U64(v) => v.to_le_bytes().to_vec(),
            Value::F32(v) => v.to_le_bytes().to_vec(),
            Value::F64(v) => v.to_le_bytes().to_vec(),
            Value::Uuid(u) => u.as_bytes().to_vec(),
            Value::List(items) | Value::Set(items) | Value::Array(items) => items
                .iter()
                .map(to_byte)
                .collect::<Option<Vec<u8>>>()?,
            Value::Shared(inner) => return self.convert_internal(target, inner, registry),
            _ => return None,
        };
        Some(Value::Bytes(data))
    }
}

/// Signed or unsigned byte-sized integer as a raw byte.
fn to_byte(value: &Value) -> Option<u8> {
    let v = value.as_i128()?;
    if (-128..=255).contains(&v) {
        Some(v as u8)
    } else {
        None
    }
}
