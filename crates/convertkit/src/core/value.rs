//! Dynamic value model.
//!
//! [`Value`] is the owned, runtime-typed representation that flows through
//! the registry. Every converter consumes a `&Value` and produces a `Value`
//! whose variant matches the requested [`TargetType`].

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::target::{EnumDef, TargetType};

/// Owned dynamic value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absent value.
    Null,

    Bool(bool),
    Char(char),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    I128(i128),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),

    /// Exact decimal value.
    Decimal(Decimal),

    String(String),

    /// Raw byte buffer.
    Bytes(Vec<u8>),

    /// Date without time component.
    Date(NaiveDate),

    /// Time without date component.
    Time(NaiveTime),

    /// Timestamp without timezone.
    DateTime(NaiveDateTime),

    /// Timestamp with timezone offset.
    DateTimeTz(DateTime<FixedOffset>),

    Duration(Duration),
    Uuid(Uuid),
    Path(PathBuf),

    /// Ordered sequence.
    List(Vec<Value>),

    /// Insertion-ordered unique elements. Use [`Value::set`] to build one.
    Set(Vec<Value>),

    /// Fixed-shape sequence.
    Array(Vec<Value>),

    /// Insertion-ordered entries.
    Map(Vec<(Value, Value)>),

    /// Shared reference to another value.
    Shared(Arc<Value>),

    /// Enum constant.
    Enum(EnumValue),

    /// Bean instance.
    Object(Object),
}

/// A constant of an enum described by an [`EnumDef`].
#[derive(Debug, Clone, PartialEq)]
pub struct EnumValue {
    def: Arc<EnumDef>,
    ordinal: usize,
}

impl EnumValue {
    /// Constant at `ordinal`, or `None` when out of range.
    pub fn new(def: Arc<EnumDef>, ordinal: usize) -> Option<Self> {
        (ordinal < def.constants().len()).then_some(Self { def, ordinal })
    }

    /// Constant with exactly this name.
    pub fn named(def: &Arc<EnumDef>, constant: &str) -> Option<Self> {
        let ordinal = def.ordinal_of(constant)?;
        Some(Self {
            def: Arc::clone(def),
            ordinal,
        })
    }

    /// Definition this constant belongs to.
    pub fn def(&self) -> &Arc<EnumDef> {
        &self.def
    }

    /// Position of the constant in declaration order.
    pub fn ordinal(&self) -> usize {
        self.ordinal
    }

    /// Constant name.
    pub fn name(&self) -> &str {
        // ordinal is range-checked at construction
        &self.def.constants()[self.ordinal]
    }
}

/// A populated bean: a type name and its fields in order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Object {
    type_name: String,
    fields: Vec<(String, Value)>,
}

impl Object {
    /// Create an empty object of the given type.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            fields: Vec::new(),
        }
    }

    /// Builder-style field setter.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    /// Set a field, replacing an existing one with the same name.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((name, value)),
        }
    }

    /// Field value by exact name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Type name.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Fields in order.
    pub fn fields(&self) -> &[(String, Value)] {
        &self.fields
    }
}

impl Value {
    /// Build a byte buffer value.
    pub fn bytes(data: impl Into<Vec<u8>>) -> Self {
        Value::Bytes(data.into())
    }

    /// Build a list from anything convertible into values.
    pub fn list<T: Into<Value>>(items: impl IntoIterator<Item = T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }

    /// Build an array from anything convertible into values.
    pub fn array<T: Into<Value>>(items: impl IntoIterator<Item = T>) -> Self {
        Value::Array(items.into_iter().map(Into::into).collect())
    }

    /// Build a set, keeping the first occurrence of each element.
    pub fn set<T: Into<Value>>(items: impl IntoIterator<Item = T>) -> Self {
        let mut unique: Vec<Value> = Vec::new();
        for item in items {
            let item = item.into();
            if !unique.contains(&item) {
                unique.push(item);
            }
        }
        Value::Set(unique)
    }

    /// Build a map; a later duplicate key replaces the earlier entry.
    pub fn map<K: Into<Value>, V: Into<Value>>(entries: impl IntoIterator<Item = (K, V)>) -> Self {
        let mut out: Vec<(Value, Value)> = Vec::new();
        for (k, v) in entries {
            let k = k.into();
            let v = v.into();
            match out.iter_mut().find(|(existing, _)| *existing == k) {
                Some(slot) => slot.1 = v,
                None => out.push((k, v)),
            }
        }
        Value::Map(out)
    }

    /// Wrap into a shared reference.
    pub fn shared(inner: impl Into<Value>) -> Self {
        Value::Shared(Arc::new(inner.into()))
    }

    /// Constant of `def` with exactly this name.
    pub fn enum_constant(def: &Arc<EnumDef>, constant: &str) -> Option<Self> {
        EnumValue::named(def, constant).map(Value::Enum)
    }

    /// Check if this value is null.
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// True for the numeric variants.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            Value::I8(_)
                | Value::I16(_)
                | Value::I32(_)
                | Value::I64(_)
                | Value::I128(_)
                | Value::U8(_)
                | Value::U16(_)
                | Value::U32(_)
                | Value::U64(_)
                | Value::F32(_)
                | Value::F64(_)
                | Value::Decimal(_)
        )
    }

    /// Integral variants widened to `i128`.
    pub fn as_i128(&self) -> Option<i128> {
        match self {
            Value::I8(v) => Some(i128::from(*v)),
            Value::I16(v) => Some(i128::from(*v)),
            Value::I32(v) => Some(i128::from(*v)),
            Value::I64(v) => Some(i128::from(*v)),
            Value::I128(v) => Some(*v),
            Value::U8(v) => Some(i128::from(*v)),
            Value::U16(v) => Some(i128::from(*v)),
            Value::U32(v) => Some(i128::from(*v)),
            Value::U64(v) => Some(i128::from(*v)),
            _ => None,
        }
    }

    /// Any numeric variant as `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::F32(v) => Some(f64::from(*v)),
            Value::F64(v) => Some(*v),
            Value::Decimal(d) => d.to_f64(),
            other => other.as_i128().map(|v| v as f64),
        }
    }

    /// Borrow the string payload.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Elements of a list, set or array.
    pub fn as_elements(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) | Value::Set(items) | Value::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Runtime type of this value, with container arguments erased.
    ///
    /// Used to infer a target from a caller's default value.
    pub fn value_type(&self) -> TargetType {
        match self {
            Value::Null => TargetType::Any,
            Value::Bool(_) => TargetType::Bool,
            Value::Char(_) => TargetType::Char,
            Value::I8(_) => TargetType::I8,
            Value::I16(_) => TargetType::I16,
            Value::I32(_) => TargetType::I32,
            Value::I64(_) => TargetType::I64,
            Value::I128(_) => TargetType::I128,
            Value::U8(_) => TargetType::U8,
            Value::U16(_) => TargetType::U16,
            Value::U32(_) => TargetType::U32,
            Value::U64(_) => TargetType::U64,
            Value::F32(_) => TargetType::F32,
            Value::F64(_) => TargetType::F64,
            Value::Decimal(_) => TargetType::Decimal,
            Value::String(_) => TargetType::String,
            Value::Bytes(_) => TargetType::Bytes,
            Value::Date(_) => TargetType::Date,
            Value::Time(_) => TargetType::Time,
            Value::DateTime(_) => TargetType::DateTime,
            Value::DateTimeTz(_) => TargetType::DateTimeTz,
            Value::Duration(_) => TargetType::Duration,
            Value::Uuid(_) => TargetType::Uuid,
            Value::Path(_) => TargetType::Path,
            Value::List(_) => TargetType::list(TargetType::Any),
            Value::Set(_) => TargetType::set(TargetType::Any),
            Value::Array(_) => TargetType::array(TargetType::Any),
            Value::Map(_) => TargetType::map(TargetType::Any, TargetType::Any),
            Value::Shared(_) => TargetType::shared(TargetType::Any),
            Value::Enum(e) => TargetType::Enum(Arc::clone(e.def())),
            Value::Object(o) => TargetType::Named(o.type_name().to_string()),
        }
    }

    /// True when this value already satisfies `target`.
    ///
    /// Container targets check every element against the declared
    /// argument types; `Any` arguments accept anything.
    pub fn is_instance_of(&self, target: &TargetType) -> bool {
        match (target, self) {
            (TargetType::Any, _) => true,
            (TargetType::Number, v) => v.is_numeric(),
            (TargetType::List(t), Value::List(items))
            | (TargetType::Set(t), Value::Set(items))
            | (TargetType::Array(t), Value::Array(items)) => {
                items.iter().all(|item| item.is_instance_of(t))
            }
            (TargetType::Map(k, v), Value::Map(entries)) => entries
                .iter()
                .all(|(key, value)| key.is_instance_of(k) && value.is_instance_of(v)),
            (TargetType::Shared(t), Value::Shared(inner)) => inner.is_instance_of(t),
            (TargetType::Enum(def), Value::Enum(e)) => e.def().as_ref() == def.as_ref(),
            (TargetType::Bean(def), Value::Object(o)) => o.type_name() == def.name(),
            (TargetType::Named(name), Value::Object(o)) => o.type_name() == name,
            (t, _) if !t.type_args().is_empty() => false,
            (t, v) => !v.is_null() && v.value_type() == *t,
        }
    }

    /// Convert to a JSON value.
    ///
    /// Decimals and integers wider than 64 bits become strings so no
    /// precision is lost; temporal values use their display form.
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value as Json;

        match self {
            Value::Null => Json::Null,
            Value::Bool(b) => Json::Bool(*b),
            Value::I8(_) | Value::I16(_) | Value::I32(_) | Value::I64(_) => {
                self.as_i128()
                    .and_then(|v| i64::try_from(v).ok())
                    .map_or(Json::Null, Json::from)
            }
            Value::U8(_) | Value::U16(_) | Value::U32(_) | Value::U64(_) => self
                .as_i128()
                .and_then(|v| u64::try_from(v).ok())
                .map_or(Json::Null, Json::from),
            Value::I128(v) => match i64::try_from(*v) {
                Ok(small) => Json::from(small),
                Err(_) => Json::String(v.to_string()),
            },
            Value::F32(v) => serde_json::Number::from_f64(f64::from(*v)).map_or(Json::Null, Json::Number),
            Value::F64(v) => serde_json::Number::from_f64(*v).map_or(Json::Null, Json::Number),
            Value::Bytes(data) => Json::Array(data.iter().map(|b| Json::from(*b)).collect()),
            Value::List(items) | Value::Set(items) | Value::Array(items) => {
                Json::Array(items.iter().map(Value::to_json).collect())
            }
            Value::Map(entries) => Json::Object(
                entries
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_json()))
                    .collect(),
            ),
            Value::Shared(inner) => inner.to_json(),
            Value::Object(o) => Json::Object(
                o.fields()
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
            other => Json::String(other.to_string()),
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        use serde_json::Value as Json;

        match json {
            Json::Null => Value::Null,
            Json::Bool(b) => Value::Bool(b),
            Json::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::I64(i)
                } else if let Some(u) = n.as_u64() {
                    Value::U64(u)
                } else {
                    n.as_f64().map_or(Value::Null, Value::F64)
                }
            }
            Json::String(s) => Value::String(s),
            Json::Array(items) => Value::List(items.into_iter().map(Value::from).collect()),
            Json::Object(fields) => Value::Map(
                fields
                    .into_iter()
                    .map(|(k, v)| (Value::String(k), Value::from(v)))
                    .collect(),
            ),
        }
    }
}

fn write_joined<'a, I>(f: &mut fmt::Formatter<'_>, items: I) -> fmt::Result
where
    I: IntoIterator<Item = &'a Value>,
{
    for (i, item) in items.into_iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(v) => write!(f, "{}", v),
            Value::Char(v) => write!(f, "{}", v),
            Value::I8(v) => write!(f, "{}", v),
            Value::I16(v) => write!(f, "{}", v),
            Value::I32(v) => write!(f, "{}", v),
            Value::I64(v) => write!(f, "{}", v),
            Value::I128(v) => write!(f, "{}", v),
            Value::U8(v) => write!(f, "{}", v),
            Value::U16(v) => write!(f, "{}", v),
            Value::U32(v) => write!(f, "{}", v),
            Value::U64(v) => write!(f, "{}", v),
            Value::F32(v) => write!(f, "{}", v),
            Value::F64(v) => write!(f, "{}", v),
            Value::Decimal(v) => write!(f, "{}", v),
            Value::String(v) => write!(f, "{}", v),
            Value::Bytes(data) => match std::str::from_utf8(data) {
                Ok(s) => write!(f, "{}", s),
                Err(_) => {
                    for b in data {
                        write!(f, "{:02x}", b)?;
                    }
                    Ok(())
                }
            },
            Value::Date(v) => write!(f, "{}", v.format("%Y-%m-%d")),
            Value::Time(v) => write!(f, "{}", v.format("%H:%M:%S")),
            Value::DateTime(v) => write!(f, "{}", v.format("%Y-%m-%d %H:%M:%S")),
            Value::DateTimeTz(v) => write!(f, "{}", v.to_rfc3339()),
            Value::Duration(v) => write!(f, "{:?}", v),
            Value::Uuid(v) => write!(f, "{}", v),
            Value::Path(v) => write!(f, "{}", v.display()),
            Value::List(items) | Value::Set(items) | Value::Array(items) => {
                write!(f, "[")?;
                write_joined(f, items)?;
                write!(f, "]")
            }
            Value::Map(entries) => {
                write!(f, "{{")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", k, v)?;
                }
                write!(f, "}}")
            }
            Value::Shared(inner) => write!(f, "{}", inner),
            Value::Enum(e) => write!(f, "{}", e.name()),
            Value::Object(o) => {
                write!(f, "{} {{", o.type_name())?;
                for (i, (k, v)) in o.fields().iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, " {}: {}", k, v)?;
                }
                if o.fields().is_empty() {
                    write!(f, "}}")
                } else {
                    write!(f, " }}")
                }
            }
        }
    }
}

// Conversion implementations for convenient construction

macro_rules! impl_from_scalar {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v)
                }
            }
        )*
    };
}

impl_from_scalar! {
    bool => Bool,
    char => Char,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    i128 => I128,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    f32 => F32,
    f64 => F64,
    Decimal => Decimal,
    String => String,
    NaiveDate => Date,
    NaiveTime => Time,
    NaiveDateTime => DateTime,
    DateTime<FixedOffset> => DateTimeTz,
    Duration => Duration,
    Uuid => Uuid,
    PathBuf => Path,
    EnumValue => Enum,
    Object => Object,
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl From<Arc<Value>> for Value {
    fn from(inner: Arc<Value>) -> Self {
        Value::Shared(inner)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}
