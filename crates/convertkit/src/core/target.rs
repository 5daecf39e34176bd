//! Target type descriptors.
//!
//! A [`TargetType`] names what a conversion should produce. Scalar variants
//! map one-to-one onto [`Value`] variants; parameterized variants
//! (`List(T)`, `Map(K, V)`, ...) carry their type arguments so structural
//! converters can re-dispatch each element.
//!
//! ```text
//! "list<i32>"        → List(I32)
//! "map<string,f64>"  → Map(String, F64)
//! "i64[]"            → Array(I64)
//! ```

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::sync::Arc;

use crate::error::ConvertError;

use super::value::Value;

/// Semantic descriptor of a conversion target.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TargetType {
    /// Unresolvable or opaque target; values pass through unchanged.
    Any,

    // ===== Scalars =====
    Bool,
    Char,
    I8,
    I16,
    I32,
    I64,
    /// Widest integral type, used where a big integer is expected.
    I128,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    /// Exact decimal (rust_decimal).
    Decimal,
    /// Any numeric value; the converter picks the narrowest faithful variant.
    Number,
    String,
    Bytes,

    // ===== Date/Time =====
    Date,
    Time,
    DateTime,
    DateTimeTz,
    Duration,

    // ===== Identifiers =====
    Uuid,
    Path,

    // ===== Parameterized =====
    List(Box<TargetType>),
    /// Insertion-ordered set of unique elements.
    Set(Box<TargetType>),
    /// Fixed-shape array; conversion failure falls through dispatch.
    Array(Box<TargetType>),
    Map(Box<TargetType>, Box<TargetType>),
    /// Shared reference wrapping a converted inner value.
    Shared(Box<TargetType>),

    // ===== User-described =====
    Enum(Arc<EnumDef>),
    Bean(Arc<BeanDef>),
    /// Custom type key for user-registered converters.
    Named(String),
}

/// Dispatch family of a target type.
///
/// Resolved once per call by the registry so each family is handled by
/// a dedicated code path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetKind {
    Opaque,
    Boolean,
    Character,
    Numeric,
    Text,
    Binary,
    Temporal,
    Identifier,
    Collection,
    Map,
    Array,
    Enum,
    Bean,
    Reference,
    Custom,
}

impl TargetType {
    /// Convenience constructor for `List(elem)`.
    pub fn list(elem: TargetType) -> Self {
        TargetType::List(Box::new(elem))
    }

    /// Convenience constructor for `Set(elem)`.
    pub fn set(elem: TargetType) -> Self {
        TargetType::Set(Box::new(elem))
    }

    /// Convenience constructor for `Array(elem)`.
    pub fn array(elem: TargetType) -> Self {
        TargetType::Array(Box::new(elem))
    }

    /// Convenience constructor for `Map(key, value)`.
    pub fn map(key: TargetType, value: TargetType) -> Self {
        TargetType::Map(Box::new(key), Box::new(value))
    }

    /// Convenience constructor for `Shared(inner)`.
    pub fn shared(inner: TargetType) -> Self {
        TargetType::Shared(Box::new(inner))
    }

    /// Convenience constructor for a custom type key.
    pub fn named(name: impl Into<String>) -> Self {
        TargetType::Named(name.into())
    }

    /// Dispatch family of this type.
    pub fn kind(&self) -> TargetKind {
        match self {
            TargetType::Any => TargetKind::Opaque,
            TargetType::Bool => TargetKind::Boolean,
            TargetType::Char => TargetKind::Character,
            TargetType::I8
            | TargetType::I16
            | TargetType::I32
            | TargetType::I64
            | TargetType::I128
            | TargetType::U8
            | TargetType::U16
            | TargetType::U32
            | TargetType::U64
            | TargetType::F32
            | TargetType::F64
            | TargetType::Decimal
            | TargetType::Number => TargetKind::Numeric,
            TargetType::String => TargetKind::Text,
            TargetType::Bytes => TargetKind::Binary,
            TargetType::Date
            | TargetType::Time
            | TargetType::DateTime
            | TargetType::DateTimeTz
            | TargetType::Duration => TargetKind::Temporal,
            TargetType::Uuid | TargetType::Path => TargetKind::Identifier,
            TargetType::List(_) | TargetType::Set(_) => TargetKind::Collection,
            TargetType::Map(_, _) => TargetKind::Map,
            TargetType::Array(_) => TargetKind::Array,
            TargetType::Shared(_) => TargetKind::Reference,
            TargetType::Enum(_) => TargetKind::Enum,
            TargetType::Bean(_) => TargetKind::Bean,
            TargetType::Named(_) => TargetKind::Custom,
        }
    }

    /// The raw type with all type arguments erased to `Any`.
    ///
    /// Registry lookups fall back to this key when the exact
    /// parameterized type has no converter.
    pub fn raw(&self) -> TargetType {
        match self {
            TargetType::List(_) => TargetType::list(TargetType::Any),
            TargetType::Set(_) => TargetType::set(TargetType::Any),
            TargetType::Array(_) => TargetType::array(TargetType::Any),
            TargetType::Map(_, _) => TargetType::map(TargetType::Any, TargetType::Any),
            TargetType::Shared(_) => TargetType::shared(TargetType::Any),
            other => other.clone(),
        }
    }

    /// Declared type arguments, empty for non-parameterized types.
    pub fn type_args(&self) -> Vec<&TargetType> {
        match self {
            TargetType::List(t)
            | TargetType::Set(t)
            | TargetType::Array(t)
            | TargetType::Shared(t) => vec![t.as_ref()],
            TargetType::Map(k, v) => vec![k.as_ref(), v.as_ref()],
            _ => Vec::new(),
        }
    }

    /// True when the target cannot be resolved to anything concrete.
    pub fn is_opaque(&self) -> bool {
        matches!(self, TargetType::Any)
    }

    /// True for targets whose elements must be re-converted even when
    /// the runtime shape already matches.
    pub fn needs_element_conversion(&self) -> bool {
        matches!(
            self,
            TargetType::List(_) | TargetType::Set(_) | TargetType::Map(_, _)
        )
    }

    /// True for integral numeric targets.
    pub fn is_integral(&self) -> bool {
        matches!(
            self,
            TargetType::I8
                | TargetType::I16
                | TargetType::I32
                | TargetType::I64
                | TargetType::I128
                | TargetType::U8
                | TargetType::U16
                | TargetType::U32
                | TargetType::U64
        )
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetType::Any => write!(f, "any"),
            TargetType::Bool => write!(f, "bool"),
            TargetType::Char => write!(f, "char"),
            TargetType::I8 => write!(f, "i8"),
            TargetType::I16 => write!(f, "i16"),
            TargetType::I32 => write!(f, "i32"),
            TargetType::I64 => write!(f, "i64"),
            TargetType::I128 => write!(f, "i128"),
            TargetType::U8 => write!(f, "u8"),
            TargetType::U16 => write!(f, "u16"),
            TargetType::U32 => write!(f, "u32"),
            TargetType::U64 => write!(f, "u64"),
            TargetType::F32 => write!(f, "f32"),
            TargetType::F64 => write!(f, "f64"),
            TargetType::Decimal => write!(f, "decimal"),
            TargetType::Number => write!(f, "number"),
            TargetType::String => write!(f, "string"),
            TargetType::Bytes => write!(f, "bytes"),
            TargetType::Date => write!(f, "date"),
            TargetType::Time => write!(f, "time"),
            TargetType::DateTime => write!(f, "datetime"),
            TargetType::DateTimeTz => write!(f, "datetimetz"),
            TargetType::Duration => write!(f, "duration"),
            TargetType::Uuid => write!(f, "uuid"),
            TargetType::Path => write!(f, "path"),
            TargetType::List(t) => write!(f, "list<{}>", t),
            TargetType::Set(t) => write!(f, "set<{}>", t),
            TargetType::Array(t) => write!(f, "array<{}>", t),
            TargetType::Map(k, v) => write!(f, "map<{},{}>", k, v),
            TargetType::Shared(t) => write!(f, "shared<{}>", t),
            TargetType::Enum(def) => write!(f, "{}", def.name()),
            TargetType::Bean(def) => write!(f, "{}", def.name()),
            TargetType::Named(name) => write!(f, "{}", name),
        }
    }
}

impl FromStr for TargetType {
    type Err = ConvertError;

    /// Parse a type name such as `int`, `list<i64>` or `map<string,f64>`.
    ///
    /// Enum and bean types need a definition and cannot be named here.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        if name.is_empty() {
            return Err(ConvertError::UnknownType(s.to_string()));
        }

        if let Some(elem) = name.strip_suffix("[]") {
            return Ok(TargetType::array(elem.parse()?));
        }

        if let Some(open) = name.find('<') {
            let inner = name[open + 1..]
                .strip_suffix('>')
                .ok_or_else(|| ConvertError::UnknownType(s.to_string()))?;
            let args = split_type_args(inner)
                .into_iter()
                .map(str::parse)
                .collect::<Result<Vec<TargetType>, _>>()?;
            let head = name[..open].trim().to_lowercase();

            return match (head.as_str(), args.as_slice()) {
                ("list" | "vec", [t]) => Ok(TargetType::list(t.clone())),
                ("set", [t]) => Ok(TargetType::set(t.clone())),
                ("array", [t]) => Ok(TargetType::array(t.clone())),
                ("map", [k, v]) => Ok(TargetType::map(k.clone(), v.clone())),
                ("shared" | "arc", [t]) => Ok(TargetType::shared(t.clone())),
                _ => Err(ConvertError::UnknownType(s.to_string())),
            };
        }

        let lower = name.to_lowercase();
        let target = match lower.as_str() {
            "any" | "object" => TargetType::Any,
            "bool" | "boolean" => TargetType::Bool,
            "char" | "character" => TargetType::Char,
            "i8" | "byte" => TargetType::I8,
            "i16" | "short" => TargetType::I16,
            "i32" | "int" | "integer" => TargetType::I32,
            "i64" | "long" => TargetType::I64,
            "i128" | "bigint" | "biginteger" => TargetType::I128,
            "u8" => TargetType::U8,
            "u16" => TargetType::U16,
            "u32" => TargetType::U32,
            "u64" => TargetType::U64,
            "f32" | "float" => TargetType::F32,
            "f64" | "double" => TargetType::F64,
            "decimal" | "bigdecimal" => TargetType::Decimal,
            "number" => TargetType::Number,
            "string" | "str" => TargetType::String,
            "bytes" => TargetType::Bytes,
            "date" => TargetType::Date,
            "time" => TargetType::Time,
            "datetime" => TargetType::DateTime,
            "datetimetz" | "timestamptz" | "offsetdatetime" => TargetType::DateTimeTz,
            "duration" => TargetType::Duration,
            "uuid" => TargetType::Uuid,
            "path" => TargetType::Path,
            "list" | "vec" => TargetType::list(TargetType::Any),
            "set" => TargetType::set(TargetType::Any),
            "map" => TargetType::map(TargetType::Any, TargetType::Any),
            _ => return Err(ConvertError::UnknownType(s.to_string())),
        };
        Ok(target)
    }
}

/// Split `a,map<b,c>` into `["a", "map<b,c>"]` at top-level commas.
fn split_type_args(inner: &str) -> Vec<&str> {
    let mut args = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    for (i, c) in inner.char_indices() {
        match c {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                args.push(inner[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    args.push(inner[start..].trim());
    args
}

// =============================================================================
// Enum definitions
// =============================================================================

/// Secondary constant matching for an enum, e.g. by numeric code or label.
///
/// Opt-in per enum: only enums built with [`EnumDef::with_matcher`] use it.
pub trait EnumMatcher: Send + Sync {
    /// Ordinal of the constant matching `value`, if any.
    fn match_constant(&self, def: &EnumDef, value: &Value) -> Option<usize>;
}

/// Matches constants by an integer code or a display label.
///
/// Codes and labels are listed in constant order.
#[derive(Debug, Clone, Default)]
pub struct CodeMatcher {
    codes: Vec<i64>,
    labels: Vec<String>,
}

impl CodeMatcher {
    /// Create a matcher from `(code, label)` pairs in constant order.
    pub fn new<S: Into<String>>(entries: impl IntoIterator<Item = (i64, S)>) -> Self {
        let (codes, labels) = entries
            .into_iter()
            .map(|(code, label)| (code, label.into()))
            .unzip();
        Self { codes, labels }
    }
}

impl EnumMatcher for CodeMatcher {
    fn match_constant(&self, _def: &EnumDef, value: &Value) -> Option<usize> {
        if let Some(code) = value.as_i128() {
            return self.codes.iter().position(|c| i128::from(*c) == code);
        }
        match value {
            Value::String(s) => {
                let s = s.trim();
                if let Ok(code) = s.parse::<i64>() {
                    return self.codes.iter().position(|c| *c == code);
                }
                self.labels.iter().position(|l| l == s)
            }
            _ => None,
        }
    }
}

/// Description of an enumerated type: its name and ordered constants.
///
/// Two definitions are the same type when their names are equal.
pub struct EnumDef {
    name: String,
    constants: Vec<String>,
    matcher: Option<Arc<dyn EnumMatcher>>,
}

impl EnumDef {
    /// Create an enum definition with the given constants.
    pub fn new<S: Into<String>>(
        name: impl Into<String>,
        constants: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            name: name.into(),
            constants: constants.into_iter().map(Into::into).collect(),
            matcher: None,
        }
    }

    /// Attach a secondary matching strategy.
    pub fn with_matcher(mut self, matcher: impl EnumMatcher + 'static) -> Self {
        self.matcher = Some(Arc::new(matcher));
        self
    }

    /// Enum type name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Constant names in declaration order.
    pub fn constants(&self) -> &[String] {
        &self.constants
    }

    /// Secondary matcher, if the enum opted in.
    pub fn matcher(&self) -> Option<&Arc<dyn EnumMatcher>> {
        self.matcher.as_ref()
    }

    /// Ordinal of the constant with exactly this name.
    pub fn ordinal_of(&self, constant: &str) -> Option<usize> {
        self.constants.iter().position(|c| c == constant)
    }

    /// Wrap into the shared form used by [`TargetType::Enum`].
    pub fn into_target(self) -> TargetType {
        TargetType::Enum(Arc::new(self))
    }
}

impl fmt::Debug for EnumDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnumDef")
            .field("name", &self.name)
            .field("constants", &self.constants)
            .field("has_matcher", &self.matcher.is_some())
            .finish()
    }
}

impl PartialEq for EnumDef {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for EnumDef {}

impl Hash for EnumDef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

// =============================================================================
// Bean definitions
// =============================================================================

/// One settable property of a bean.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDef {
    /// Property name.
    pub name: String,
    /// Declared property type.
    pub ty: TargetType,
    /// Value used when the source has no usable entry.
    pub default: Value,
}

/// Description of a simple value object: a name and its settable fields.
///
/// Two definitions are the same type when their names are equal.
#[derive(Debug, Clone)]
pub struct BeanDef {
    name: String,
    fields: Vec<FieldDef>,
}

impl BeanDef {
    /// Create a bean definition without fields.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Add a field defaulting to null.
    pub fn field(self, name: impl Into<String>, ty: TargetType) -> Self {
        self.field_with_default(name, ty, Value::Null)
    }

    /// Add a field with an explicit default.
    pub fn field_with_default(mut self, name: impl Into<String>, ty: TargetType, default: Value) -> Self {
        self.fields.push(FieldDef {
            name: name.into(),
            ty,
            default,
        });
        self
    }

    /// Bean type name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    /// A type with no settable fields cannot be populated generically.
    pub fn is_bean(&self) -> bool {
        !self.fields.is_empty()
    }

    /// Wrap into the shared form used by [`TargetType::Bean`].
    pub fn into_target(self) -> TargetType {
        TargetType::Bean(Arc::new(self))
    }
}

impl PartialEq for BeanDef {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for BeanDef {}

impl Hash for BeanDef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}
