//! Built-in converters.
//!
//! Leaf converters own one coercion policy each and are registered into the
//! built-in tier by [`register_builtins`]. Structural converters
//! (collection, map, array, enum, bean) are invoked directly by the
//! registry's dispatch and re-enter it for every element.

mod array;
mod bean;
mod boolean;
mod bytes;
mod character;
mod collection;
mod duration;
mod enumeration;
mod map;
mod misc;
mod number;
mod shared;
mod string;
mod temporal;

pub use array::ArrayConverter;
pub use bean::BeanConverter;
pub use boolean::BooleanConverter;
pub use bytes::BytesConverter;
pub use character::CharConverter;
pub use collection::CollectionConverter;
pub use duration::DurationConverter;
pub use enumeration::EnumConverter;
pub use map::MapConverter;
pub use misc::{PathConverter, UuidConverter};
pub use number::NumberConverter;
pub use shared::SharedConverter;
pub use string::StringConverter;
pub use temporal::TemporalConverter;

use crate::core::{Registry, TargetType};

/// Register the standard leaf converters into the built-in tier.
pub fn register_builtins(registry: &mut Registry) {
    registry.register_builtin(TargetType::Bool, BooleanConverter);
    registry.register_builtin(TargetType::Char, CharConverter);

    for numeric in [
        TargetType::I8,
        TargetType::I16,
        TargetType::I32,
        TargetType::I64,
        TargetType::I128,
        TargetType::U8,
        TargetType::U16,
        TargetType::U32,
        TargetType::U64,
        TargetType::F32,
        TargetType::F64,
        TargetType::Decimal,
        TargetType::Number,
    ] {
        registry.register_builtin(numeric, NumberConverter);
    }

    registry.register_builtin(TargetType::String, StringConverter);
    registry.register_builtin(TargetType::Bytes, BytesConverter);

    for temporal in [
        TargetType::Date,
        TargetType::Time,
        TargetType::DateTime,
        TargetType::DateTimeTz,
    ] {
        registry.register_builtin(temporal, TemporalConverter::new());
    }

    registry.register_builtin(TargetType::Duration, DurationConverter);
    registry.register_builtin(TargetType::Uuid, UuidConverter);
    registry.register_builtin(TargetType::Path, PathConverter);
    registry.register_builtin(TargetType::shared(TargetType::Any), SharedConverter);
}
