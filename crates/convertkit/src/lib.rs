//! # convertkit
//!
//! Registry-driven conversion of dynamic values into requested target types.
//!
//! This library provides:
//!
//! - **Strict and quiet conversion** through the [`Convert`] facade
//! - **Two-tier registry** of built-in and user converters, safe to extend
//!   while other threads convert
//! - **Structural conversion** of lists, sets, arrays and maps with
//!   element-wise re-dispatch
//! - **Enum and bean population** from names, codes, maps and objects
//! - **Number formatting** in English words and Chinese numerals, plus
//!   width, hex and unicode-escape helpers
//!
//! ## Example
//!
//! ```rust
//! use convertkit::{Convert, TargetType, Value};
//!
//! let convert = Convert::default();
//!
//! assert_eq!(convert.to_bool("yes"), Some(true));
//! assert_eq!(convert.to_list::<i64>("[1, 2, 3]"), Some(vec![1, 2, 3]));
//!
//! let out = convert
//!     .convert_quietly(Some(&TargetType::I32), "not a number", -1i32)
//!     .unwrap();
//! assert_eq!(out, Value::I32(-1));
//! ```

pub mod config;
pub mod converters;
pub mod core;
pub mod error;
pub mod text;

mod convert;

// Re-exports for convenient access
pub use config::{ConvertConfig, FloatRounding, NarrowingPolicy};
pub use convert::Convert;
pub use core::{
    BeanDef, CodeMatcher, Converter, EnumDef, EnumMatcher, EnumValue, FieldDef, FnConverter,
    FromValue, Object, Registry, TargetKind, TargetType, Value,
};
pub use error::{ConvertError, Result};
