//! Conversion engine core: the value model, target descriptors, the
//! converter trait and the registry that dispatches between converters.

mod registry;
mod target;
mod traits;
mod value;

pub use registry::Registry;
pub use target::{BeanDef, CodeMatcher, EnumDef, EnumMatcher, FieldDef, TargetKind, TargetType};
pub use traits::{Converter, FnConverter, FromValue};
pub use value::{EnumValue, Object, Value};
