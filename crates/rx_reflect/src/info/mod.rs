//! Descriptions of reflectable types.
//!
//! ## Menu
//!
//! - [`MetaType`]: the closed tag telling how to interpret a value.
//! - [`ReflectableId`]: numeric id assigned by the database, also the
//!   binary type tag.
//! - [`Metadata`]: static attributes attached to a property ([`Attribute`]).
//! - [`PropertyInfo`]: name, offset, size, tag and handler of one field.
//! - [`FunctionInfo`]: a callable member, see [`IntoInvoker`].
//! - [`TypeInfo`]: the properties, functions, ancestors ([`ParentClass`])
//!   and descendants of one type.
//! - [`TypeInfoBuilder`]: passed to [`Reflectable::describe`] during
//!   registration.
//!
//! [`Reflectable::describe`]: crate::Reflectable::describe

// -----------------------------------------------------------------------------
// Modules

mod builder;
mod function_info;
mod meta_type;
mod metadata;
mod property_info;
mod type_info;

// -----------------------------------------------------------------------------
// Exports

pub use builder::TypeInfoBuilder;
pub use function_info::{FunctionInfo, IntoInvoker, InvokeError, Invoker};
pub use meta_type::{INVALID_REFLECTABLE_ID, MetaType, ReflectableId};
pub use metadata::{Attribute, Metadata, SerializationPolicy, SerializationState};
pub use property_info::PropertyInfo;
pub use type_info::{HierarchyProperty, ParentClass, TypeInfo};
