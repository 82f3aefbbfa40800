//! Instance access through the database.
//!
//! ## Menu
//!
//! - [`ObjectRef`], [`ObjectMut`]: a value paired with its
//!   [`TypeInfo`](crate::info::TypeInfo), projecting properties by offset.
//! - [`resolve`], [`resolve_mut`]: property paths such as `mega.toto[1].titi[4]`.
//! - [`ReflectableExt`]: typed get/set/erase, cloning, `is_a` and function calls
//!   on any [`Reflect`](crate::Reflect).
//! - [`Subclass`]: a class id constrained to a base type.

// -----------------------------------------------------------------------------
// Modules

mod accessor;
mod ext;
mod object;
mod path;
mod subclass;

// -----------------------------------------------------------------------------
// Exports

pub(crate) use accessor::FieldAccessor;

pub use ext::ReflectableExt;
pub use object::{ObjectMut, ObjectRef, clone_hierarchy_properties};
pub use path::{PathError, PropertyMut, PropertyRef, resolve, resolve_mut};
pub use subclass::Subclass;
