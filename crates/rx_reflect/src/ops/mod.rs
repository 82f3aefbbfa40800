//! Type-erased handlers for container and enum properties.
//!
//! ## Menu
//!
//! - [`DataStructureHandler`]: the handler attached to a property, one of:
//!     - [`ArrayHandler`]: for `Vec<T>` ([`VecHandler`]) and `[T; N]` ([`StaticArrayHandler`]).
//!     - [`MapHandler`]: for `BTreeMap` and `HashMap` ([`MapHandlerImpl`] over [`MapStorage`]).
//!     - [`EnumHandler`]: for enums declared through [`sequential_enum!`] or [`bitmask_enum!`].
//! - [`FromChars`], [`ToChars`]: text form of map keys and enum values.
//! - [`WireScalar`]: fixed-width little-endian form used by the binary codec.
//!
//! Handlers are stateless singletons, one per concrete type, obtained from
//! [`Reflected::data_handler`](crate::Reflected::data_handler).
//!
//! [`sequential_enum!`]: crate::sequential_enum
//! [`bitmask_enum!`]: crate::bitmask_enum

// -----------------------------------------------------------------------------
// Modules

mod array_ops;
mod convert;
mod data_handler;
mod enum_ops;
mod handler_error;
mod map_ops;

// -----------------------------------------------------------------------------
// Exports

pub use convert::{ConvertError, FromChars, ToChars, WireScalar};
pub use data_handler::DataStructureHandler;
pub use handler_error::HandlerError;

pub use array_ops::{ArrayHandler, StaticArrayHandler, VecHandler};
pub use enum_ops::{EnumHandler, EnumHandlerImpl, EnumKind, EnumRepr, ReflectEnum};
pub use map_ops::{MapHandler, MapHandlerImpl, MapKey, MapStorage};
