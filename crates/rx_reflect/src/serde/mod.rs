//! Text serialization of registered objects through `serde`.
//!
//! The driver is format-agnostic: [`ReflectSerializer`] implements
//! [`Serialize`](serde_core::Serialize) and [`ReflectDeserializer`]
//! implements [`DeserializeSeed`](serde_core::de::DeserializeSeed), both
//! walking the [`TypeInfo`](crate::info::TypeInfo) of the value rather than
//! relying on `serde` impls of the types.
//!
//! An object is written as a map from property name to value, ancestors'
//! properties first. Which properties take part is decided by the
//! [`SerializeConfig`].
//!
//! With the `json` feature, [`to_json_string`], [`from_json_str`],
//! [`deserialize_json`] and [`deserialize_json_by_id`] wrap the driver for
//! `serde_json`.
//!
//! In debug builds with the `debug` feature, error messages end with the
//! stack of type names being processed.

// -----------------------------------------------------------------------------
// Modules

crate::cfg::debug! {
    mod info_stack;
}

mod config;
mod de;
mod error_utils;
mod ser;

crate::cfg::json! {
    mod json;
}

// -----------------------------------------------------------------------------
// Exports

pub use config::SerializeConfig;
pub use de::ReflectDeserializer;
pub use ser::ReflectSerializer;

crate::cfg::json! {
    pub use json::{JsonError, deserialize_json, deserialize_json_by_id, from_json_str, to_json_string};
}
