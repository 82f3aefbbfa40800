//! [`Reflected`](crate::Reflected) implementations for foreign types and
//! the enum declaration macros.
//!
//! ## Implemented Menu
//!
//! - scalars: `bool`, `i8`-`i64`, `u8`-`u64`, `f32`, `f64`
//! - arrays: `Vec<T>`, `[T; N]`
//! - maps: `BTreeMap<K, V>`, `hashbrown::HashMap<K, V, S>`, `std::collections::HashMap<K, V, S>` ("std" feature)
//! - enums: [`sequential_enum!`](crate::sequential_enum), [`bitmask_enum!`](crate::bitmask_enum)

mod containers;
mod enums;
mod scalar;
