//! Paths used by the exported macros. Not public API.

pub use alloc::string::String;
pub use alloc::vec::Vec;
