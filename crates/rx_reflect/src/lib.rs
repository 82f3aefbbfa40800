#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

// -----------------------------------------------------------------------------
// Compilation config

/// Some macros used for compilation control.
pub mod cfg {
    rx_cfg::define_alias! {
        #[cfg(feature = "std")] => std,
        #[cfg(feature = "json")] => json,
        #[cfg(all(debug_assertions, feature = "debug", feature = "std"))] => debug,
    }
}

// -----------------------------------------------------------------------------
// Extern Self

// Lets the exported macros and the doc tests both spell paths as `rx_reflect::..`.
extern crate self as rx_reflect;

// -----------------------------------------------------------------------------
// no_std support

crate::cfg::std! {
    extern crate std;
}

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod reflection;

pub mod access;
pub mod binary;
pub mod impls;
pub mod info;
pub mod ops;
pub mod registry;
pub mod serde;

#[cfg(test)]
mod tests_support;

// -----------------------------------------------------------------------------
// Top-level exports

#[doc(hidden)]
pub mod __macro_exports;

pub use access::ReflectableExt;
pub use reflection::{Reflect, Reflectable, Reflected};
