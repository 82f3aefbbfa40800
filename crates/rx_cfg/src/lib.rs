//! Compile-time switches expressed as macros.
//!
//! `#[cfg]` attributes cannot wrap arbitrary token streams, and repeating
//! the same predicate in many places is error prone. This crate lets a crate
//! name its predicates once:
//!
//! ```
//! pub mod cfg {
//!     rx_cfg::define_alias! {
//!         #[cfg(feature = "std")] => std,
//!         #[cfg(debug_assertions)] => debug,
//!     }
//! }
//!
//! cfg::debug! {
//!     fn only_in_debug() {}
//! }
//!
//! let on = cfg::debug!();
//! assert_eq!(on, cfg!(debug_assertions));
//!
//! let label = cfg::debug! { if { "debug" } else { "release" } };
//! # let _ = label;
//! ```
//!
//! Every alias accepts three forms:
//!
//! - `alias!()` expands to a `bool` literal.
//! - `alias! { if { .. } else { .. } }` keeps exactly one branch.
//! - `alias! { .. }` keeps the tokens when the predicate holds.
#![no_std]

/// The expansion of an alias whose predicate holds.
#[doc(hidden)]
#[macro_export]
macro_rules! enabled {
    () => { true };
    (if { $($p:tt)* } else { $($n:tt)* }) => { $($p)* };
    ($($p:tt)*) => { $($p)* };
}

/// The expansion of an alias whose predicate does not hold.
#[doc(hidden)]
#[macro_export]
macro_rules! disabled {
    () => { false };
    (if { $($p:tt)* } else { $($n:tt)* }) => { $($n)* };
    ($($p:tt)*) => {};
}

/// Declares one macro per `#[cfg(..)] => name` entry.
///
/// The generated macros are re-exports of [`enabled!`] or [`disabled!`]
/// chosen by the predicate, so they can be reached through a path such as
/// `crate::cfg::std!`.
#[macro_export]
macro_rules! define_alias {
    () => {};
    (#[cfg($meta:meta)] => $name:ident $(, $($rest:tt)*)?) => {
        #[cfg($meta)]
        #[doc(hidden)]
        pub use $crate::enabled as $name;
        #[cfg(not($meta))]
        #[doc(hidden)]
        pub use $crate::disabled as $name;

        $( $crate::define_alias! { $($rest)* } )?
    };
}

// -----------------------------------------------------------------------------
// Tests
