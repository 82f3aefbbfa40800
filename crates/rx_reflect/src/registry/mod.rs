//! The type registry.
//!
//! - [`TypeInfoDatabase`]: registration, lookup by id or [`TypeId`](core::any::TypeId),
//!   and the id file.
//! - [`ReflectableFactory`]: instantiators keyed by id.

// -----------------------------------------------------------------------------
// Modules

mod database;
mod error;
mod factory;
mod id_file;

// -----------------------------------------------------------------------------
// Exports

pub use database::TypeInfoDatabase;
pub use error::{DatabaseFileError, RegistrationError};
pub use factory::{Instantiator, ReflectableFactory};
pub use id_file::DATABASE_VERSION;
