use alloc::boxed::Box;
use core::any::Any;
use core::fmt;
use core::marker::PhantomData;

use crate::info::{INVALID_REFLECTABLE_ID, ReflectableId};
use crate::registry::TypeInfoDatabase;
use crate::{Reflect, Reflectable};

/// The id of `T` or of one of its descendants.
///
/// Holds any id, but only instantiates classes that derive from `T`.
pub struct Subclass<T: Reflectable> {
    id: ReflectableId,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Reflectable> Subclass<T> {
    /// Starts with the id of `T` itself.
    pub fn new(db: &TypeInfoDatabase) -> Self {
        Self {
            id: db.id_of::<T>().unwrap_or(INVALID_REFLECTABLE_ID),
            _marker: PhantomData,
        }
    }

    #[inline]
    pub fn set_class(&mut self, id: ReflectableId) {
        self.id = id;
    }

    /// Stores the id of `U`, or the invalid id if `U` is not registered.
    pub fn set_class_of<U: Reflectable>(&mut self, db: &TypeInfoDatabase) {
        self.id = db.id_of::<U>().unwrap_or(INVALID_REFLECTABLE_ID);
    }

    #[inline]
    pub fn class_id(&self) -> ReflectableId {
        self.id
    }

    /// `true` if the stored id is `T` or one of its descendants.
    pub fn is_valid(&self, db: &TypeInfoDatabase) -> bool {
        db.get_of::<T>()
            .is_some_and(|info| info.is_parent_of(self.id, true))
    }

    /// Instantiates the stored class with `&()` arguments.
    #[inline]
    pub fn instantiate(&self, db: &TypeInfoDatabase) -> Option<Box<dyn Reflect>> {
        self.instantiate_with(db, &())
    }

    /// Returns `None` for an invalid class or when no instantiator accepts `args`.
    pub fn instantiate_with(
        &self,
        db: &TypeInfoDatabase,
        args: &dyn Any,
    ) -> Option<Box<dyn Reflect>> {
        if !self.is_valid(db) {
            return None;
        }
        db.try_instantiate(self.id, args)
    }

    /// Instantiates and downcasts to the concrete class `U`.
    pub fn instantiate_as<U: Reflectable>(&self, db: &TypeInfoDatabase) -> Option<Box<U>> {
        self.instantiate(db)?.downcast()
    }
}

impl<T: Reflectable> Clone for Subclass<T> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: Reflectable> Copy for Subclass<T> {}

impl<T: Reflectable> fmt::Debug for Subclass<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subclass")
            .field("base", &T::NAME)
            .field("id", &self.id)
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Tests
