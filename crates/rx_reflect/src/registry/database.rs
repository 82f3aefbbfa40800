use alloc::boxed::Box;
use alloc::vec::Vec;
use core::any::{Any, TypeId};

use rx_utils::TypeIdMap;

use super::{Instantiator, ReflectableFactory, RegistrationError};
use crate::info::{INVALID_REFLECTABLE_ID, MetaType, ReflectableId, TypeInfo, TypeInfoBuilder};
use crate::{Reflect, Reflectable};

/// The registry of every reflectable type, plus the instantiation factory.
///
/// The database is an explicit value handed to every resolver and codec
/// call. Types are registered once at startup, parents before children,
/// then the database is [sealed](Self::seal). Registration and id import
/// must be finished before any query or serialization: there is no
/// internal locking.
///
/// # Examples
///
/// ```
/// use rx_reflect::registry::TypeInfoDatabase;
/// use rx_reflect::{property, reflectable};
///
/// #[derive(Clone, Default)]
/// struct Player {
///     xp: i32,
/// }
///
/// reflectable!(Player => "Player" |info| {
///     property!(info, xp);
///     info.default_instantiator();
/// });
///
/// let mut db = TypeInfoDatabase::new();
/// let id = db.register::<Player>().unwrap();
/// db.seal().unwrap();
///
/// assert_eq!(db.id_of::<Player>(), Some(id));
/// assert_eq!(db.get(id).unwrap().name(), "Player");
/// assert!(db.instantiate_class::<Player>(&()).is_some());
/// ```
#[derive(Debug, Default)]
pub struct TypeInfoDatabase {
    infos: Vec<TypeInfo>,
    by_type: TypeIdMap<usize>,
    factory: ReflectableFactory,
    sealed: bool,
}

impl TypeInfoDatabase {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    // -------------------------------------------------------------------------
    // Registration

    /// Describes `T` and registers it under the next sequential id.
    ///
    /// Every ancestor of `T` records the new id as a descendant.
    pub fn register<T: Reflectable>(&mut self) -> Result<ReflectableId, RegistrationError> {
        if self.sealed {
            return Err(RegistrationError::Sealed { name: T::NAME });
        }
        if self.by_type.contains_type::<T>() {
            return Err(RegistrationError::AlreadyRegistered { name: T::NAME });
        }

        let id = self
            .next_id()
            .ok_or(RegistrationError::IdsExhausted { name: T::NAME })?;
        let mut builder = TypeInfoBuilder::<T>::new(self);
        T::describe(&mut builder);
        let (info, instantiators) = builder.build(id)?;

        let parents: Vec<ReflectableId> = info.parents().iter().map(|p| p.id()).collect();
        for parent in parents {
            if let Some(parent) = self.get_mut(parent) {
                parent.push_child(id);
            }
        }

        self.by_type.insert(TypeId::of::<T>(), self.infos.len());
        self.infos.push(info);
        for instantiator in instantiators {
            self.factory.register(id, instantiator);
        }

        log::debug!("registered reflectable `{}` with id {id}", T::NAME);
        Ok(id)
    }

    /// Resolves the nested ids of object properties and closes registration.
    pub fn seal(&mut self) -> Result<(), RegistrationError> {
        let mut resolved = Vec::new();
        for (index, info) in self.infos.iter().enumerate() {
            for (slot, property) in info.properties().iter().enumerate() {
                if property.meta_type() != MetaType::Object {
                    continue;
                }
                let nested = self.get_by_type_id(property.type_id()).ok_or(
                    RegistrationError::UnregisteredNested {
                        owner: info.name(),
                        property: property.name(),
                        type_name: property.type_name(),
                    },
                )?;
                resolved.push((index, slot, nested.id()));
            }
        }

        for (index, slot, id) in resolved {
            if let Some(property) = self
                .infos
                .get_mut(index)
                .and_then(|info| info.properties_mut().get_mut(slot))
            {
                property.set_reflectable_id(id);
            }
        }

        self.sealed = true;
        log::debug!("sealed type info database with {} types", self.infos.len());
        Ok(())
    }

    #[inline]
    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    /// Adds an instantiator for an already registered id.
    pub fn register_instantiator(&mut self, id: ReflectableId, instantiator: Instantiator) {
        self.factory.register(id, instantiator);
    }

    fn next_id(&self) -> Option<ReflectableId> {
        match self.infos.iter().map(TypeInfo::id).max() {
            Some(max) => id_after(max),
            None => Some(0),
        }
    }

    // -------------------------------------------------------------------------
    // Queries

    /// Number of registered types.
    #[inline]
    pub fn len(&self) -> usize {
        self.infos.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.infos.is_empty()
    }

    /// Every type info in registration order.
    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &TypeInfo> {
        self.infos.iter()
    }

    /// Looks `id` up at index `id` first, then scans.
    ///
    /// The scan covers ids that an import moved away from their index.
    pub fn get(&self, id: ReflectableId) -> Option<&TypeInfo> {
        self.index_of(id).map(|index| &self.infos[index])
    }

    pub fn get_mut(&mut self, id: ReflectableId) -> Option<&mut TypeInfo> {
        self.index_of(id).map(|index| &mut self.infos[index])
    }

    pub fn get_by_type_id(&self, type_id: TypeId) -> Option<&TypeInfo> {
        self.by_type
            .get(&type_id)
            .and_then(|&index| self.infos.get(index))
    }

    #[inline]
    pub fn get_of<T: Any>(&self) -> Option<&TypeInfo> {
        self.get_by_type_id(TypeId::of::<T>())
    }

    #[inline]
    pub fn id_of<T: Any>(&self) -> Option<ReflectableId> {
        self.get_of::<T>().map(TypeInfo::id)
    }

    fn index_of(&self, id: ReflectableId) -> Option<usize> {
        match self.infos.get(id as usize) {
            Some(info) if info.id() == id => Some(id as usize),
            _ => self.infos.iter().position(|info| info.id() == id),
        }
    }

    // -------------------------------------------------------------------------
    // Factory

    #[inline]
    pub fn factory(&self) -> &ReflectableFactory {
        &self.factory
    }

    /// Runs the first instantiator of `id` that accepts `args`.
    #[inline]
    pub fn try_instantiate(&self, id: ReflectableId, args: &dyn Any) -> Option<Box<dyn Reflect>> {
        self.factory.instantiate(id, args)
    }

    /// Instantiates `T` itself with `args`.
    pub fn instantiate_class<T: Reflectable>(&self, args: &dyn Any) -> Option<Box<T>> {
        self.try_instantiate(self.id_of::<T>()?, args)?
            .downcast::<T>()
    }

    // -------------------------------------------------------------------------
    // Id import

    /// Applies an id mapping to every info, link and factory key.
    pub(crate) fn remap_ids(&mut self, map: impl Fn(ReflectableId) -> ReflectableId) {
        for info in &mut self.infos {
            info.remap_ids(&map);
        }
        self.factory.remap(&map);
    }
}

/// The id following `id`, unless it would reach [`INVALID_REFLECTABLE_ID`].
pub(super) fn id_after(id: ReflectableId) -> Option<ReflectableId> {
    id.checked_add(1).filter(|&next| next != INVALID_REFLECTABLE_ID)
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::TypeInfoDatabase;
    use crate::info::INVALID_REFLECTABLE_ID;
    use crate::registry::RegistrationError;
    use crate::tests_support::*;

    #[test]
    fn sequential_ids() {
        let mut db = TypeInfoDatabase::new();
        assert_eq!(db.register::<Tata>(), Ok(0));
        assert_eq!(db.register::<Tete>(), Ok(1));
        assert_eq!(db.register::<Titi>(), Ok(2));
        assert_eq!(
            db.register::<Tete>(),
            Err(RegistrationError::AlreadyRegistered { name: "tete" })
        );
        assert_eq!(db.len(), 3);
        assert_eq!(db.get(1).unwrap().name(), "tete");
        assert!(db.get(3).is_none());

        db.seal().unwrap();
        assert!(db.is_sealed());
        assert_eq!(
            db.register::<Toto>(),
            Err(RegistrationError::Sealed { name: "toto" })
        );
    }

    #[test]
    fn parent_before_child() {
        let mut db = TypeInfoDatabase::new();
        assert_eq!(
            db.register::<B>(),
            Err(RegistrationError::UnregisteredParent { name: "b", parent: "a" })
        );
        assert!(db.is_empty());
    }

    #[test]
    fn nested_ids_resolved_on_seal() {
        let mut db = TypeInfoDatabase::new();
        db.register::<Copyable>().unwrap();
        db.register::<TestCompound2>().unwrap();
        let info = db.get_of::<TestCompound2>().unwrap();
        let copyable = info.find_property("copyable").unwrap();
        assert_eq!(copyable.reflectable_id(), INVALID_REFLECTABLE_ID);

        db.seal().unwrap();
        let info = db.get_of::<TestCompound2>().unwrap();
        let copyable = info.find_property("copyable").unwrap();
        assert_eq!(Some(copyable.reflectable_id()), db.id_of::<Copyable>());
        assert_eq!(
            info.find_property("leet").unwrap().reflectable_id(),
            INVALID_REFLECTABLE_ID
        );
    }

    #[test]
    fn unregistered_nested_type() {
        let mut db = TypeInfoDatabase::new();
        db.register::<TestCompound2>().unwrap();
        assert!(matches!(
            db.seal(),
            Err(RegistrationError::UnregisteredNested { property: "copyable", .. })
        ));
    }

    #[test]
    fn names_and_children() {
        let db = database();
        assert_eq!(db.get_of::<A>().unwrap().name(), "a");
        assert_eq!(db.get_of::<SuperCompound>().unwrap().name(), "SuperCompound");
        assert_eq!(db.get_of::<Nested>().unwrap().name(), "testNS::Nested");
        assert_eq!(db.get_of::<Nested2>().unwrap().name(), "testNS::Nested2");

        let b = db.id_of::<B>().unwrap();
        let c = db.id_of::<C>().unwrap();
        let d = db.id_of::<D>().unwrap();
        assert_eq!(db.get_of::<A>().unwrap().children(), [b, c, d]);
        assert_eq!(db.get_of::<C>().unwrap().children(), [d]);
        assert!(db.get_of::<D>().unwrap().children().is_empty());
    }

    #[test]
    fn instantiation() {
        let db = database();
        assert!(db.instantiate_class::<DefaultInstantiated>(&()).is_some());
        assert!(db.instantiate_class::<DefaultInstantiated>(&1337i32).is_none());

        let custom = db.instantiate_class::<CustomInstantiated>(&1337i32).unwrap();
        assert_eq!(custom.config, 1337);
        assert!(db.instantiate_class::<CustomInstantiated>(&()).is_none());

        let c = db.id_of::<C>().unwrap();
        assert!(db.try_instantiate(c, &()).is_some());
        assert!(db.try_instantiate(c, &(1i32, true)).is_some());
        assert!(db.try_instantiate(INVALID_REFLECTABLE_ID, &()).is_none());
    }
}
