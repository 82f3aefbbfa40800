use alloc::boxed::Box;
use core::any::Any;

use super::path::{PathError, PropertyMut, PropertyRef, resolve, resolve_mut, split_last_subscript};
use super::{ObjectMut, clone_hierarchy_properties};
use crate::info::{FunctionInfo, InvokeError, ReflectableId, TypeInfo};
use crate::ops::DataStructureHandler;
use crate::registry::TypeInfoDatabase;
use crate::{Reflect, Reflectable};

/// Database-driven operations on a reflectable instance.
///
/// Implemented for every [`Reflect`], including `dyn Reflect`. Every method
/// takes the [`TypeInfoDatabase`] the type was registered in.
///
/// # Examples
///
/// ```
/// use rx_reflect::registry::TypeInfoDatabase;
/// use rx_reflect::{ReflectableExt, property, reflectable};
///
/// #[derive(Clone, Default)]
/// struct Hand {
///     cards: Vec<u8>,
///     score: i32,
/// }
///
/// reflectable!(Hand => "Hand" |info| {
///     property!(info, cards);
///     property!(info, score);
///     info.default_instantiator();
///     info.function("score", |hand: &mut Hand| hand.score);
/// });
///
/// let mut db = TypeInfoDatabase::new();
/// db.register::<Hand>().unwrap();
/// db.seal().unwrap();
///
/// let mut hand = Hand::default();
/// assert!(hand.set_property(&db, "cards[2]", 11u8));
/// assert!(hand.set_property(&db, "score", 21));
/// assert_eq!(hand.cards, [0, 0, 11]);
/// assert_eq!(hand.get_property::<i32>(&db, "score"), Some(&21));
/// assert_eq!(hand.invoke::<i32>(&db, "score", &[]), Ok(21));
/// ```
pub trait ReflectableExt: Reflect {
    /// The info of the concrete type of `self`.
    #[inline]
    fn type_info<'a>(&self, db: &'a TypeInfoDatabase) -> Option<&'a TypeInfo> {
        db.get_by_type_id(self.reflect_type_id())
    }

    #[inline]
    fn reflectable_class_id(&self, db: &TypeInfoDatabase) -> Option<ReflectableId> {
        self.type_info(db).map(TypeInfo::id)
    }

    // -------------------------------------------------------------------------
    // Properties

    /// See [`resolve`](crate::access::resolve).
    #[inline]
    fn resolve_property<'a>(
        &'a self,
        db: &'a TypeInfoDatabase,
        path: &str,
    ) -> Result<PropertyRef<'a>, PathError> {
        resolve(db, self.as_any(), path)
    }

    /// See [`resolve_mut`](crate::access::resolve_mut).
    #[inline]
    fn resolve_property_mut<'a>(
        &'a mut self,
        db: &'a TypeInfoDatabase,
        path: &str,
    ) -> Result<PropertyMut<'a>, PathError> {
        resolve_mut(db, self.as_any_mut(), path)
    }

    /// The value at `path`, or `None` if it cannot be resolved or is not a `T`.
    fn get_property<'a, T: Any>(&'a self, db: &'a TypeInfoDatabase, path: &str) -> Option<&'a T> {
        self.resolve_property(db, path).ok()?.value().downcast_ref()
    }

    /// Like [`get_property`](Self::get_property), but panics on failure.
    ///
    /// # Panics
    ///
    /// If `path` cannot be resolved or the value is not a `T`.
    #[track_caller]
    fn get_safe_property<'a, T: Any>(&'a self, db: &'a TypeInfoDatabase, path: &str) -> &'a T {
        match self.resolve_property(db, path) {
            Ok(found) => match found.value().downcast_ref() {
                Some(value) => value,
                None => panic!(
                    "property `{path}` is not a `{}`",
                    core::any::type_name::<T>()
                ),
            },
            Err(err) => panic!("property `{path}` could not be resolved: {err}"),
        }
    }

    /// The value at `path` for writing. A dynamic array index past the end
    /// grows the array.
    fn get_property_mut<'a, T: Any>(
        &'a mut self,
        db: &'a TypeInfoDatabase,
        path: &str,
    ) -> Option<&'a mut T> {
        self.resolve_property_mut(db, path)
            .ok()?
            .into_value()
            .downcast_mut()
    }

    /// Assigns `value` at `path`.
    ///
    /// Returns `false` if the path cannot be resolved or does not hold a `T`.
    fn set_property<T: Any>(&mut self, db: &TypeInfoDatabase, path: &str, value: T) -> bool {
        match self.get_property_mut::<T>(db, path) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    /// Removes an element or empties a container.
    ///
    /// With a trailing subscript, the array element or map entry it names is
    /// erased. Otherwise the path must name an array or a map, which is
    /// cleared. Returns `false` when nothing was erased.
    fn erase_property(&mut self, db: &TypeInfoDatabase, path: &str) -> bool {
        if path.ends_with(']') {
            let Some((prefix, key)) = split_last_subscript(path) else {
                return false;
            };
            let Ok(found) = self.resolve_property_mut(db, prefix) else {
                return false;
            };
            let handler = found.handler();
            let container = found.into_value();
            return match handler {
                DataStructureHandler::Array(array) => key
                    .parse()
                    .is_ok_and(|index| array.erase(container, index).unwrap_or(false)),
                DataStructureHandler::Map(map) => map.erase(container, key).unwrap_or(false),
                _ => false,
            };
        }

        let Ok(found) = self.resolve_property_mut(db, path) else {
            return false;
        };
        let handler = found.handler();
        let container = found.into_value();
        match handler {
            DataStructureHandler::Array(array) => array.clear(container).is_ok(),
            DataStructureHandler::Map(map) => map.clear(container).is_ok(),
            _ => false,
        }
    }

    // -------------------------------------------------------------------------
    // Type relations

    /// `true` if `self` is a `T` or one of its descendants.
    fn is_a<T: Reflectable>(&self, db: &TypeInfoDatabase) -> bool {
        let (Some(info), Some(id)) = (db.get_of::<T>(), self.reflectable_class_id(db)) else {
            return false;
        };
        info.is_parent_of(id, true)
    }

    /// Instantiates the concrete type with `&()` arguments and copies every
    /// hierarchy property into it.
    fn clone_reflectable(&self, db: &TypeInfoDatabase) -> Option<Box<dyn Reflect>> {
        let mut clone = db.try_instantiate(self.reflectable_class_id(db)?, &())?;
        clone_hierarchy_properties(db, clone.as_any_mut(), self.as_any()).then_some(clone)
    }

    #[inline]
    fn clone_as<T: Reflectable>(&self, db: &TypeInfoDatabase) -> Option<Box<T>> {
        self.clone_reflectable(db)?.downcast()
    }

    // -------------------------------------------------------------------------
    // Functions

    /// Looks `name` up on the type, then on its ancestors.
    fn get_function<'a>(&self, db: &'a TypeInfoDatabase, name: &str) -> Option<&'a FunctionInfo> {
        let info = self.type_info(db)?;
        info.find_function(name)
            .or_else(|| info.find_parent_function(db, name).map(|(function, _)| function))
    }

    /// Calls a function of the type or of an ancestor.
    ///
    /// An inherited function receives the embedded ancestor value.
    fn invoke_function(
        &mut self,
        db: &TypeInfoDatabase,
        name: &str,
        args: &[&dyn Any],
    ) -> Result<Box<dyn Any>, InvokeError> {
        let info = self.type_info(db).ok_or(InvokeError::NotReflectable)?;
        if let Some(function) = info.find_function(name) {
            return function.invoke(self.as_any_mut(), args);
        }

        let (function, parent) =
            info.find_parent_function(db, name)
                .ok_or_else(|| InvokeError::UnknownFunction { name: name.into() })?;
        let receiver = ObjectMut::new(db, self.as_any_mut())
            .ok_or(InvokeError::NotReflectable)?
            .into_parent_mut(db, &parent)
            .ok_or(InvokeError::ReceiverType)?;
        function.invoke(receiver, args)
    }

    /// [`invoke_function`](Self::invoke_function) with a typed return value.
    fn invoke<R: Any>(
        &mut self,
        db: &TypeInfoDatabase,
        name: &str,
        args: &[&dyn Any],
    ) -> Result<R, InvokeError> {
        self.invoke_function(db, name, args)?
            .downcast::<R>()
            .map(|value| *value)
            .map_err(|_| InvokeError::ReturnType)
    }
}

impl<R: Reflect + ?Sized> ReflectableExt for R {}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::ReflectableExt;
    use crate::Reflect;
    use crate::info::InvokeError;
    use crate::tests_support::*;
    use alloc::boxed::Box;
    use alloc::collections::BTreeMap;

    #[test]
    fn typed_access() {
        let db = database();
        let mut c = C::default();

        assert_eq!(c.get_property::<u32>(&db, "ctoto"), Some(&0xDEAD_BEEF));
        assert_eq!(c.get_property::<i32>(&db, "ctoto"), None);
        assert_eq!(c.get_property::<f32>(&db, "atoto"), Some(&0.0));
        assert_eq!(*c.get_safe_property::<i32>(&db, "aVector[1]"), 2);

        assert!(c.set_property(&db, "atoto", 4.5f32));
        assert_eq!(c.base.base.atoto, 4.5);
        assert!(!c.set_property(&db, "atoto", 4.5f64));
        assert!(c.set_property(&db, "mega.toto[2].titi[3]", 7));
        assert_eq!(c.mega.toto[2].titi[3], 7);
        assert!(!c.set_property(&db, "anArray[10]", 7));

        // Setting past the end grows the vector.
        assert!(c.set_property(&db, "aVector[4]", 5));
        assert_eq!(c.a_vector, [1, 2, 3, 0, 5]);
        assert!(!c.set_property(&db, "aVector[18446744073709551615]", 1i32));
        assert!(c.get_property_mut::<i32>(&db, "aVector[18446744073709551615]").is_none());
        assert_eq!(c.a_vector, [1, 2, 3, 0, 5]);

        *c.get_property_mut::<i32>(&db, "aMultiArray[9][9]").unwrap() = 99;
        assert_eq!(c.a_multi_array[9][9], 99);
    }

    #[test]
    #[should_panic(expected = "could not be resolved")]
    fn safe_property_panics() {
        let db = database();
        let c = C::default();
        c.get_safe_property::<u32>(&db, "missing");
    }

    #[test]
    fn erase() {
        let db = database();
        let mut d = D::default();
        d.a_map.insert(1, true);
        d.a_map.insert(2, false);
        d.a_map_in_map.insert(3, BTreeMap::from([(true, 1)]));

        assert!(d.erase_property(&db, "aVector[0]"));
        assert_eq!(d.base.a_vector, [2, 3]);
        assert!(!d.erase_property(&db, "aVector[7]"));

        assert!(d.erase_property(&db, "aMap[1]"));
        assert!(!d.erase_property(&db, "aMap[1]"));
        assert_eq!(d.a_map.len(), 1);

        assert!(d.erase_property(&db, "aMapInMap[3][true]"));
        assert!(d.a_map_in_map[&3].is_empty());

        assert!(!d.erase_property(&db, "aMap[]"));
        assert!(!d.erase_property(&db, "xp"));
        assert!(!d.erase_property(&db, "nothing"));

        // Fixed arrays reset their slots.
        d.base.an_array[4] = 1;
        assert!(d.erase_property(&db, "anArray[4]"));
        assert_eq!(d.base.an_array[4], 0);

        assert!(d.erase_property(&db, "aVector"));
        assert!(d.base.a_vector.is_empty());
        assert!(d.erase_property(&db, "aMap"));
        assert!(d.a_map.is_empty());
    }

    #[test]
    fn type_relations() {
        let db = database();
        let (a, b, c, sc) = (A::default(), B::default(), C::default(), SuperCompound::default());

        assert!(a.is_a::<A>(&db) && !a.is_a::<B>(&db) && !a.is_a::<C>(&db));
        assert!(b.is_a::<A>(&db) && b.is_a::<B>(&db) && !b.is_a::<C>(&db));
        assert!(c.is_a::<A>(&db) && c.is_a::<B>(&db) && c.is_a::<C>(&db));
        assert!(!c.is_a::<SuperCompound>(&db) && sc.is_a::<SuperCompound>(&db));
        assert!(!sc.is_a::<A>(&db));

        let boxed: Box<dyn Reflect> = Box::new(C::default());
        assert!(boxed.is_a::<B>(&db));
        assert_eq!(boxed.reflectable_class_id(&db), db.id_of::<C>());
    }

    #[test]
    fn clone() {
        let db = database();
        let mut compound = TestCompound2::default();
        compound.leet = 123_456_789;
        compound.copyable.a_useless_prop = 42.0;

        let clone = compound.clone_as::<TestCompound2>(&db).unwrap();
        assert_eq!(*clone, compound);
        assert!(!core::ptr::eq(&clone.leet, &compound.leet));

        let mut d = D::default();
        d.xp = 3;
        d.base.base.bdouble = 0.5;
        let clone = d.clone_reflectable(&db).unwrap();
        assert_eq!(clone.downcast_ref::<D>(), Some(&d));

        assert!(CustomInstantiated { config: 1 }.clone_reflectable(&db).is_none());
    }

    #[test]
    fn functions() {
        let db = database();
        let mut d = D::default();

        assert_eq!(d.invoke::<i32>(&db, "test", &[]), Ok(42));
        assert_eq!(d.invoke::<()>(&db, "Roger", &[]), Ok(()));
        assert_eq!(
            d.invoke::<u8>(&db, "test", &[]),
            Err(InvokeError::ReturnType)
        );
        assert_eq!(
            d.invoke_function(&db, "nothing", &[]).unwrap_err(),
            InvokeError::UnknownFunction { name: "nothing".into() }
        );
        assert!(d.get_function(&db, "test").is_some());
        assert!(A::default().get_function(&db, "Roger").is_none());

        let mut unknown = Tata;
        let mut db2 = crate::registry::TypeInfoDatabase::new();
        db2.seal().unwrap();
        assert_eq!(
            unknown.invoke_function(&db2, "test", &[]).unwrap_err(),
            InvokeError::NotReflectable
        );
    }
}
