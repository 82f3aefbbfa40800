#![expect(unsafe_code, reason = "projects properties by byte offset")]

use core::any::Any;

use rx_ptr::{Ptr, PtrMut};

use crate::info::{HierarchyProperty, ParentClass, TypeInfo};
use crate::registry::TypeInfoDatabase;

// -----------------------------------------------------------------------------
// ObjectRef

/// A registered object together with its [`TypeInfo`].
///
/// The info is found by the value's [`TypeId`](core::any::TypeId), and field
/// projection only accepts [`HierarchyProperty`] values whose root is that
/// same type. Offsets therefore always land on a field of the right type.
#[derive(Clone, Copy)]
pub struct ObjectRef<'a> {
    value: &'a dyn Any,
    info: &'a TypeInfo,
}

impl<'a> ObjectRef<'a> {
    /// Returns `None` if the value's type is not registered in `db`.
    pub fn new(db: &'a TypeInfoDatabase, value: &'a dyn Any) -> Option<Self> {
        let info = db.get_by_type_id((*value).type_id())?;
        Some(Self { value, info })
    }

    #[inline]
    pub fn info(&self) -> &'a TypeInfo {
        self.info
    }

    #[inline]
    pub fn value(&self) -> &'a dyn Any {
        self.value
    }

    /// The value of a property of this object or of one of its ancestors.
    ///
    /// Returns `None` if `property` was looked up on another type.
    pub fn field(&self, property: &HierarchyProperty<'_>) -> Option<&'a dyn Any> {
        if property.root() != self.info.type_id() {
            return None;
        }
        let base = Ptr::from_ref(self.value);
        // SAFETY: the root check ties the offset to the concrete type of
        // `value`, and the accessor was built for the field's type.
        unsafe {
            let field = base.field(property.offset());
            Some(property.property().accessor().get(field))
        }
    }
}

// -----------------------------------------------------------------------------
// ObjectMut

/// Exclusive counterpart of [`ObjectRef`].
pub struct ObjectMut<'a> {
    value: &'a mut dyn Any,
    info: &'a TypeInfo,
}

impl<'a> ObjectMut<'a> {
    pub fn new(db: &'a TypeInfoDatabase, value: &'a mut dyn Any) -> Option<Self> {
        let info = db.get_by_type_id((*value).type_id())?;
        Some(Self { value, info })
    }

    #[inline]
    pub fn info(&self) -> &'a TypeInfo {
        self.info
    }

    #[inline]
    pub fn as_object_ref(&self) -> ObjectRef<'_> {
        ObjectRef {
            value: &*self.value,
            info: self.info,
        }
    }

    pub fn field(&self, property: &HierarchyProperty<'_>) -> Option<&dyn Any> {
        self.as_object_ref().field(property)
    }

    pub fn field_mut(&mut self, property: &HierarchyProperty<'_>) -> Option<&mut dyn Any> {
        project_mut(&mut *self.value, self.info, property)
    }

    pub fn into_field_mut(self, property: &HierarchyProperty<'_>) -> Option<&'a mut dyn Any> {
        project_mut(self.value, self.info, property)
    }

    /// The embedded value of an ancestor, as its own type.
    ///
    /// `parent` must be one of [`TypeInfo::parents`] of this object's type.
    pub fn parent_mut(
        &mut self,
        db: &TypeInfoDatabase,
        parent: &ParentClass,
    ) -> Option<&mut dyn Any> {
        upcast_mut(&mut *self.value, self.info, db, parent)
    }

    pub fn into_parent_mut(
        self,
        db: &TypeInfoDatabase,
        parent: &ParentClass,
    ) -> Option<&'a mut dyn Any> {
        upcast_mut(self.value, self.info, db, parent)
    }
}

fn project_mut<'a>(
    value: &'a mut dyn Any,
    info: &TypeInfo,
    property: &HierarchyProperty<'_>,
) -> Option<&'a mut dyn Any> {
    if property.root() != info.type_id() {
        return None;
    }
    let base = PtrMut::from_mut(value);
    // SAFETY: see `ObjectRef::field`.
    unsafe {
        let field = base.field(property.offset());
        Some(property.property().accessor().get_mut(field))
    }
}

fn upcast_mut<'a>(
    value: &'a mut dyn Any,
    info: &TypeInfo,
    db: &TypeInfoDatabase,
    parent: &ParentClass,
) -> Option<&'a mut dyn Any> {
    if !info.parents().contains(parent) {
        return None;
    }
    let parent_info = db
        .get(parent.id())
        .filter(|p| TypeInfo::type_id(p) == parent.type_id())?;
    let base = PtrMut::from_mut(value);
    // SAFETY: `parent` belongs to the type of `value`, so its offset locates
    // an embedded value of the parent's type.
    unsafe {
        let field = base.field(parent.offset());
        Some(parent_info.accessor().get_mut(field))
    }
}

// -----------------------------------------------------------------------------
// Hierarchy copy

/// Clone-assigns every copyable property of `src` into `dest`, ancestors first.
///
/// Both values must be of the same registered type. Properties declared
/// without a copy function are skipped. Returns `false` if the types differ
/// or are not registered.
pub fn clone_hierarchy_properties(
    db: &TypeInfoDatabase,
    dest: &mut dyn Any,
    src: &dyn Any,
) -> bool {
    if (*dest).type_id() != (*src).type_id() {
        return false;
    }
    let Some(object) = ObjectRef::new(db, src) else {
        return false;
    };

    let src = Ptr::from_ref(src);
    let mut dest = PtrMut::from_mut(dest);
    for property in object.info().properties_in_hierarchy(db) {
        // SAFETY: both pointers are values of the property's root type, and
        // they cannot alias since one is borrowed exclusively.
        unsafe {
            let target = dest.reborrow().field(property.offset());
            let source = src.field(property.offset());
            property.property().accessor().copy(target, source);
        }
    }
    true
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{ObjectMut, ObjectRef, clone_hierarchy_properties};
    use crate::tests_support::{A, B, C, Copyable, D, database};

    #[test]
    fn projection_checks_root() {
        let db = database();
        let c = C::default();
        let object = ObjectRef::new(&db, &c).unwrap();

        let ctoto = object.info().find_property_in_hierarchy(&db, "ctoto").unwrap();
        let value = object.field(&ctoto).unwrap();
        assert_eq!(value.downcast_ref::<u32>(), Some(&0xDEAD_BEEF));

        let d_info = db.get_of::<D>().unwrap();
        let foreign = d_info.find_property_in_hierarchy(&db, "ctoto").unwrap();
        assert!(object.field(&foreign).is_none());

        assert!(ObjectRef::new(&db, &5i32).is_none());
    }

    #[test]
    fn parent_upcast() {
        let db = database();
        let mut d = D::default();
        let mut object = ObjectMut::new(&db, &mut d).unwrap();

        let info = object.info();
        let a = *info.parents().last().unwrap();
        let base = object.parent_mut(&db, &a).unwrap();
        base.downcast_mut::<A>().unwrap().atoto = 2.5;
        assert_eq!(d.base.base.base.atoto, 2.5);

        let mut b = B::default();
        let object = ObjectMut::new(&db, &mut b).unwrap();
        assert!(object.into_parent_mut(&db, &a).is_some());

        let mut c = C::default();
        let object = ObjectMut::new(&db, &mut c).unwrap();
        let d_parent = db.get_of::<D>().unwrap().parents()[0];
        assert!(object.into_parent_mut(&db, &d_parent).is_none());
    }

    #[test]
    fn hierarchy_copy() {
        let db = database();
        let mut src = D::default();
        src.base.base.base.atoto = 12.0;
        src.base.ctoto = 3;
        src.base.a_vector.push(4);
        src.xp = 7;

        let mut dest = D::default();
        assert!(clone_hierarchy_properties(&db, &mut dest, &src));
        assert_eq!(dest, src);

        let mut other = Copyable::default();
        assert!(!clone_hierarchy_properties(&db, &mut other, &src));
    }
}
