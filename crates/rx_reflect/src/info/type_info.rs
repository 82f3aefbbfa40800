use alloc::vec::Vec;
use core::any::TypeId;
use core::fmt;

use super::{FunctionInfo, PropertyInfo, ReflectableId};
use crate::access::FieldAccessor;
use crate::registry::TypeInfoDatabase;

// -----------------------------------------------------------------------------
// ParentClass

/// An ancestor of a reflectable type.
///
/// `offset` is the byte offset of the ancestor's embedded value inside the
/// type that lists it, accumulated across intermediate parents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParentClass {
    pub(crate) id: ReflectableId,
    pub(crate) type_id: TypeId,
    pub(crate) offset: usize,
}

impl ParentClass {
    #[inline]
    pub fn id(&self) -> ReflectableId {
        self.id
    }

    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }
}

// -----------------------------------------------------------------------------
// HierarchyProperty

/// A property found in a type or one of its ancestors.
///
/// Only produced by the [`TypeInfo`] lookups. The offset is absolute within
/// the type the lookup started from, and the value can only be projected out
/// of an instance of that type.
#[derive(Debug, Clone, Copy)]
pub struct HierarchyProperty<'a> {
    property: &'a PropertyInfo,
    offset: usize,
    root: TypeId,
}

impl<'a> HierarchyProperty<'a> {
    #[inline]
    pub fn property(&self) -> &'a PropertyInfo {
        self.property
    }

    /// Byte offset from the start of the root object.
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// The [`TypeId`] of the type the lookup started from.
    #[inline]
    pub fn root(&self) -> TypeId {
        self.root
    }
}

// -----------------------------------------------------------------------------
// TypeInfo

/// The registered description of a [`Reflectable`](crate::Reflectable) type.
///
/// Holds the direct properties and functions of the type, every ancestor
/// (nearest first) and the ids of every descendant.
pub struct TypeInfo {
    id: ReflectableId,
    name: &'static str,
    type_id: TypeId,
    type_name: &'static str,
    size: usize,
    properties: Vec<PropertyInfo>,
    functions: Vec<FunctionInfo>,
    parents: Vec<ParentClass>,
    children: Vec<ReflectableId>,
    accessor: FieldAccessor,
}

impl TypeInfo {
    pub(crate) fn new(
        id: ReflectableId,
        name: &'static str,
        type_id: TypeId,
        type_name: &'static str,
        size: usize,
        properties: Vec<PropertyInfo>,
        functions: Vec<FunctionInfo>,
        parents: Vec<ParentClass>,
        accessor: FieldAccessor,
    ) -> Self {
        Self {
            id,
            name,
            type_id,
            type_name,
            size,
            properties,
            functions,
            parents,
            children: Vec::new(),
            accessor,
        }
    }

    #[inline]
    pub fn id(&self) -> ReflectableId {
        self.id
    }

    /// The declared display name, e.g. `"testNS::Nested"`.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// The Rust type name, for diagnostics.
    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Direct properties in declaration order.
    #[inline]
    pub fn properties(&self) -> &[PropertyInfo] {
        &self.properties
    }

    #[inline]
    pub fn functions(&self) -> &[FunctionInfo] {
        &self.functions
    }

    /// Every ancestor, nearest first.
    #[inline]
    pub fn parents(&self) -> &[ParentClass] {
        &self.parents
    }

    /// Ids of every descendant.
    #[inline]
    pub fn children(&self) -> &[ReflectableId] {
        &self.children
    }

    /// Searches the direct properties only.
    pub fn find_property(&self, name: &str) -> Option<&PropertyInfo> {
        self.properties.iter().find(|p| p.name() == name)
    }

    /// Searches the direct properties of each entry of [`parents`](Self::parents),
    /// in order.
    pub fn find_parent_class_property<'a>(
        &'a self,
        db: &'a TypeInfoDatabase,
        name: &str,
    ) -> Option<HierarchyProperty<'a>> {
        self.ancestors(db).find_map(|(info, base)| {
            info.find_property(name).map(|property| HierarchyProperty {
                property,
                offset: base + property.offset(),
                root: self.type_id,
            })
        })
    }

    /// Own properties first, then [`find_parent_class_property`](Self::find_parent_class_property).
    /// The first match wins, so a property can shadow an inherited one.
    pub fn find_property_in_hierarchy<'a>(
        &'a self,
        db: &'a TypeInfoDatabase,
        name: &str,
    ) -> Option<HierarchyProperty<'a>> {
        match self.find_property(name) {
            Some(property) => Some(HierarchyProperty {
                property,
                offset: property.offset(),
                root: self.type_id,
            }),
            None => self.find_parent_class_property(db, name),
        }
    }

    /// Every property of the hierarchy, base to derived.
    ///
    /// The deepest ancestor comes first. Within a class, properties keep
    /// their declaration order. This is the order of JSON keys and of binary
    /// properties.
    pub fn properties_in_hierarchy<'a>(
        &'a self,
        db: &'a TypeInfoDatabase,
    ) -> impl Iterator<Item = HierarchyProperty<'a>> + 'a {
        let root = self.type_id;
        let ancestors: Vec<_> = self.ancestors(db).collect();
        ancestors
            .into_iter()
            .rev()
            .chain(core::iter::once((self, 0)))
            .flat_map(move |(info, base)| {
                info.properties.iter().map(move |property| HierarchyProperty {
                    property,
                    offset: base + property.offset(),
                    root,
                })
            })
    }

    #[inline]
    pub fn for_each_property_in_hierarchy<'a>(
        &'a self,
        db: &'a TypeInfoDatabase,
        f: impl FnMut(HierarchyProperty<'a>),
    ) {
        self.properties_in_hierarchy(db).for_each(f);
    }

    /// `true` if `id` is this type (when `include_self`) or one of its descendants.
    pub fn is_parent_of(&self, id: ReflectableId, include_self: bool) -> bool {
        (include_self && id == self.id) || self.children.contains(&id)
    }

    pub fn find_function(&self, name: &str) -> Option<&FunctionInfo> {
        self.functions.iter().find(|f| f.name() == name)
    }

    /// Searches the direct functions of each ancestor, nearest first.
    ///
    /// Also returns the ancestor, which locates the receiver inside an instance.
    pub fn find_parent_function<'a>(
        &'a self,
        db: &'a TypeInfoDatabase,
        name: &str,
    ) -> Option<(&'a FunctionInfo, ParentClass)> {
        self.parents.iter().find_map(|parent| {
            let info = db.get(parent.id).filter(|i| i.type_id == parent.type_id)?;
            info.find_function(name).map(|f| (f, *parent))
        })
    }

    fn ancestors<'a>(
        &'a self,
        db: &'a TypeInfoDatabase,
    ) -> impl DoubleEndedIterator<Item = (&'a TypeInfo, usize)> + 'a {
        self.parents.iter().filter_map(move |parent| {
            let info = db.get(parent.id).filter(|i| i.type_id == parent.type_id)?;
            Some((info, parent.offset))
        })
    }

    // -------------------------------------------------------------------------
    // Database maintenance

    #[inline]
    pub(crate) fn accessor(&self) -> &FieldAccessor {
        &self.accessor
    }

    #[inline]
    pub(crate) fn set_id(&mut self, id: ReflectableId) {
        self.id = id;
    }

    #[inline]
    pub(crate) fn push_child(&mut self, id: ReflectableId) {
        if !self.children.contains(&id) {
            self.children.push(id);
        }
    }

    #[inline]
    pub(crate) fn properties_mut(&mut self) -> &mut [PropertyInfo] {
        &mut self.properties
    }

    /// Rewrites every id this info refers to.
    pub(crate) fn remap_ids(&mut self, map: impl Fn(ReflectableId) -> ReflectableId) {
        self.id = map(self.id);
        for parent in &mut self.parents {
            parent.id = map(parent.id);
        }
        for child in &mut self.children {
            *child = map(*child);
        }
        for property in &mut self.properties {
            if property.reflectable_id() != super::INVALID_REFLECTABLE_ID {
                property.set_reflectable_id(map(property.reflectable_id()));
            }
        }
    }
}

impl fmt::Debug for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeInfo")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("size", &self.size)
            .field("properties", &self.properties)
            .field("functions", &self.functions)
            .field("parents", &self.parents)
            .field("children", &self.children)
            .finish_non_exhaustive()
    }
}

// -----------------------------------------------------------------------------
// Tests
