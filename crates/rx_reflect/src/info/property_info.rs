use core::any::TypeId;
use core::fmt;

use super::{INVALID_REFLECTABLE_ID, MetaType, Metadata, ReflectableId};
use super::{SerializationPolicy, SerializationState};
use crate::Reflected;
use crate::access::FieldAccessor;
use crate::ops::DataStructureHandler;

/// Describes one field of a reflectable type.
///
/// Built by [`TypeInfoBuilder`](super::TypeInfoBuilder) and immutable
/// afterwards, except for the nested reflectable id which the database
/// resolves when sealed and rewrites on id import.
pub struct PropertyInfo {
    name: &'static str,
    offset: usize,
    size: usize,
    meta_type: MetaType,
    handler: DataStructureHandler,
    type_id: TypeId,
    type_name: &'static str,
    reflectable_id: ReflectableId,
    metadata: Metadata,
    accessor: FieldAccessor,
}

impl PropertyInfo {
    pub(crate) fn new<F: Reflected>(
        name: &'static str,
        offset: usize,
        metadata: Metadata,
        accessor: FieldAccessor,
    ) -> Self {
        Self {
            name,
            offset,
            size: size_of::<F>(),
            meta_type: F::META_TYPE,
            handler: F::data_handler(),
            type_id: TypeId::of::<F>(),
            type_name: core::any::type_name::<F>(),
            reflectable_id: INVALID_REFLECTABLE_ID,
            metadata,
            accessor,
        }
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Byte offset inside the type that declares the property.
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn meta_type(&self) -> MetaType {
        self.meta_type
    }

    #[inline]
    pub fn handler(&self) -> DataStructureHandler {
        self.handler
    }

    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Id of the nested reflectable for [`MetaType::Object`] properties,
    /// [`INVALID_REFLECTABLE_ID`] otherwise or before the database is sealed.
    #[inline]
    pub fn reflectable_id(&self) -> ReflectableId {
        self.reflectable_id
    }

    #[inline]
    pub fn metadata(&self) -> Metadata {
        self.metadata
    }

    /// Whether [`clone_hierarchy_properties`](crate::access::clone_hierarchy_properties)
    /// copies this property.
    #[inline]
    pub fn is_copyable(&self) -> bool {
        self.accessor.is_copyable()
    }

    #[inline]
    pub fn serialization_state(&self, policy: SerializationPolicy) -> SerializationState {
        self.metadata.serialization_state(policy)
    }

    #[inline]
    pub(crate) fn accessor(&self) -> &FieldAccessor {
        &self.accessor
    }

    #[inline]
    pub(crate) fn set_reflectable_id(&mut self, id: ReflectableId) {
        self.reflectable_id = id;
    }
}

impl fmt::Debug for PropertyInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyInfo")
            .field("name", &self.name)
            .field("offset", &self.offset)
            .field("size", &self.size)
            .field("meta_type", &self.meta_type)
            .field("type_name", &self.type_name)
            .field("reflectable_id", &self.reflectable_id)
            .field("metadata", &self.metadata)
            .finish_non_exhaustive()
    }
}
