use alloc::boxed::Box;
use core::any::Any;

use super::BinaryError;
use crate::access::ObjectMut;
use crate::info::{INVALID_REFLECTABLE_ID, MetaType, ReflectableId, TypeInfo};
use crate::ops::{ArrayHandler, DataStructureHandler, HandlerError, MapHandler, WireScalar};
use crate::registry::TypeInfoDatabase;
use crate::{Reflect, Reflectable};

// -----------------------------------------------------------------------------
// Entry points

/// Decodes `bytes` into the existing `target`.
///
/// The serialized type must be the type of `target` or one of its ancestors.
/// Properties are matched by offset: a property of `target` whose offset has
/// no serialized value keeps its value.
pub fn deserialize_into(
    db: &TypeInfoDatabase,
    bytes: &[u8],
    target: &mut dyn Reflect,
) -> Result<(), BinaryError> {
    debug_assert!(db.is_sealed(), "deserializing before the database is sealed");
    if bytes.is_empty() {
        return Err(BinaryError::Empty);
    }

    let mut reader = Reader { db, bytes, offset: 0 };
    let (id, count) = reader.object_header()?;
    if count == 0 {
        return Ok(());
    }

    let object = ObjectMut::new(db, target.as_any_mut()).ok_or(BinaryError::NotReflectable)?;
    if !reader.is_compatible(id, object.info()) {
        return Err(BinaryError::Incompatible);
    }
    reader.read_properties(object, count)
}

/// Instantiates `T` with `&()` arguments and decodes `bytes` into it.
pub fn deserialize_binary<T: Reflectable>(
    db: &TypeInfoDatabase,
    bytes: &[u8],
) -> Result<Box<T>, BinaryError> {
    let Some(mut value) = db.instantiate_class::<T>(&()) else {
        return Err(BinaryError::Instantiate {
            id: db.id_of::<T>().unwrap_or(INVALID_REFLECTABLE_ID),
        });
    };
    deserialize_into(db, bytes, &mut *value)?;
    Ok(value)
}

// -----------------------------------------------------------------------------
// Reader

struct Reader<'a> {
    db: &'a TypeInfoDatabase,
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> Reader<'a> {
    fn take(&mut self, len: usize) -> Result<&'a [u8], BinaryError> {
        let slice = self
            .offset
            .checked_add(len)
            .and_then(|end| self.bytes.get(self.offset..end))
            .ok_or(BinaryError::UnexpectedEnd { offset: self.offset })?;
        self.offset += len;
        Ok(slice)
    }

    fn read_u32(&mut self) -> Result<u32, BinaryError> {
        let mut buf = [0; 4];
        buf.copy_from_slice(self.take(4)?);
        Ok(u32::from_le_bytes(buf))
    }

    fn read_len(&mut self) -> Result<usize, BinaryError> {
        let start = self.offset;
        let mut buf = [0; 8];
        buf.copy_from_slice(self.take(8)?);
        usize::try_from(u64::from_le_bytes(buf))
            .map_err(|_| BinaryError::LayoutMismatch { offset: start })
    }

    /// The tag byte, skipping `padding` bytes after it.
    fn read_tag(&mut self, padding: usize) -> Result<MetaType, BinaryError> {
        let offset = self.offset;
        let byte = self.take(1 + padding)?[0];
        MetaType::from_u8(byte).ok_or(BinaryError::InvalidMetaType { offset, byte })
    }

    fn object_header(&mut self) -> Result<(ReflectableId, u32), BinaryError> {
        Ok((self.read_u32()?, self.read_u32()?))
    }

    fn property_header(&mut self) -> Result<(MetaType, usize), BinaryError> {
        let meta_type = self.read_tag(3)?;
        Ok((meta_type, self.read_u32()? as usize))
    }

    /// `true` if the serialized type `id` is `info` or one of its ancestors.
    fn is_compatible(&self, id: ReflectableId, info: &TypeInfo) -> bool {
        self.db
            .get(id)
            .is_some_and(|serialized| serialized.is_parent_of(info.id(), true))
    }

    fn read_properties(
        &mut self,
        mut object: ObjectMut<'_>,
        count: u32,
    ) -> Result<(), BinaryError> {
        let info = object.info();
        let mut pending = Some(self.property_header()?);
        let mut read = 0u32;

        for property in info.properties_in_hierarchy(self.db) {
            let Some((meta_type, offset)) = pending else {
                break;
            };
            let declared = property.property();

            if property.offset() != offset {
                log::trace!("no serialized value for `{}::{}`", info.name(), declared.name());
                continue;
            }
            if meta_type != declared.meta_type() {
                return Err(BinaryError::LayoutMismatch { offset: self.offset });
            }

            let value = object.field_mut(&property).ok_or(BinaryError::NotReflectable)?;
            self.read_value(value, meta_type, declared.handler())?;

            read += 1;
            pending = if read < count {
                Some(self.property_header()?)
            } else {
                None
            };
        }

        // A record left over would be read as the next property of the parent.
        match pending {
            Some(_) => Err(BinaryError::LayoutMismatch { offset: self.offset }),
            None => Ok(()),
        }
    }

    /// Consumes the `count` property records of a serialized `id`, laid out
    /// as its registered description declares them.
    fn skip_object(&mut self, id: ReflectableId, count: u32) -> Result<(), BinaryError> {
        if count == 0 {
            return Ok(());
        }
        let db = self.db;
        let info = db.get(id).ok_or(BinaryError::Incompatible)?;
        let mut pending = Some(self.property_header()?);
        let mut skipped = 0u32;

        for property in info.properties_in_hierarchy(db) {
            let Some((meta_type, offset)) = pending else {
                break;
            };
            if property.offset() != offset {
                continue;
            }
            let declared = property.property();
            if meta_type != declared.meta_type() {
                return Err(BinaryError::LayoutMismatch { offset: self.offset });
            }
            self.skip_value(meta_type, declared.handler())?;

            skipped += 1;
            pending = if skipped < count {
                Some(self.property_header()?)
            } else {
                None
            };
        }

        match pending {
            Some(_) => Err(BinaryError::LayoutMismatch { offset: self.offset }),
            None => Ok(()),
        }
    }

    fn skip_value(
        &mut self,
        meta_type: MetaType,
        handler: DataStructureHandler,
    ) -> Result<(), BinaryError> {
        match meta_type {
            MetaType::Enum => {
                let repr = handler
                    .enum_handler()
                    .ok_or(BinaryError::UnmanagedMetaType(meta_type))?
                    .enum_meta_type();
                let width = repr
                    .scalar_width()
                    .ok_or(BinaryError::UnmanagedMetaType(repr))?;
                self.take(width)?;
                Ok(())
            }
            MetaType::Array => {
                let array = handler
                    .array_handler()
                    .ok_or(BinaryError::UnmanagedMetaType(meta_type))?;
                if array.element_type() == MetaType::Unknown {
                    return Ok(());
                }
                let len = self.array_header(array)?;
                let element_handler = array.element_handler();
                for _ in 0..len {
                    self.skip_value(array.element_type(), element_handler)?;
                }
                Ok(())
            }
            MetaType::Map => {
                let map = handler
                    .map_handler()
                    .ok_or(BinaryError::UnmanagedMetaType(meta_type))?;
                let len = self.map_header(map)?;
                let value_handler = map.value_handler();
                for _ in 0..len {
                    self.take(map.sizeof_key())?;
                    self.skip_value(map.value_meta_type(), value_handler)?;
                }
                Ok(())
            }
            MetaType::Object => {
                let (id, count) = self.object_header()?;
                self.skip_object(id, count)
            }
            MetaType::Unknown | MetaType::Void | MetaType::Reference => {
                Err(BinaryError::UnmanagedMetaType(meta_type))
            }
            scalar => {
                let width = scalar
                    .scalar_width()
                    .ok_or(BinaryError::UnmanagedMetaType(scalar))?;
                self.take(width)?;
                Ok(())
            }
        }
    }

    /// Checks an array header against `array` and returns the element count.
    fn array_header(&mut self, array: &dyn ArrayHandler) -> Result<usize, BinaryError> {
        let header = self.offset;
        let element_type = self.read_tag(7)?;
        let element_size = self.read_len()?;
        let len = self.read_len()?;
        if element_type != array.element_type() || element_size != array.element_size() {
            return Err(BinaryError::LayoutMismatch { offset: header });
        }
        Ok(len)
    }

    /// Checks a map header against `map` and returns the entry count.
    fn map_header(&mut self, map: &dyn MapHandler) -> Result<usize, BinaryError> {
        let header = self.offset;
        let key_type = self.read_tag(7)?;
        let key_size = self.read_len()?;
        let value_type = self.read_tag(7)?;
        let value_size = self.read_len()?;
        let len = self.read_len()?;
        if key_type != map.key_meta_type()
            || key_size != map.sizeof_key()
            || value_type != map.value_meta_type()
            || value_size != map.sizeof_value()
        {
            return Err(BinaryError::LayoutMismatch { offset: header });
        }
        Ok(len)
    }

    fn read_scalar<T: Any + WireScalar>(&mut self, value: &mut dyn Any) -> Result<(), BinaryError> {
        let offset = self.offset;
        let decoded = T::read_wire(self.take(T::WIRE_SIZE)?)
            .ok_or(BinaryError::LayoutMismatch { offset })?;
        *value
            .downcast_mut::<T>()
            .ok_or_else(HandlerError::mismatch::<T>)? = decoded;
        Ok(())
    }

    fn read_value(
        &mut self,
        value: &mut dyn Any,
        meta_type: MetaType,
        handler: DataStructureHandler,
    ) -> Result<(), BinaryError> {
        match meta_type {
            MetaType::Bool => self.read_scalar::<bool>(value),
            MetaType::Char => self.read_scalar::<i8>(value),
            MetaType::UChar => self.read_scalar::<u8>(value),
            MetaType::Short => self.read_scalar::<i16>(value),
            MetaType::UShort => self.read_scalar::<u16>(value),
            MetaType::Int => self.read_scalar::<i32>(value),
            MetaType::Uint => self.read_scalar::<u32>(value),
            MetaType::Int64 => self.read_scalar::<i64>(value),
            MetaType::Uint64 => self.read_scalar::<u64>(value),
            MetaType::Float => self.read_scalar::<f32>(value),
            MetaType::Double => self.read_scalar::<f64>(value),
            MetaType::Enum => {
                let enums = handler
                    .enum_handler()
                    .ok_or(BinaryError::UnmanagedMetaType(meta_type))?;
                let repr = enums.enum_meta_type();
                let width = repr
                    .scalar_width()
                    .ok_or(BinaryError::UnmanagedMetaType(repr))?;

                let mut buf = [0; 8];
                buf[..width].copy_from_slice(self.take(width)?);
                enums.set_from_bits(value, u64::from_le_bytes(buf))?;
                Ok(())
            }
            MetaType::Array => {
                let array = handler
                    .array_handler()
                    .ok_or(BinaryError::UnmanagedMetaType(meta_type))?;
                if array.element_type() == MetaType::Unknown {
                    return Ok(());
                }
                let len = self.array_header(array)?;

                array.clear(&mut *value)?;
                let element_type = array.element_type();
                let element_handler = array.element_handler();
                for index in 0..len {
                    let element = array.read(&mut *value, index)?;
                    self.read_value(element, element_type, element_handler)?;
                }
                Ok(())
            }
            MetaType::Map => {
                let map = handler
                    .map_handler()
                    .ok_or(BinaryError::UnmanagedMetaType(meta_type))?;
                let len = self.map_header(map)?;

                map.clear(&mut *value)?;
                let key_size = map.sizeof_key();
                let value_type = map.value_meta_type();
                let value_handler = map.value_handler();
                for _ in 0..len {
                    let key = self.take(key_size)?;
                    let entry = map.binary_create(&mut *value, key, None)?;
                    self.read_value(entry, value_type, value_handler)?;
                }
                Ok(())
            }
            MetaType::Object => {
                let (id, count) = self.object_header()?;
                if count == 0 {
                    return Ok(());
                }

                let object = ObjectMut::new(self.db, value).ok_or(BinaryError::NotReflectable)?;
                if !self.is_compatible(id, object.info()) {
                    log::warn!(
                        "skipping serialized reflectable {id}, incompatible with `{}`",
                        object.info().name()
                    );
                    return self.skip_object(id, count);
                }
                self.read_properties(object, count)
            }
            MetaType::Unknown | MetaType::Void | MetaType::Reference => {
                Err(BinaryError::UnmanagedMetaType(meta_type))
            }
        }
    }
}
