use alloc::vec::Vec;
use core::any::Any;

use super::BinaryError;
use crate::Reflect;
use crate::access::ObjectRef;
use crate::info::MetaType;
use crate::ops::{DataStructureHandler, HandlerError, WireScalar};
use crate::registry::TypeInfoDatabase;

/// Encodes `value` and every property of its hierarchy.
///
/// Unlike the text serializer, no property is filtered out.
pub fn serialize_binary(db: &TypeInfoDatabase, value: &dyn Reflect) -> Result<Vec<u8>, BinaryError> {
    debug_assert!(db.is_sealed(), "serializing before the database is sealed");
    let object = ObjectRef::new(db, value.as_any()).ok_or(BinaryError::NotReflectable)?;
    let mut writer = Writer { db, out: Vec::new() };
    writer.write_object(object)?;
    Ok(writer.out)
}

struct Writer<'a> {
    db: &'a TypeInfoDatabase,
    out: Vec<u8>,
}

impl Writer<'_> {
    fn write_object(&mut self, object: ObjectRef<'_>) -> Result<(), BinaryError> {
        let header = self.out.len();
        self.out.extend_from_slice(&object.info().id().to_le_bytes());
        self.out.extend_from_slice(&0u32.to_le_bytes());

        let mut count = 0u32;
        for property in object.info().properties_in_hierarchy(self.db) {
            let declared = property.property();
            let value = object.field(&property).ok_or(BinaryError::NotReflectable)?;

            self.write_tag(declared.meta_type(), 3);
            self.out
                .extend_from_slice(&(property.offset() as u32).to_le_bytes());
            self.write_value(value, declared.meta_type(), declared.handler())?;
            count += 1;
        }

        self.out[header + 4..header + 8].copy_from_slice(&count.to_le_bytes());
        Ok(())
    }

    /// The tag byte followed by `padding` zero bytes.
    #[inline]
    fn write_tag(&mut self, meta_type: MetaType, padding: usize) {
        self.out.push(meta_type.as_u8());
        self.out.resize(self.out.len() + padding, 0);
    }

    #[inline]
    fn write_len(&mut self, len: usize) {
        self.out.extend_from_slice(&(len as u64).to_le_bytes());
    }

    fn write_scalar<T: Any + WireScalar>(&mut self, value: &dyn Any) -> Result<(), BinaryError> {
        let value = value
            .downcast_ref::<T>()
            .ok_or_else(HandlerError::mismatch::<T>)?;
        value.write_wire(&mut self.out);
        Ok(())
    }

    fn write_value(
        &mut self,
        value: &dyn Any,
        meta_type: MetaType,
        handler: DataStructureHandler,
    ) -> Result<(), BinaryError> {
        match meta_type {
            MetaType::Bool => self.write_scalar::<bool>(value),
            MetaType::Char => self.write_scalar::<i8>(value),
            MetaType::UChar => self.write_scalar::<u8>(value),
            MetaType::Short => self.write_scalar::<i16>(value),
            MetaType::UShort => self.write_scalar::<u16>(value),
            MetaType::Int => self.write_scalar::<i32>(value),
            MetaType::Uint => self.write_scalar::<u32>(value),
            MetaType::Int64 => self.write_scalar::<i64>(value),
            MetaType::Uint64 => self.write_scalar::<u64>(value),
            MetaType::Float => self.write_scalar::<f32>(value),
            MetaType::Double => self.write_scalar::<f64>(value),
            MetaType::Enum => {
                let enums = handler
                    .enum_handler()
                    .ok_or(BinaryError::UnmanagedMetaType(meta_type))?;
                let repr = enums.enum_meta_type();
                let width = repr
                    .scalar_width()
                    .ok_or(BinaryError::UnmanagedMetaType(repr))?;
                let bits = enums.to_bits(value)?;
                self.out.extend_from_slice(&bits.to_le_bytes()[..width]);
                Ok(())
            }
            MetaType::Array => {
                let array = handler
                    .array_handler()
                    .ok_or(BinaryError::UnmanagedMetaType(meta_type))?;
                let element_type = array.element_type();
                if element_type == MetaType::Unknown {
                    return Ok(());
                }

                let len = array.size(value)?;
                self.write_tag(element_type, 7);
                self.write_len(array.element_size());
                self.write_len(len);

                let element_handler = array.element_handler();
                for index in 0..len {
                    let element = array.get(value, index)?;
                    self.write_value(element, element_type, element_handler)?;
                }
                Ok(())
            }
            MetaType::Map => {
                let map = handler
                    .map_handler()
                    .ok_or(BinaryError::UnmanagedMetaType(meta_type))?;
                self.write_tag(map.key_meta_type(), 7);
                self.write_len(map.sizeof_key());
                self.write_tag(map.value_meta_type(), 7);
                self.write_len(map.sizeof_value());
                self.write_len(map.size(value)?);

                let (key_handler, value_handler) = (map.key_handler(), map.value_handler());
                for (key, entry) in map.iter(value)? {
                    self.write_value(key, map.key_meta_type(), key_handler)?;
                    self.write_value(entry, map.value_meta_type(), value_handler)?;
                }
                Ok(())
            }
            MetaType::Object => {
                let object = ObjectRef::new(self.db, value).ok_or(BinaryError::NotReflectable)?;
                self.write_object(object)
            }
            MetaType::Unknown | MetaType::Void | MetaType::Reference => {
                Err(BinaryError::UnmanagedMetaType(meta_type))
            }
        }
    }
}
