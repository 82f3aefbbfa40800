use alloc::format;
use alloc::vec::Vec;
use core::any::{Any, type_name};

use serde_core::ser::{Error, SerializeMap, SerializeSeq};
use serde_core::{Serialize, Serializer};

use super::SerializeConfig;
use super::error_utils::{pop_type, push_type, reset_types, ser_error};
use crate::Reflect;
use crate::access::ObjectRef;
use crate::info::{Attribute, MetaType, Metadata};
use crate::ops::{ArrayHandler, DataStructureHandler, MapHandler};
use crate::registry::TypeInfoDatabase;

// -----------------------------------------------------------------------------
// ReflectSerializer

/// Serializes a registered object as a map of its properties.
///
/// The properties of every ancestor come first, then the type's own, each
/// in declaration order. Properties excluded by the
/// [policy](SerializeConfig::policy) are left out.
///
/// | MetaType                   | written as                        |
/// |----------------------------|-----------------------------------|
/// | `Bool`                     | bool                              |
/// | `Char` .. `Uint64`         | integer of the declared width     |
/// | `Float`, `Double`          | `f64`                             |
/// | `Array`                    | sequence                          |
/// | `Map`                      | map keyed by the key's text form  |
/// | `Enum`                     | string                            |
/// | `Object`                   | nested map                        |
///
/// When [`serialize_metadata`](SerializeConfig::serialize_metadata) is set,
/// a property carrying attributes is followed by a `"<name>_metadata"`
/// entry describing them.
///
/// # Examples
///
/// ```
/// # use rx_reflect::registry::TypeInfoDatabase;
/// # use rx_reflect::serde::{ReflectSerializer, SerializeConfig};
/// # use rx_reflect::{property, reflectable};
/// #[repr(C)]
/// #[derive(Clone, Default)]
/// struct Score {
///     points: i32,
///     ratio: f32,
/// }
///
/// reflectable!(Score => "Score" |info| {
///     property!(info, points);
///     property!(info, ratio);
/// });
///
/// let mut db = TypeInfoDatabase::new();
/// db.register::<Score>().unwrap();
/// db.seal().unwrap();
///
/// let score = Score { points: 3, ratio: 0.5 };
/// let serializer = ReflectSerializer::new(&db, &score, SerializeConfig::default());
/// let json = serde_json::to_string(&serializer).unwrap();
/// assert_eq!(json, r#"{"points":3,"ratio":0.5}"#);
/// ```
pub struct ReflectSerializer<'a> {
    db: &'a TypeInfoDatabase,
    value: &'a dyn Reflect,
    config: SerializeConfig,
}

impl<'a> ReflectSerializer<'a> {
    #[inline]
    pub fn new(db: &'a TypeInfoDatabase, value: &'a dyn Reflect, config: SerializeConfig) -> Self {
        Self { db, value, config }
    }
}

impl Serialize for ReflectSerializer<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        debug_assert!(self.db.is_sealed(), "serializing before the database is sealed");
        reset_types();

        let Some(object) = ObjectRef::new(self.db, self.value.as_any()) else {
            return Err(ser_error(format!(
                "`{}` is not registered in the database",
                self.value.reflect_type_name()
            )));
        };

        ObjectSerializer {
            object,
            db: self.db,
            config: self.config,
        }
        .serialize(serializer)
    }
}

// -----------------------------------------------------------------------------
// Objects

struct ObjectSerializer<'a> {
    object: ObjectRef<'a>,
    db: &'a TypeInfoDatabase,
    config: SerializeConfig,
}

impl Serialize for ObjectSerializer<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        push_type(self.object.info().name());
        let output = self.serialize_properties(serializer);
        pop_type();
        output
    }
}

impl ObjectSerializer<'_> {
    fn serialize_properties<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let policy = self.config.policy;
        let properties: Vec<_> = self
            .object
            .info()
            .properties_in_hierarchy(self.db)
            .map(|p| (p, p.property().serialization_state(policy)))
            .filter(|(_, state)| state.is_serializable)
            .collect();

        let with_metadata =
            |has_attributes: bool| self.config.serialize_metadata && has_attributes;
        let len = properties
            .iter()
            .map(|(_, state)| 1 + usize::from(with_metadata(state.has_attributes_to_serialize)))
            .sum();

        let mut state = serializer.serialize_map(Some(len))?;

        for (property, serialization) in &properties {
            let info = property.property();
            let Some(value) = self.object.field(property) else {
                return Err(ser_error(format!(
                    "property `{}` does not belong to `{}`",
                    info.name(),
                    self.object.info().name()
                )));
            };

            state.serialize_entry(
                info.name(),
                &ValueSerializer {
                    value,
                    meta_type: info.meta_type(),
                    handler: info.handler(),
                    db: self.db,
                    config: self.config,
                },
            )?;

            if with_metadata(serialization.has_attributes_to_serialize) {
                state.serialize_entry(
                    &format!("{}_metadata", info.name()),
                    &MetadataSerializer(info.metadata()),
                )?;
            }
        }

        state.end()
    }
}

// -----------------------------------------------------------------------------
// Values

struct ValueSerializer<'a> {
    value: &'a dyn Any,
    meta_type: MetaType,
    handler: DataStructureHandler,
    db: &'a TypeInfoDatabase,
    config: SerializeConfig,
}

fn scalar<T: Any + Copy, E: Error>(value: &dyn Any) -> Result<T, E> {
    value
        .downcast_ref::<T>()
        .copied()
        .ok_or_else(|| ser_error(format!("expected a `{}` value", type_name::<T>())))
}

impl Serialize for ValueSerializer<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let value = self.value;
        match self.meta_type {
            MetaType::Bool => serializer.serialize_bool(scalar::<_, S::Error>(value)?),
            MetaType::Char => serializer.serialize_i8(scalar::<_, S::Error>(value)?),
            MetaType::UChar => serializer.serialize_u8(scalar::<_, S::Error>(value)?),
            MetaType::Short => serializer.serialize_i16(scalar::<_, S::Error>(value)?),
            MetaType::UShort => serializer.serialize_u16(scalar::<_, S::Error>(value)?),
            MetaType::Int => serializer.serialize_i32(scalar::<_, S::Error>(value)?),
            MetaType::Uint => serializer.serialize_u32(scalar::<_, S::Error>(value)?),
            MetaType::Int64 => serializer.serialize_i64(scalar::<_, S::Error>(value)?),
            MetaType::Uint64 => serializer.serialize_u64(scalar::<_, S::Error>(value)?),
            MetaType::Float => serializer.serialize_f64(f64::from(scalar::<f32, S::Error>(value)?)),
            MetaType::Double => serializer.serialize_f64(scalar::<_, S::Error>(value)?),
            MetaType::Array => match self.handler.array_handler() {
                Some(array) => ArraySerializer { array, parent: self }.serialize(serializer),
                None => Err(ser_error("array property without an array handler")),
            },
            MetaType::Map => match self.handler.map_handler() {
                Some(map) => MapSerializer { map, parent: self }.serialize(serializer),
                None => Err(ser_error("map property without a map handler")),
            },
            MetaType::Enum => {
                let Some(handler) = self.handler.enum_handler() else {
                    return Err(ser_error("enum property without an enum handler"));
                };
                let text = handler.enum_to_string(value).map_err(ser_error::<S::Error>)?;
                serializer.serialize_str(&text)
            }
            MetaType::Object => {
                let Some(object) = ObjectRef::new(self.db, value) else {
                    return Err(ser_error("nested object is not registered in the database"));
                };
                ObjectSerializer {
                    object,
                    db: self.db,
                    config: self.config,
                }
                .serialize(serializer)
            }
            other @ (MetaType::Unknown | MetaType::Void | MetaType::Reference) => {
                Err(ser_error(format!("unmanaged meta type `{other}`")))
            }
        }
    }
}

impl<'a> ValueSerializer<'a> {
    #[inline]
    fn nested(&self, value: &'a dyn Any, meta_type: MetaType, handler: DataStructureHandler) -> Self {
        Self {
            value,
            meta_type,
            handler,
            db: self.db,
            config: self.config,
        }
    }
}

// -----------------------------------------------------------------------------
// Containers

struct ArraySerializer<'a> {
    array: &'static dyn ArrayHandler,
    parent: &'a ValueSerializer<'a>,
}

impl Serialize for ArraySerializer<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let array = self.array;
        let container = self.parent.value;

        // Elements of an unknown kind cannot be written.
        if array.element_type() == MetaType::Unknown {
            return serializer.serialize_seq(Some(0))?.end();
        }

        let len = array.size(container).map_err(ser_error::<S::Error>)?;
        let mut seq = serializer.serialize_seq(Some(len))?;
        for index in 0..len {
            let element = array.get(container, index).map_err(ser_error::<S::Error>)?;
            seq.serialize_element(&self.parent.nested(
                element,
                array.element_type(),
                array.element_handler(),
            ))?;
        }
        seq.end()
    }
}

struct MapSerializer<'a> {
    map: &'static dyn MapHandler,
    parent: &'a ValueSerializer<'a>,
}

impl Serialize for MapSerializer<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let map = self.map;
        let container = self.parent.value;

        let len = map.size(container).map_err(ser_error::<S::Error>)?;
        let mut state = serializer.serialize_map(Some(len))?;
        for (key, value) in map.iter(container).map_err(ser_error::<S::Error>)? {
            let key = map.key_to_string(key).map_err(ser_error::<S::Error>)?;
            state.serialize_entry(
                &key,
                &self
                    .parent
                    .nested(value, map.value_meta_type(), map.value_handler()),
            )?;
        }
        state.end()
    }
}

// -----------------------------------------------------------------------------
// Metadata

struct MetadataSerializer(Metadata);

impl Serialize for MetadataSerializer {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let attributes: Vec<&Attribute> = self
            .0
            .iter()
            .filter(|attribute| !attribute.is_policy_marker())
            .collect();

        let mut state = serializer.serialize_map(Some(attributes.len()))?;
        for attribute in attributes {
            state.serialize_entry(attribute.name(), &AttributeSerializer(attribute))?;
        }
        state.end()
    }
}

struct AttributeSerializer<'a>(&'a Attribute);

impl Serialize for AttributeSerializer<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0 {
            Attribute::IValueRange { min, max } => {
                let mut state = serializer.serialize_map(Some(2))?;
                state.serialize_entry("Min", min)?;
                state.serialize_entry("Max", max)?;
                state.end()
            }
            Attribute::FValueRange { min, max } => {
                let mut state = serializer.serialize_map(Some(2))?;
                state.serialize_entry("Min", min)?;
                state.serialize_entry("Max", max)?;
                state.end()
            }
            Attribute::DisplayName(name) => {
                let mut state = serializer.serialize_map(Some(1))?;
                state.serialize_entry("Name", name)?;
                state.end()
            }
            Attribute::Transient | Attribute::Serializable | Attribute::NotSerializable => {
                serializer.serialize_map(Some(0))?.end()
            }
        }
    }
}

// -----------------------------------------------------------------------------
// Tests
