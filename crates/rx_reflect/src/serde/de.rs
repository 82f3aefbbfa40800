use alloc::format;
use alloc::string::String;
use core::any::{Any, type_name};
use core::fmt::{self, Formatter};

use serde_core::de::{DeserializeSeed, Error, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde_core::{Deserialize, Deserializer};

use super::SerializeConfig;
use super::error_utils::{de_error, pop_type, push_type, reset_types};
use crate::Reflect;
use crate::access::ObjectMut;
use crate::info::MetaType;
use crate::ops::{ArrayHandler, DataStructureHandler, HandlerError, MapHandler};
use crate::registry::TypeInfoDatabase;

// -----------------------------------------------------------------------------
// ReflectDeserializer

/// Fills an existing registered object from a map of its properties.
///
/// Keys are looked up with
/// [`find_property_in_hierarchy`](crate::info::TypeInfo::find_property_in_hierarchy).
/// Unknown keys, `"<name>_metadata"` entries and properties excluded by the
/// [policy](SerializeConfig::policy) are skipped. Properties missing from the
/// input keep their value.
///
/// Containers present in the input are emptied first: dynamic arrays and maps
/// are cleared, fixed arrays have every slot reset. Integers must fit the
/// declared width, and a value of the wrong kind is an error.
pub struct ReflectDeserializer<'a> {
    db: &'a TypeInfoDatabase,
    target: &'a mut dyn Reflect,
    config: SerializeConfig,
}

impl<'a> ReflectDeserializer<'a> {
    #[inline]
    pub fn new(
        db: &'a TypeInfoDatabase,
        target: &'a mut dyn Reflect,
        config: SerializeConfig,
    ) -> Self {
        Self { db, target, config }
    }
}

impl<'de> DeserializeSeed<'de> for ReflectDeserializer<'_> {
    type Value = ();

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<(), D::Error> {
        debug_assert!(self.db.is_sealed(), "deserializing before the database is sealed");
        reset_types();

        let name = self.target.reflect_type_name();
        let Some(object) = ObjectMut::new(self.db, self.target.as_any_mut()) else {
            return Err(de_error(format!("`{name}` is not registered in the database")));
        };

        deserializer.deserialize_map(ObjectVisitor {
            object,
            db: self.db,
            config: self.config,
        })
    }
}

// -----------------------------------------------------------------------------
// Objects

struct ObjectVisitor<'a> {
    object: ObjectMut<'a>,
    db: &'a TypeInfoDatabase,
    config: SerializeConfig,
}

impl<'de> Visitor<'de> for ObjectVisitor<'_> {
    type Value = ();

    fn expecting(&self, formatter: &mut Formatter) -> fmt::Result {
        write!(formatter, "a `{}` object", self.object.info().name())
    }

    fn visit_map<A: MapAccess<'de>>(mut self, mut map: A) -> Result<(), A::Error> {
        push_type(self.object.info().name());
        let output = self.fill(&mut map);
        pop_type();
        output
    }
}

impl ObjectVisitor<'_> {
    fn fill<'de, A: MapAccess<'de>>(&mut self, map: &mut A) -> Result<(), A::Error> {
        let info = self.object.info();

        while let Some(key) = map.next_key::<String>()? {
            let Some(property) = info.find_property_in_hierarchy(self.db, &key) else {
                map.next_value::<IgnoredAny>()?;
                continue;
            };

            let declared = property.property();
            if !declared.serialization_state(self.config.policy).is_serializable {
                map.next_value::<IgnoredAny>()?;
                continue;
            }

            let Some(target) = self.object.field_mut(&property) else {
                return Err(de_error(format!(
                    "property `{key}` does not belong to `{}`",
                    info.name()
                )));
            };

            map.next_value_seed(ValueSeed {
                target,
                meta_type: declared.meta_type(),
                handler: declared.handler(),
                db: self.db,
                config: self.config,
            })?;
        }

        Ok(())
    }
}

// -----------------------------------------------------------------------------
// Values

struct ValueSeed<'a> {
    target: &'a mut dyn Any,
    meta_type: MetaType,
    handler: DataStructureHandler,
    db: &'a TypeInfoDatabase,
    config: SerializeConfig,
}

fn store<T: Any, E: Error>(target: &mut dyn Any, value: T) -> Result<(), E> {
    let Some(slot) = target.downcast_mut::<T>() else {
        return Err(de_error(format!("expected a `{}` value", type_name::<T>())));
    };
    *slot = value;
    Ok(())
}

impl<'de> DeserializeSeed<'de> for ValueSeed<'_> {
    type Value = ();

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<(), D::Error> {
        let target = self.target;
        match self.meta_type {
            MetaType::Bool => store::<_, D::Error>(target, bool::deserialize(deserializer)?),
            MetaType::Char => store::<_, D::Error>(target, i8::deserialize(deserializer)?),
            MetaType::UChar => store::<_, D::Error>(target, u8::deserialize(deserializer)?),
            MetaType::Short => store::<_, D::Error>(target, i16::deserialize(deserializer)?),
            MetaType::UShort => store::<_, D::Error>(target, u16::deserialize(deserializer)?),
            MetaType::Int => store::<_, D::Error>(target, i32::deserialize(deserializer)?),
            MetaType::Uint => store::<_, D::Error>(target, u32::deserialize(deserializer)?),
            MetaType::Int64 => store::<_, D::Error>(target, i64::deserialize(deserializer)?),
            MetaType::Uint64 => store::<_, D::Error>(target, u64::deserialize(deserializer)?),
            MetaType::Float => store::<_, D::Error>(target, f32::deserialize(deserializer)?),
            MetaType::Double => store::<_, D::Error>(target, f64::deserialize(deserializer)?),
            MetaType::Array => {
                let Some(array) = self.handler.array_handler() else {
                    return Err(de_error("array property without an array handler"));
                };
                deserializer.deserialize_seq(ArrayVisitor {
                    target,
                    array,
                    db: self.db,
                    config: self.config,
                })
            }
            MetaType::Map => {
                let Some(map) = self.handler.map_handler() else {
                    return Err(de_error("map property without a map handler"));
                };
                deserializer.deserialize_map(MapVisitor {
                    target,
                    map,
                    db: self.db,
                    config: self.config,
                })
            }
            MetaType::Enum => {
                let Some(handler) = self.handler.enum_handler() else {
                    return Err(de_error("enum property without an enum handler"));
                };
                let text = String::deserialize(deserializer)?;
                handler
                    .set_from_string(target, &text)
                    .map_err(de_error::<D::Error>)
            }
            MetaType::Object => {
                let Some(object) = ObjectMut::new(self.db, target) else {
                    return Err(de_error("nested object is not registered in the database"));
                };
                deserializer.deserialize_map(ObjectVisitor {
                    object,
                    db: self.db,
                    config: self.config,
                })
            }
            other @ (MetaType::Unknown | MetaType::Void | MetaType::Reference) => {
                Err(de_error(format!("unmanaged meta type `{other}`")))
            }
        }
    }
}

// -----------------------------------------------------------------------------
// Containers

struct ArrayVisitor<'a> {
    target: &'a mut dyn Any,
    array: &'static dyn ArrayHandler,
    db: &'a TypeInfoDatabase,
    config: SerializeConfig,
}

impl<'de> Visitor<'de> for ArrayVisitor<'_> {
    type Value = ();

    fn expecting(&self, formatter: &mut Formatter) -> fmt::Result {
        formatter.write_str("reflected array value")
    }

    fn visit_seq<V: SeqAccess<'de>>(self, mut seq: V) -> Result<(), V::Error> {
        let Self { target, array, db, config } = self;
        let fixed = array.is_fixed_size();

        array.clear(&mut *target).map_err(de_error::<V::Error>)?;
        let len = array.size(&*target).map_err(de_error::<V::Error>)?;

        let mut index = 0;
        loop {
            if fixed && index == len {
                if seq.next_element::<IgnoredAny>()?.is_some() {
                    return Err(de_error(HandlerError::OutOfBounds { index, len }));
                }
                break;
            }

            let slot = array.read(&mut *target, index).map_err(de_error::<V::Error>)?;
            let seed = ValueSeed {
                target: slot,
                meta_type: array.element_type(),
                handler: array.element_handler(),
                db,
                config,
            };

            if seq.next_element_seed(seed)?.is_none() {
                // Reading grew the array by one slot the input does not fill.
                if !fixed {
                    array.erase(&mut *target, index).map_err(de_error::<V::Error>)?;
                }
                break;
            }
            index += 1;
        }

        Ok(())
    }
}

struct MapVisitor<'a> {
    target: &'a mut dyn Any,
    map: &'static dyn MapHandler,
    db: &'a TypeInfoDatabase,
    config: SerializeConfig,
}

impl<'de> Visitor<'de> for MapVisitor<'_> {
    type Value = ();

    fn expecting(&self, formatter: &mut Formatter) -> fmt::Result {
        formatter.write_str("reflected map value")
    }

    fn visit_map<V: MapAccess<'de>>(self, mut access: V) -> Result<(), V::Error> {
        let Self { target, map, db, config } = self;

        map.clear(&mut *target).map_err(de_error::<V::Error>)?;

        while let Some(key) = access.next_key::<String>()? {
            let slot = map
                .create(&mut *target, &key, None)
                .map_err(de_error::<V::Error>)?;
            access.next_value_seed(ValueSeed {
                target: slot,
                meta_type: map.value_meta_type(),
                handler: map.value_handler(),
                db,
                config,
            })?;
        }

        Ok(())
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::ReflectDeserializer;
    use crate::info::SerializationPolicy;
    use crate::registry::TypeInfoDatabase;
    use crate::serde::{ReflectSerializer, SerializeConfig};
    use crate::tests_support::*;
    use crate::Reflect;
    use alloc::collections::BTreeMap;
    use alloc::string::{String, ToString};
    use alloc::vec;
    use serde_core::de::DeserializeSeed;

    fn fill(db: &TypeInfoDatabase, target: &mut dyn Reflect, json: &str) -> Result<(), String> {
        fill_with(db, target, json, SerializeConfig::default())
    }

    fn fill_with(
        db: &TypeInfoDatabase,
        target: &mut dyn Reflect,
        json: &str,
        config: SerializeConfig,
    ) -> Result<(), String> {
        let mut de = serde_json::Deserializer::from_str(json);
        ReflectDeserializer::new(db, target, config)
            .deserialize(&mut de)
            .map_err(|err| err.to_string())
    }

    #[test]
    fn round_trip() {
        let db = database();
        let mut d = D::default();
        d.base.base.base.atiti = true;
        d.base.base.base.atoto = 0.25;
        d.base.base.bdouble = -3.5;
        d.base.base.compvar.compleet.copyable.a_useless_prop = 8.5;
        d.base.a_vector = vec![9, 8];
        d.base.an_array[3] = -4;
        d.base.a_multi_array[5][6] = 56;
        d.base.mega.toto[1].titi[2] = 12;
        d.a_map.insert(1, true);
        d.a_bool_map.insert(-7, false);
        d.a_fat_map.insert(3, TestCompound2 { leet: 5, ..Default::default() });
        d.a_map_in_map.insert(4, BTreeMap::from([(true, 1), (false, 0)]));
        d.a_struct.a_super_map.insert(2, SuperCompound { titi: [1, 2, 3, 4, 5] });
        d.xp = 99;

        let json = serde_json::to_string(&ReflectSerializer::new(
            &db,
            &d,
            SerializeConfig::default(),
        ))
        .unwrap();

        let mut copy = D::default();
        fill(&db, &mut copy, &json).unwrap();
        assert_eq!(copy, d);
    }

    #[test]
    fn enum_round_trip() {
        let db = database();
        let mut e = EnumTestType::default();
        e.a_test_face = Faces::King;
        e.best_king = Kings::Charles;
        e.worst_kings = [Kings::Cesar, Kings::Alexandre];
        e.playable_kings = vec![Kings::Philippe, Kings::Cesar];
        e.allowed_queens.insert(Queens::Rachel | Queens::Argine, true);
        e.points_per_jack.insert(1, Jacks::Ogier | Jacks::Lancelot);

        let json = serde_json::to_string(&ReflectSerializer::new(
            &db,
            &e,
            SerializeConfig::default(),
        ))
        .unwrap();

        let mut copy = EnumTestType::default();
        fill(&db, &mut copy, &json).unwrap();
        assert_eq!(copy, e);

        assert!(fill(&db, &mut copy, r#"{"bestKing":"Louis"}"#).is_err());
        assert!(fill(&db, &mut copy, r#"{"bestKing":2}"#).is_err());
    }

    #[test]
    fn skipped_keys() {
        let db = database();
        let mut compound = TestCompound2::default();
        fill(
            &db,
            &mut compound,
            r#"{"leet":5,"unknown":[1,{"a":2}],"copyable_metadata":{"Transient":{}}}"#,
        )
        .unwrap();
        assert_eq!(compound.leet, 5);
        assert_eq!(compound.copyable.a_useless_prop, 4.0);

        let mut metadatas = Metadatas::default();
        fill(&db, &mut metadatas, r#"{"shouldBeIgnored":1.0,"xp":3}"#).unwrap();
        assert_eq!(metadatas.should_be_ignored, 4.0);
        assert_eq!(metadatas.xp, 3);

        let opt_in = SerializeConfig::default().with_policy(SerializationPolicy::OptIn);
        fill_with(&db, &mut metadatas, r#"{"xp":7}"#, opt_in).unwrap();
        assert_eq!(metadatas.xp, 3);
    }

    #[test]
    fn numbers_are_checked() {
        let db = database();
        let mut compound = TestCompound2::default();

        fill(&db, &mut compound, r#"{"copyable":{"aUselessProp":2}}"#).unwrap();
        assert_eq!(compound.copyable.a_useless_prop, 2.0);

        assert!(fill(&db, &mut compound, r#"{"leet":3000000000}"#).is_err());
        assert!(fill(&db, &mut compound, r#"{"leet":1.5}"#).is_err());
        assert!(fill(&db, &mut compound, r#"{"leet":"12"}"#).is_err());
        assert!(fill(&db, &mut compound, r#"{"copyable":5}"#).is_err());

        let mut nested = Nested2::default();
        assert!(fill(&db, &mut nested, r#"{"pouet":[1,2,300]}"#).is_err());
    }

    #[test]
    fn containers_are_replaced() {
        let db = database();
        let mut d = D::default();
        d.a_map.insert(1, true);
        d.base.an_array = [9; 10];

        fill(&db, &mut d, r#"{"aVector":[7],"aMap":{"5":false},"anArray":[1,2]}"#).unwrap();
        assert_eq!(d.base.a_vector, [7]);
        assert_eq!(d.a_map, BTreeMap::from([(5, false)]));
        assert_eq!(d.base.an_array, [1, 2, 0, 0, 0, 0, 0, 0, 0, 0]);

        fill(&db, &mut d, r#"{"aVector":[]}"#).unwrap();
        assert!(d.base.a_vector.is_empty());

        let err = fill(&db, &mut d, r#"{"anArray":[1,2,3,4,5,6,7,8,9,10,11]}"#).unwrap_err();
        assert!(err.contains("out of range"), "{err}");

        fill(&db, &mut d, r#"{"anArray":[1,2,3,4,5,6,7,8,9,10]}"#).unwrap();
        assert_eq!(d.base.an_array[9], 10);

        assert!(fill(&db, &mut d, r#"{"aMap":{"x":true}}"#).is_err());
        assert!(fill(&db, &mut d, r#"{"aMap":[1]}"#).is_err());
    }

    #[test]
    fn unregistered_target() {
        let mut db = TypeInfoDatabase::new();
        db.seal().unwrap();
        let err = fill(&db, &mut Copyable::default(), "{}").unwrap_err();
        assert!(err.contains("is not registered"), "{err}");
    }
}
