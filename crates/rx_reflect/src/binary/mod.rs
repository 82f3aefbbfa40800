//! Compact binary encoding of registered objects.
//!
//! Everything is little-endian, headers are written field by field with
//! zero padding:
//!
//! ```text
//! object    id: u32, count: u32                      then `count` properties
//! property  meta: u8, [0; 3], offset: u32            then the value
//! array     element: u8, [0; 7], sizeof: u64, len: u64
//! map       key: u8, [0; 7], sizeof: u64, value: u8, [0; 7], sizeof: u64, len: u64
//! ```
//!
//! Scalars are their raw bytes (`bool` is one byte), enums the bytes of
//! their underlying integer, map entries a key followed by a value. An
//! array whose element tag is `Unknown` writes nothing, not even its header.
//!
//! Properties are identified by their offset inside the serialized type,
//! so data only reads back into a build with the same layout. The id in the
//! object header is the [`ReflectableId`](crate::info::ReflectableId); keep
//! ids stable across builds with the [id file](crate::registry).
//!
//! A nested object whose serialized type is not compatible with its property
//! keeps its value. Its records are skipped by walking the registered
//! description of the serialized id, so that id must be known.

// -----------------------------------------------------------------------------
// Modules

mod error;
mod reader;
mod writer;

// -----------------------------------------------------------------------------
// Exports

pub use error::BinaryError;
pub use reader::{deserialize_binary, deserialize_into};
pub use writer::serialize_binary;

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{BinaryError, deserialize_binary, deserialize_into, serialize_binary};
    use crate::info::MetaType;
    use crate::registry::TypeInfoDatabase;
    use crate::tests_support::*;
    use crate::{property, reflectable};
    use alloc::collections::BTreeMap;
    use alloc::vec;

    #[rustfmt::skip]
    const COMPOUND: &[u8] = &[
        1, 0, 0, 0,   2, 0, 0, 0,           // testcompound2, 2 properties
        3, 0, 0, 0,   0, 0, 0, 0,           // Int at 0
        0x39, 0x05, 0, 0,                   // 1337
        12, 0, 0, 0,  4, 0, 0, 0,           // Object at 4
        0, 0, 0, 0,   1, 0, 0, 0,           // Copyable, 1 property
        7, 0, 0, 0,   0, 0, 0, 0,           // Float at 0
        0, 0, 0x80, 0x40,                   // 4.0
    ];

    fn compound_db() -> TypeInfoDatabase {
        let mut db = TypeInfoDatabase::new();
        db.register::<Copyable>().unwrap();
        db.register::<TestCompound2>().unwrap();
        db.register::<Tata>().unwrap();
        db.seal().unwrap();
        db
    }

    #[test]
    fn golden_compound() {
        let db = compound_db();
        assert_eq!(serialize_binary(&db, &TestCompound2::default()).unwrap(), COMPOUND);

        let mut compound = TestCompound2 { leet: 0, ..Default::default() };
        compound.copyable.a_useless_prop = 0.0;
        deserialize_into(&db, COMPOUND, &mut compound).unwrap();
        assert_eq!(compound, TestCompound2::default());
    }

    #[test]
    fn round_trip() {
        let db = database();
        let mut d = D::default();
        d.base.base.base.atiti = true;
        d.base.base.bdouble = 1.0 / 3.0;
        d.base.ctoto = 17;
        d.base.a_vector = vec![5, 6, 7, 8];
        d.base.a_multi_array[3][4] = -34;
        d.base.ultra.mega.toto[2].titi[4] = 24;
        d.a_map.insert(1, true);
        d.a_bool_map.insert(3, false);
        d.a_fat_map.insert(-1, TestCompound2 { leet: 3, ..Default::default() });
        d.a_map_in_map.insert(2, BTreeMap::from([(false, 20)]));
        d.a_struct.a_super_map.insert(9, SuperCompound { titi: [9; 5] });

        let bytes = serialize_binary(&db, &d).unwrap();
        let copy = deserialize_binary::<D>(&db, &bytes).unwrap();
        assert_eq!(*copy, d);

        let mut e = EnumTestType::default();
        e.a_test_face = Faces::Queen;
        e.worst_kings = [Kings::Charles, Kings::Cesar];
        e.playable_kings = vec![Kings::Alexandre];
        e.allowed_queens.insert(Queens::Argine, false);
        e.points_per_jack.insert(-5, Jacks::Lahire | Jacks::Hector);

        let bytes = serialize_binary(&db, &e).unwrap();
        assert_eq!(*deserialize_binary::<EnumTestType>(&db, &bytes).unwrap(), e);
    }

    #[test]
    fn every_property_is_written() {
        let db = database();
        let mut metadatas = Metadatas::default();
        metadatas.should_be_ignored = 8.0;

        let bytes = serialize_binary(&db, &metadatas).unwrap();
        let copy = deserialize_binary::<Metadatas>(&db, &bytes).unwrap();
        assert_eq!(copy.should_be_ignored, 8.0);
    }

    #[test]
    fn hierarchy_compatibility() {
        let db = database();
        let mut a = A::default();
        a.atoto = 6.5;
        let bytes = serialize_binary(&db, &a).unwrap();

        // An ancestor's data fills the matching part of a descendant.
        let mut c = C::default();
        deserialize_into(&db, &bytes, &mut c).unwrap();
        assert_eq!(c.base.base.atoto, 6.5);
        assert_eq!(c.ctoto, 0xDEAD_BEEF);

        let c_bytes = serialize_binary(&db, &c).unwrap();
        assert_eq!(
            deserialize_into(&db, &c_bytes, &mut a),
            Err(BinaryError::Incompatible)
        );
        assert_eq!(
            deserialize_into(&db, &bytes, &mut SuperCompound::default()),
            Err(BinaryError::Incompatible)
        );

        let mut unknown = bytes.clone();
        unknown[..4].copy_from_slice(&999u32.to_le_bytes());
        assert_eq!(
            deserialize_into(&db, &unknown, &mut a),
            Err(BinaryError::Incompatible)
        );
    }

    #[test]
    fn unmatched_offsets_are_skipped() {
        let db = database();
        let mut nested = Nested2::default();
        nested.useless = false;
        nested.pouet[9] = 9;
        let bytes = serialize_binary(&db, &nested).unwrap();

        let mut derived = Nested3::default();
        derived.allo = false;
        deserialize_into(&db, &bytes, &mut derived).unwrap();
        assert!(!derived.base.useless);
        assert_eq!(derived.base.pouet[9], 9);
        assert!(!derived.allo);
    }

    #[test]
    fn malformed_input() {
        let db = compound_db();
        let mut compound = TestCompound2::default();

        assert_eq!(deserialize_into(&db, &[], &mut compound), Err(BinaryError::Empty));
        assert_eq!(
            deserialize_into(&db, &COMPOUND[..COMPOUND.len() - 2], &mut compound),
            Err(BinaryError::UnexpectedEnd { offset: COMPOUND.len() - 4 })
        );
        assert_eq!(
            deserialize_into(&db, &COMPOUND[..6], &mut compound),
            Err(BinaryError::UnexpectedEnd { offset: 4 })
        );

        // An empty object is not an error and changes nothing.
        deserialize_into(&db, &[1, 0, 0, 0, 0, 0, 0, 0], &mut compound).unwrap();
        assert_eq!(compound, TestCompound2::default());

        let mut wrong_tag = COMPOUND.to_vec();
        wrong_tag[8] = MetaType::Uint.as_u8();
        assert!(matches!(
            deserialize_into(&db, &wrong_tag, &mut compound),
            Err(BinaryError::LayoutMismatch { .. })
        ));

        wrong_tag[8] = 200;
        assert_eq!(
            deserialize_into(&db, &wrong_tag, &mut compound),
            Err(BinaryError::InvalidMetaType { offset: 8, byte: 200 })
        );
    }

    /// The properties of `TestCompound2` under another name.
    #[repr(C)]
    #[derive(Clone, Default)]
    struct LeetTwin {
        leet: i32,
        copyable: Copyable,
    }

    reflectable!(LeetTwin => "LeetTwin" |info| {
        property!(info, leet);
        property!(info, copyable);
        info.default_instantiator();
    });

    fn mega_db() -> TypeInfoDatabase {
        let mut db = TypeInfoDatabase::new();
        db.register::<Copyable>().unwrap();
        db.register::<TestCompound2>().unwrap();
        db.register::<SuperCompound>().unwrap();
        db.register::<MegaCompound>().unwrap();
        db.register::<LeetTwin>().unwrap();
        db.register::<Tata>().unwrap();
        db.seal().unwrap();
        db
    }

    #[test]
    fn incompatible_nested_object() {
        let db = mega_db();
        let mut mega = MegaCompound::default();
        mega.compint = 99;
        mega.compleet.leet = 5;
        mega.toto[0].titi = [1, 2, 3, 4, 5];
        mega.toto[2].titi = [9; 5];
        let bytes = serialize_binary(&db, &mega).unwrap();

        // Object header, `compint`, then the property header of `compleet`.
        let compleet_id = db.id_of::<TestCompound2>().unwrap();
        assert_eq!(bytes[28..32], compleet_id.to_le_bytes());

        // The nested records are skipped and the following properties still read.
        let mut twin = bytes.clone();
        twin[28..32].copy_from_slice(&db.id_of::<LeetTwin>().unwrap().to_le_bytes());
        let mut copy = MegaCompound::default();
        deserialize_into(&db, &twin, &mut copy).unwrap();
        assert_eq!(copy.compint, 99);
        assert_eq!(copy.compleet, TestCompound2::default());
        assert_eq!(copy.toto, mega.toto);

        // Records that do not fit the serialized type cannot be skipped.
        let mut tata = bytes.clone();
        tata[28..32].copy_from_slice(&db.id_of::<Tata>().unwrap().to_le_bytes());
        assert!(matches!(
            deserialize_into(&db, &tata, &mut MegaCompound::default()),
            Err(BinaryError::LayoutMismatch { .. })
        ));

        let mut unknown = bytes;
        unknown[28..32].copy_from_slice(&999u32.to_le_bytes());
        assert_eq!(
            deserialize_into(&db, &unknown, &mut MegaCompound::default()),
            Err(BinaryError::Incompatible)
        );
    }

    #[test]
    fn leftover_records() {
        let db = compound_db();
        let mut bytes = COMPOUND.to_vec();
        // Claims a third property after the last one.
        bytes[4] = 3;
        bytes.extend_from_slice(&[3, 0, 0, 0, 8, 0, 0, 0, 1, 0, 0, 0]);
        assert!(matches!(
            deserialize_into(&db, &bytes, &mut TestCompound2::default()),
            Err(BinaryError::LayoutMismatch { .. })
        ));
    }

    #[test]
    fn unregistered_values() {
        let mut db = TypeInfoDatabase::new();
        db.seal().unwrap();
        assert_eq!(
            serialize_binary(&db, &Copyable::default()),
            Err(BinaryError::NotReflectable)
        );
        assert!(matches!(
            deserialize_binary::<Copyable>(&db, COMPOUND),
            Err(BinaryError::Instantiate { .. })
        ));
    }
}
