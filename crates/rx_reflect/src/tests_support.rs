//! Reflectable fixtures shared by the unit tests.

use alloc::collections::BTreeMap;
use alloc::vec;
use alloc::vec::Vec;

use rx_utils::hash::HashMap;

use crate::info::Attribute;
use crate::registry::TypeInfoDatabase;
use crate::{bitmask_enum, parent, property, reflectable, sequential_enum};

// -----------------------------------------------------------------------------
// Nested namespace

#[repr(C)]
#[derive(Debug, Clone, PartialEq)]
pub struct Nested {
    pub useless: bool,
}

impl Default for Nested {
    fn default() -> Self {
        Self { useless: true }
    }
}

reflectable!(Nested => "testNS::Nested" |info| {
    property!(info, useless);
    info.default_instantiator();
});

#[repr(C)]
#[derive(Debug, Clone, PartialEq)]
pub struct Nested2 {
    pub useless: bool,
    pub pouet: [i8; 10],
}

impl Default for Nested2 {
    fn default() -> Self {
        Self {
            useless: true,
            pouet: [0; 10],
        }
    }
}

reflectable!(Nested2 => "testNS::Nested2" |info| {
    property!(info, useless);
    property!(info, pouet);
    info.default_instantiator();
});

#[repr(C)]
#[derive(Debug, Clone, PartialEq)]
pub struct Nested3 {
    pub base: Nested2,
    pub allo: bool,
}

impl Default for Nested3 {
    fn default() -> Self {
        Self {
            base: Nested2::default(),
            allo: true,
        }
    }
}

reflectable!(Nested3 => "testNS::Nested3" |info| {
    parent!(info, base);
    property!(info, allo);
    info.default_instantiator();
});

// -----------------------------------------------------------------------------
// Compounds

#[repr(C)]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SuperCompound {
    pub titi: [i32; 5],
}

reflectable!(SuperCompound => "SuperCompound" |info| {
    property!(info, titi);
    info.default_instantiator();
});

#[repr(C)]
#[derive(Debug, Clone, PartialEq)]
pub struct Copyable {
    pub a_useless_prop: f32,
}

impl Default for Copyable {
    fn default() -> Self {
        Self { a_useless_prop: 4.0 }
    }
}

reflectable!(Copyable => "Copyable" |info| {
    property!(info, a_useless_prop as "aUselessProp");
    info.default_instantiator();
});

#[repr(C)]
#[derive(Debug, Clone, PartialEq)]
pub struct TestCompound2 {
    pub leet: i32,
    pub copyable: Copyable,
}

impl Default for TestCompound2 {
    fn default() -> Self {
        Self {
            leet: 1337,
            copyable: Copyable::default(),
        }
    }
}

reflectable!(TestCompound2 => "testcompound2" |info| {
    property!(info, leet);
    property!(info, copyable);
    info.default_instantiator();
});

#[repr(C)]
#[derive(Debug, Clone, PartialEq)]
pub struct TestCompound {
    pub compint: i32,
    pub compleet: TestCompound2,
}

impl Default for TestCompound {
    fn default() -> Self {
        Self {
            compint: 0x2a2a,
            compleet: TestCompound2::default(),
        }
    }
}

reflectable!(TestCompound => "testcompound" |info| {
    property!(info, compint);
    property!(info, compleet);
    info.default_instantiator();
});

#[repr(C)]
#[derive(Debug, Clone, PartialEq)]
pub struct MegaCompound {
    pub compint: i32,
    pub compleet: TestCompound2,
    pub toto: [SuperCompound; 3],
}

impl Default for MegaCompound {
    fn default() -> Self {
        Self {
            compint: 0x2a2a,
            compleet: TestCompound2::default(),
            toto: Default::default(),
        }
    }
}

reflectable!(MegaCompound => "MegaCompound" |info| {
    property!(info, compint);
    property!(info, compleet);
    property!(info, toto);
    info.default_instantiator();
});

#[repr(C)]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UltraCompound {
    pub mega: MegaCompound,
}

reflectable!(UltraCompound => "UltraCompound" |info| {
    property!(info, mega);
    info.default_instantiator();
});

// -----------------------------------------------------------------------------
// Hierarchy

#[repr(C)]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct A {
    pub atiti: bool,
    pub atoto: f32,
}

impl A {
    fn test(&mut self) -> i32 {
        42
    }
}

reflectable!(A => "a" |info| {
    property!(info, atiti);
    property!(info, atoto);
    info.function("test", A::test);
    info.default_instantiator();
});

#[repr(C)]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct B {
    pub base: A,
    pub bdouble: f64,
    pub compvar: TestCompound,
}

impl B {
    fn roger(&mut self) {}
}

reflectable!(B => "b" |info| {
    parent!(info, base);
    property!(info, bdouble);
    property!(info, compvar);
    info.function("Roger", B::roger);
    info.default_instantiator();
});

#[repr(C)]
#[derive(Debug, Clone, PartialEq)]
pub struct C {
    pub base: B,
    pub ctoto: u32,
    pub a_vector: Vec<i32>,
    pub an_array: [i32; 10],
    pub a_multi_array: [[i32; 10]; 10],
    pub mega: MegaCompound,
    pub ultra: UltraCompound,
}

impl Default for C {
    fn default() -> Self {
        Self {
            base: B::default(),
            ctoto: 0xDEAD_BEEF,
            a_vector: vec![1, 2, 3],
            an_array: [0; 10],
            a_multi_array: [[0; 10]; 10],
            mega: MegaCompound::default(),
            ultra: UltraCompound::default(),
        }
    }
}

reflectable!(C => "c" |info| {
    parent!(info, base);
    property!(info, ctoto);
    property!(info, a_vector as "aVector");
    property!(info, an_array as "anArray");
    property!(info, a_multi_array as "aMultiArray");
    property!(info, mega);
    property!(info, ultra);
    info.default_instantiator();
    info.instantiator::<(i32, bool)>(|_| C::default());
});

// -----------------------------------------------------------------------------
// Maps

#[repr(C)]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MapType {
    pub a_even_odd_map: BTreeMap<i32, bool>,
}

reflectable!(MapType => "mapType" |info| {
    property!(info, a_even_odd_map as "aEvenOddMap");
    info.default_instantiator();
});

#[repr(C)]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MapCompound {
    pub a_bool_map: BTreeMap<i32, bool>,
    pub a_super_map: BTreeMap<i32, SuperCompound>,
}

reflectable!(MapCompound => "MapCompound" |info| {
    property!(info, a_bool_map as "aBoolMap");
    property!(info, a_super_map as "aSuperMap");
    info.default_instantiator();
});

#[repr(C)]
#[derive(Debug, Clone, PartialEq)]
pub struct D {
    pub base: C,
    pub a_map: BTreeMap<i32, bool>,
    pub xp: i32,
    pub a_bool_map: HashMap<i32, bool>,
    pub a_fat_map: BTreeMap<i32, TestCompound2>,
    pub a_map_in_map: BTreeMap<i32, BTreeMap<bool, i32>>,
    pub a_struct: MapCompound,
}

impl Default for D {
    fn default() -> Self {
        Self {
            base: C::default(),
            a_map: BTreeMap::new(),
            xp: 42,
            a_bool_map: HashMap::default(),
            a_fat_map: BTreeMap::new(),
            a_map_in_map: BTreeMap::new(),
            a_struct: MapCompound::default(),
        }
    }
}

reflectable!(D => "d" |info| {
    parent!(info, base);
    property!(info, a_map as "aMap");
    property!(info, xp);
    property!(info, a_bool_map as "aBoolMap");
    property!(info, a_fat_map as "aFatMap");
    property!(info, a_map_in_map as "aMapInMap");
    property!(info, a_struct as "aStruct");
    info.default_instantiator();
});

// -----------------------------------------------------------------------------
// Enums

sequential_enum! {
    pub enum Kings: i32 { Philippe, Alexandre, Cesar, Charles }
}

sequential_enum! {
    pub enum Faces: u8 { Jack, Queen, King }
}

bitmask_enum! {
    pub struct BitEnum: i32 { one, two, four, eight }
}

bitmask_enum! {
    pub struct Jacks: i16 { Ogier, Lahire, Hector, Lancelot }
}

bitmask_enum! {
    pub struct Queens: i16 { Judith, Rachel, Pallas, Argine }
}

#[repr(C)]
#[derive(Debug, Clone, PartialEq)]
pub struct EnumTestType {
    pub a_test_face: Faces,
    pub best_king: Kings,
    pub worst_kings: [Kings; 2],
    pub playable_kings: Vec<Kings>,
    pub allowed_queens: BTreeMap<Queens, bool>,
    pub points_per_jack: BTreeMap<i32, Jacks>,
}

impl Default for EnumTestType {
    fn default() -> Self {
        Self {
            a_test_face: Faces::Jack,
            best_king: Kings::Alexandre,
            worst_kings: [Kings::Philippe; 2],
            playable_kings: Vec::new(),
            allowed_queens: BTreeMap::new(),
            points_per_jack: BTreeMap::new(),
        }
    }
}

reflectable!(EnumTestType => "enumTestType" |info| {
    property!(info, a_test_face as "aTestFace");
    property!(info, best_king as "bestKing");
    property!(info, worst_kings as "worstKings");
    property!(info, playable_kings as "playableKings");
    property!(info, allowed_queens as "allowedQueens");
    property!(info, points_per_jack as "pointsPerJack");
    info.default_instantiator();
});

// -----------------------------------------------------------------------------
// Metadata

#[repr(C)]
#[derive(Debug, Clone, PartialEq)]
pub struct Metadatas {
    pub a_map: BTreeMap<i32, bool>,
    pub xp: i32,
    pub is_transient: bool,
    pub should_be_ignored: f32,
    pub should_never_be_ignored: EnumTestType,
    pub multi_metadata: i32,
    pub ranged_float: f32,
    pub custom_name: i32,
}

impl Default for Metadatas {
    fn default() -> Self {
        Self {
            a_map: BTreeMap::new(),
            xp: 42,
            is_transient: true,
            should_be_ignored: 4.0,
            should_never_be_ignored: EnumTestType::default(),
            multi_metadata: 0,
            ranged_float: 0.0,
            custom_name: 0,
        }
    }
}

reflectable!(Metadatas => "metadatas" |info| {
    property!(info, a_map as "aMap");
    property!(info, xp, meta = &[Attribute::IValueRange { min: 1, max: 10 }]);
    property!(info, is_transient as "isTransient", meta = &[Attribute::Transient]);
    property!(info, should_be_ignored as "shouldBeIgnored", meta = &[Attribute::NotSerializable]);
    property!(
        info,
        should_never_be_ignored as "shouldNeverBeIgnored",
        meta = &[Attribute::Serializable]
    );
    property!(
        info,
        multi_metadata as "multiMetadata",
        meta = &[Attribute::IValueRange { min: 1, max: 10 }, Attribute::Transient]
    );
    property!(
        info,
        ranged_float as "rangedFloat",
        meta = &[Attribute::FValueRange { min: 0.0, max: 1.0 }]
    );
    property!(info, custom_name as "customName", meta = &[Attribute::DisplayName("MyString")]);
    info.default_instantiator();
});

// -----------------------------------------------------------------------------
// Instantiation

#[repr(C)]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DefaultInstantiated {
    pub value: i32,
}

reflectable!(DefaultInstantiated => "DefaultInstantiated" |info| {
    property!(info, value);
    info.default_instantiator();
});

#[repr(C)]
#[derive(Debug, Clone, PartialEq)]
pub struct CustomInstantiated {
    pub config: i32,
}

reflectable!(CustomInstantiated => "CustomInstantiated" |info| {
    property!(info, config);
    info.instantiator::<i32>(|config| CustomInstantiated { config: *config });
});

// -----------------------------------------------------------------------------
// Id file

macro_rules! empty_reflectables {
    ($($ty:ident => $name:literal),* $(,)?) => {$(
        #[derive(Debug, Clone, PartialEq, Default)]
        pub struct $ty;

        reflectable!($ty => $name |info| {
            info.default_instantiator();
        });
    )*};
}

empty_reflectables! {
    Tata => "tata",
    Tete => "tete",
    Titi => "titi",
    Toto => "toto",
    Tutu => "tutu",
}

// -----------------------------------------------------------------------------
// Database

/// A sealed database holding every fixture above except the id-file ones.
pub fn database() -> TypeInfoDatabase {
    let mut db = TypeInfoDatabase::new();
    db.register::<Nested>().unwrap();
    db.register::<Nested2>().unwrap();
    db.register::<Nested3>().unwrap();
    db.register::<SuperCompound>().unwrap();
    db.register::<Copyable>().unwrap();
    db.register::<TestCompound2>().unwrap();
    db.register::<TestCompound>().unwrap();
    db.register::<MegaCompound>().unwrap();
    db.register::<UltraCompound>().unwrap();
    db.register::<A>().unwrap();
    db.register::<B>().unwrap();
    db.register::<C>().unwrap();
    db.register::<MapType>().unwrap();
    db.register::<MapCompound>().unwrap();
    db.register::<D>().unwrap();
    db.register::<EnumTestType>().unwrap();
    db.register::<Metadatas>().unwrap();
    db.register::<DefaultInstantiated>().unwrap();
    db.register::<CustomInstantiated>().unwrap();
    db.seal().unwrap();
    db
}
