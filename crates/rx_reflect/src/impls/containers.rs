use alloc::collections::BTreeMap;
use alloc::vec::Vec;
use core::hash::{BuildHasher, Hash};

use crate::Reflected;
use crate::info::MetaType;
use crate::ops::{DataStructureHandler, MapHandlerImpl, MapKey, StaticArrayHandler, VecHandler};

impl<T: Reflected + Clone + Default> Reflected for Vec<T> {
    const META_TYPE: MetaType = MetaType::Array;

    #[inline]
    fn data_handler() -> DataStructureHandler {
        DataStructureHandler::Array(VecHandler::<T>::INSTANCE)
    }
}

impl<T: Reflected + Clone + Default, const N: usize> Reflected for [T; N] {
    const META_TYPE: MetaType = MetaType::Array;

    #[inline]
    fn data_handler() -> DataStructureHandler {
        DataStructureHandler::Array(StaticArrayHandler::<T, N>::INSTANCE)
    }
}

impl<K, V> Reflected for BTreeMap<K, V>
where
    K: MapKey + Ord,
    V: Reflected + Clone + Default,
{
    const META_TYPE: MetaType = MetaType::Map;

    #[inline]
    fn data_handler() -> DataStructureHandler {
        DataStructureHandler::Map(MapHandlerImpl::<Self>::INSTANCE)
    }
}

impl<K, V, S> Reflected for rx_utils::hash::hashbrown::HashMap<K, V, S>
where
    K: MapKey + Hash + Eq,
    V: Reflected + Clone + Default,
    S: BuildHasher + 'static,
{
    const META_TYPE: MetaType = MetaType::Map;

    #[inline]
    fn data_handler() -> DataStructureHandler {
        DataStructureHandler::Map(MapHandlerImpl::<Self>::INSTANCE)
    }
}

crate::cfg::std! {
    impl<K, V, S> Reflected for std::collections::HashMap<K, V, S>
    where
        K: MapKey + Hash + Eq,
        V: Reflected + Clone + Default,
        S: BuildHasher + 'static,
    {
        const META_TYPE: MetaType = MetaType::Map;

        #[inline]
        fn data_handler() -> DataStructureHandler {
            DataStructureHandler::Map(MapHandlerImpl::<Self>::INSTANCE)
        }
    }
}

// -----------------------------------------------------------------------------
// Tests
