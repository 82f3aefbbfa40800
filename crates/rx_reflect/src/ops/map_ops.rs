use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::string::String;
use core::any::{Any, TypeId};
use core::hash::{BuildHasher, Hash};
use core::marker::PhantomData;

use super::{DataStructureHandler, FromChars, HandlerError, ToChars, WireScalar};
use crate::Reflected;
use crate::info::MetaType;

// -----------------------------------------------------------------------------
// MapKey

/// The bound for types usable as reflected map keys.
///
/// Keys must round-trip through their text form (JSON keys, path segments)
/// and their wire form (binary keys).
pub trait MapKey: Reflected + FromChars + ToChars + WireScalar + Clone {}

impl<K: Reflected + FromChars + ToChars + WireScalar + Clone> MapKey for K {}

// -----------------------------------------------------------------------------
// MapHandler

/// Type-erased operations over a map-like container.
///
/// Keys cross the boundary as text (`&str`) and are converted with
/// [`FromChars`]. [`binary_create`](MapHandler::binary_create) takes the raw
/// wire bytes instead.
pub trait MapHandler: Send + Sync + 'static {
    fn key_meta_type(&self) -> MetaType;

    fn value_meta_type(&self) -> MetaType;

    fn sizeof_key(&self) -> usize;

    fn sizeof_value(&self) -> usize;

    fn key_handler(&self) -> DataStructureHandler;

    fn value_handler(&self) -> DataStructureHandler;

    fn key_type_id(&self) -> TypeId;

    fn value_type_id(&self) -> TypeId;

    fn size(&self, map: &dyn Any) -> Result<usize, HandlerError>;

    /// Looks `key` up. A missing key is `Ok(None)`.
    fn read<'a>(&self, map: &'a dyn Any, key: &str) -> Result<Option<&'a dyn Any>, HandlerError>;

    fn read_mut<'a>(
        &self,
        map: &'a mut dyn Any,
        key: &str,
    ) -> Result<Option<&'a mut dyn Any>, HandlerError>;

    /// Assigns to an existing key. Returns `false` without inserting if the key is missing.
    fn update(
        &self,
        map: &mut dyn Any,
        key: &str,
        value: Option<&dyn Any>,
    ) -> Result<bool, HandlerError>;

    /// Inserts or overwrites `key` when `value` is given, otherwise inserts
    /// a default only if the key is absent. Returns the stored value.
    fn create<'a>(
        &self,
        map: &'a mut dyn Any,
        key: &str,
        value: Option<&dyn Any>,
    ) -> Result<&'a mut dyn Any, HandlerError>;

    /// [`create`](MapHandler::create) with the key given as raw wire bytes.
    fn binary_create<'a>(
        &self,
        map: &'a mut dyn Any,
        key: &[u8],
        value: Option<&dyn Any>,
    ) -> Result<&'a mut dyn Any, HandlerError>;

    fn erase(&self, map: &mut dyn Any, key: &str) -> Result<bool, HandlerError>;

    fn clear(&self, map: &mut dyn Any) -> Result<(), HandlerError>;

    /// Visits every `(key, value)` pair in the map's iteration order.
    fn iter<'a>(
        &self,
        map: &'a dyn Any,
    ) -> Result<Box<dyn Iterator<Item = (&'a dyn Any, &'a dyn Any)> + 'a>, HandlerError>;

    fn key_to_string(&self, key: &dyn Any) -> Result<String, HandlerError>;
}

// -----------------------------------------------------------------------------
// MapStorage

/// The concrete map operations a [`MapHandlerImpl`] relies on.
pub trait MapStorage: Any {
    type Key: MapKey;
    type Value: Reflected + Clone + Default;

    fn len(&self) -> usize;

    fn get(&self, key: &Self::Key) -> Option<&Self::Value>;

    fn get_mut(&mut self, key: &Self::Key) -> Option<&mut Self::Value>;

    fn insert(&mut self, key: Self::Key, value: Self::Value) -> &mut Self::Value;

    fn get_or_default(&mut self, key: Self::Key) -> &mut Self::Value;

    fn remove(&mut self, key: &Self::Key) -> bool;

    fn clear(&mut self);

    fn pairs<'a>(&'a self) -> Box<dyn Iterator<Item = (&'a Self::Key, &'a Self::Value)> + 'a>;
}

impl<K, V> MapStorage for BTreeMap<K, V>
where
    K: MapKey + Ord,
    V: Reflected + Clone + Default,
{
    type Key = K;
    type Value = V;

    fn len(&self) -> usize {
        BTreeMap::len(self)
    }

    fn get(&self, key: &K) -> Option<&V> {
        BTreeMap::get(self, key)
    }

    fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        BTreeMap::get_mut(self, key)
    }

    fn insert(&mut self, key: K, value: V) -> &mut V {
        use alloc::collections::btree_map::Entry;
        match self.entry(key) {
            Entry::Vacant(e) => e.insert(value),
            Entry::Occupied(e) => {
                let slot = e.into_mut();
                *slot = value;
                slot
            }
        }
    }

    fn get_or_default(&mut self, key: K) -> &mut V {
        self.entry(key).or_default()
    }

    fn remove(&mut self, key: &K) -> bool {
        BTreeMap::remove(self, key).is_some()
    }

    fn clear(&mut self) {
        BTreeMap::clear(self);
    }

    fn pairs<'a>(&'a self) -> Box<dyn Iterator<Item = (&'a K, &'a V)> + 'a> {
        Box::new(self.iter())
    }
}

impl<K, V, S> MapStorage for rx_utils::hash::hashbrown::HashMap<K, V, S>
where
    K: MapKey + Hash + Eq,
    V: Reflected + Clone + Default,
    S: BuildHasher + 'static,
{
    type Key = K;
    type Value = V;

    fn len(&self) -> usize {
        Self::len(self)
    }

    fn get(&self, key: &K) -> Option<&V> {
        Self::get(self, key)
    }

    fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        Self::get_mut(self, key)
    }

    fn insert(&mut self, key: K, value: V) -> &mut V {
        use rx_utils::hash::hashbrown::hash_map::Entry;
        match self.entry(key) {
            Entry::Vacant(e) => e.insert(value),
            Entry::Occupied(e) => {
                let slot = e.into_mut();
                *slot = value;
                slot
            }
        }
    }

    fn get_or_default(&mut self, key: K) -> &mut V {
        self.entry(key).or_default()
    }

    fn remove(&mut self, key: &K) -> bool {
        Self::remove(self, key).is_some()
    }

    fn clear(&mut self) {
        Self::clear(self);
    }

    fn pairs<'a>(&'a self) -> Box<dyn Iterator<Item = (&'a K, &'a V)> + 'a> {
        Box::new(self.iter())
    }
}

crate::cfg::std! {
    impl<K, V, S> MapStorage for std::collections::HashMap<K, V, S>
    where
        K: MapKey + Hash + Eq,
        V: Reflected + Clone + Default,
        S: BuildHasher + 'static,
    {
        type Key = K;
        type Value = V;

        fn len(&self) -> usize {
            Self::len(self)
        }

        fn get(&self, key: &K) -> Option<&V> {
            Self::get(self, key)
        }

        fn get_mut(&mut self, key: &K) -> Option<&mut V> {
            Self::get_mut(self, key)
        }

        fn insert(&mut self, key: K, value: V) -> &mut V {
            use std::collections::hash_map::Entry;
            match self.entry(key) {
                Entry::Vacant(e) => e.insert(value),
                Entry::Occupied(e) => {
                    let slot = e.into_mut();
                    *slot = value;
                    slot
                }
            }
        }

        fn get_or_default(&mut self, key: K) -> &mut V {
            self.entry(key).or_default()
        }

        fn remove(&mut self, key: &K) -> bool {
            Self::remove(self, key).is_some()
        }

        fn clear(&mut self) {
            Self::clear(self);
        }

        fn pairs<'a>(&'a self) -> Box<dyn Iterator<Item = (&'a K, &'a V)> + 'a> {
            Box::new(self.iter())
        }
    }
}

// -----------------------------------------------------------------------------
// MapHandlerImpl

/// Handler for any [`MapStorage`].
pub struct MapHandlerImpl<M>(PhantomData<fn() -> M>);

impl<M: MapStorage> MapHandlerImpl<M> {
    pub const INSTANCE: &'static Self = &Self(PhantomData);

    #[inline]
    fn map(map: &dyn Any) -> Result<&M, HandlerError> {
        map.downcast_ref::<M>().ok_or_else(HandlerError::mismatch::<M>)
    }

    #[inline]
    fn map_mut(map: &mut dyn Any) -> Result<&mut M, HandlerError> {
        map.downcast_mut::<M>().ok_or_else(HandlerError::mismatch::<M>)
    }

    fn value(value: Option<&dyn Any>) -> Result<Option<M::Value>, HandlerError> {
        value
            .map(|v| {
                v.downcast_ref::<M::Value>()
                    .cloned()
                    .ok_or_else(HandlerError::mismatch::<M::Value>)
            })
            .transpose()
    }

    fn store(map: &mut M, key: M::Key, value: Option<M::Value>) -> &mut dyn Any {
        match value {
            Some(v) => map.insert(key, v),
            None => map.get_or_default(key),
        }
    }
}

impl<M: MapStorage> MapHandler for MapHandlerImpl<M> {
    fn key_meta_type(&self) -> MetaType {
        <M::Key as Reflected>::META_TYPE
    }

    fn value_meta_type(&self) -> MetaType {
        <M::Value as Reflected>::META_TYPE
    }

    fn sizeof_key(&self) -> usize {
        size_of::<M::Key>()
    }

    fn sizeof_value(&self) -> usize {
        size_of::<M::Value>()
    }

    fn key_handler(&self) -> DataStructureHandler {
        <M::Key as Reflected>::data_handler()
    }

    fn value_handler(&self) -> DataStructureHandler {
        <M::Value as Reflected>::data_handler()
    }

    fn key_type_id(&self) -> TypeId {
        TypeId::of::<M::Key>()
    }

    fn value_type_id(&self) -> TypeId {
        TypeId::of::<M::Value>()
    }

    fn size(&self, map: &dyn Any) -> Result<usize, HandlerError> {
        Ok(Self::map(map)?.len())
    }

    fn read<'a>(&self, map: &'a dyn Any, key: &str) -> Result<Option<&'a dyn Any>, HandlerError> {
        let map = Self::map(map)?;
        let key = M::Key::from_chars(key)?;
        Ok(map.get(&key).map(|v| v as &dyn Any))
    }

    fn read_mut<'a>(
        &self,
        map: &'a mut dyn Any,
        key: &str,
    ) -> Result<Option<&'a mut dyn Any>, HandlerError> {
        let map = Self::map_mut(map)?;
        let key = M::Key::from_chars(key)?;
        Ok(map.get_mut(&key).map(|v| v as &mut dyn Any))
    }

    fn update(
        &self,
        map: &mut dyn Any,
        key: &str,
        value: Option<&dyn Any>,
    ) -> Result<bool, HandlerError> {
        let map = Self::map_mut(map)?;
        let key = M::Key::from_chars(key)?;
        let value = Self::value(value)?;
        match map.get_mut(&key) {
            Some(slot) => {
                *slot = value.unwrap_or_default();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn create<'a>(
        &self,
        map: &'a mut dyn Any,
        key: &str,
        value: Option<&dyn Any>,
    ) -> Result<&'a mut dyn Any, HandlerError> {
        let map = Self::map_mut(map)?;
        let key = M::Key::from_chars(key)?;
        let value = Self::value(value)?;
        Ok(Self::store(map, key, value))
    }

    fn binary_create<'a>(
        &self,
        map: &'a mut dyn Any,
        key: &[u8],
        value: Option<&dyn Any>,
    ) -> Result<&'a mut dyn Any, HandlerError> {
        let map = Self::map_mut(map)?;
        let key = M::Key::read_wire(key).ok_or(HandlerError::KeyWidth {
            expected: <M::Key as WireScalar>::WIRE_SIZE,
            found: key.len(),
        })?;
        let value = Self::value(value)?;
        Ok(Self::store(map, key, value))
    }

    fn erase(&self, map: &mut dyn Any, key: &str) -> Result<bool, HandlerError> {
        let map = Self::map_mut(map)?;
        let key = M::Key::from_chars(key)?;
        Ok(map.remove(&key))
    }

    fn clear(&self, map: &mut dyn Any) -> Result<(), HandlerError> {
        Self::map_mut(map)?.clear();
        Ok(())
    }

    fn iter<'a>(
        &self,
        map: &'a dyn Any,
    ) -> Result<Box<dyn Iterator<Item = (&'a dyn Any, &'a dyn Any)> + 'a>, HandlerError> {
        let map = Self::map(map)?;
        Ok(Box::new(
            map.pairs().map(|(k, v)| (k as &dyn Any, v as &dyn Any)),
        ))
    }

    fn key_to_string(&self, key: &dyn Any) -> Result<String, HandlerError> {
        key.downcast_ref::<M::Key>()
            .map(ToChars::to_chars)
            .ok_or_else(HandlerError::mismatch::<M::Key>)
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{MapHandler, MapHandlerImpl};
    use crate::info::MetaType;
    use crate::ops::HandlerError;
    use alloc::collections::BTreeMap;
    use alloc::string::{String, ToString};
    use alloc::vec::Vec;
    use rx_utils::hash::HashMap;

    type EvenOdd = BTreeMap<i32, bool>;

    #[test]
    fn string_keys() {
        let h = MapHandlerImpl::<EvenOdd>::INSTANCE;
        let mut map = EvenOdd::new();
        for i in 0..10 {
            h.create(&mut map, &i.to_string(), Some(&(i % 2 == 0))).unwrap();
        }
        assert_eq!(h.size(&map), Ok(10));
        assert_eq!(
            h.read(&map, "4").unwrap().and_then(|v| v.downcast_ref::<bool>()),
            Some(&true)
        );
        assert!(h.read(&map, "42").unwrap().is_none());
        assert!(matches!(h.read(&map, "x"), Err(HandlerError::Convert(_))));

        let keys: Vec<String> = h
            .iter(&map)
            .unwrap()
            .map(|(k, _)| h.key_to_string(k).unwrap())
            .collect();
        assert_eq!(keys[..3], ["0", "1", "2"]);
    }

    #[test]
    fn create_and_update() {
        let h = MapHandlerImpl::<EvenOdd>::INSTANCE;
        let mut map = EvenOdd::new();

        assert_eq!(h.update(&mut map, "1", Some(&true)), Ok(false));
        assert!(map.is_empty());

        h.create(&mut map, "1", None).unwrap();
        assert_eq!(map.get(&1), Some(&false));

        h.create(&mut map, "1", Some(&true)).unwrap();
        assert_eq!(map.get(&1), Some(&true));

        // A default-create never clobbers an existing value.
        h.create(&mut map, "1", None).unwrap();
        assert_eq!(map.get(&1), Some(&true));

        assert_eq!(h.update(&mut map, "1", Some(&false)), Ok(true));
        assert_eq!(map.get(&1), Some(&false));

        assert_eq!(h.erase(&mut map, "1"), Ok(true));
        assert_eq!(h.erase(&mut map, "1"), Ok(false));
    }

    #[test]
    fn binary_keys() {
        let h = MapHandlerImpl::<HashMap<i32, u8>>::INSTANCE;
        let mut map: HashMap<i32, u8> = HashMap::default();
        let slot = h.binary_create(&mut map, &7i32.to_le_bytes(), None).unwrap();
        *slot.downcast_mut::<u8>().unwrap() = 3;
        assert_eq!(map.get(&7), Some(&3));

        assert_eq!(
            h.binary_create(&mut map, &[1, 2], None).err(),
            Some(HandlerError::KeyWidth {
                expected: 4,
                found: 2
            })
        );

        h.clear(&mut map).unwrap();
        assert_eq!(h.size(&map), Ok(0));
    }

    #[test]
    fn descriptors() {
        let h = MapHandlerImpl::<BTreeMap<u16, Vec<f32>>>::INSTANCE;
        assert_eq!(h.key_meta_type(), MetaType::UShort);
        assert_eq!(h.value_meta_type(), MetaType::Array);
        assert_eq!(h.sizeof_key(), 2);
        assert!(h.value_handler().array_handler().is_some());
        assert!(h.key_handler().is_none());
    }
}
