use core::any::TypeId;
use core::fmt::Debug;

use crate::hash::NoOpHashState;
use crate::hash::hashbrown::HashMap;

/// A map keyed by [`TypeId`], used as the by-type index of registries.
///
/// `TypeId` is already a hash, so keys are not hashed again.
///
/// ```
/// use rx_utils::TypeIdMap;
///
/// let mut index = TypeIdMap::new();
/// index.insert(core::any::TypeId::of::<u8>(), 0usize);
/// assert_eq!(index.get_type::<u8>(), Some(&0));
/// assert!(!index.contains_type::<u16>());
/// ```
pub struct TypeIdMap<V>(HashMap<TypeId, V, NoOpHashState>);

impl<V> TypeIdMap<V> {
    #[inline]
    pub const fn new() -> Self {
        Self(HashMap::with_hasher(NoOpHashState))
    }

    /// Returns the previous value of `type_id`, if any.
    #[inline]
    pub fn insert(&mut self, type_id: TypeId, value: V) -> Option<V> {
        self.0.insert(type_id, value)
    }

    #[inline]
    pub fn get(&self, type_id: &TypeId) -> Option<&V> {
        self.0.get(type_id)
    }

    #[inline]
    pub fn get_type<T: ?Sized + 'static>(&self) -> Option<&V> {
        self.get(&TypeId::of::<T>())
    }

    #[inline]
    pub fn contains_type<T: ?Sized + 'static>(&self) -> bool {
        self.0.contains_key(&TypeId::of::<T>())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<V> Default for TypeIdMap<V> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Debug> Debug for TypeIdMap<V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        Debug::fmt(&self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use super::TypeIdMap;
    use core::any::TypeId;

    #[test]
    fn index_by_type() {
        let mut index = TypeIdMap::new();
        assert!(index.is_empty());

        assert_eq!(index.insert(TypeId::of::<u8>(), 1usize), None);
        assert_eq!(index.insert(TypeId::of::<f32>(), 3), None);
        assert_eq!(index.insert(TypeId::of::<u8>(), 2), Some(1));

        assert_eq!(index.get_type::<u8>(), Some(&2));
        assert_eq!(index.get(&TypeId::of::<f32>()), Some(&3));
        assert!(index.contains_type::<f32>());
        assert!(!index.contains_type::<i64>());
        assert_eq!(index.len(), 2);
    }
}
