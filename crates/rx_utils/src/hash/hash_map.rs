//! [`HashMap`] with [`FixedHashState`] as the default hashing provider.

use crate::hash::FixedHashState;

/// A `hashbrown` map hashed with [`FixedHashState`].
///
/// Construct it with `HashMap::default()` or `HashMap::with_hasher(FixedHashState)`;
/// `new()` is only available for the default `RandomState` of `std`.
///
/// # Examples
///
/// ```
/// use rx_utils::hash::HashMap;
///
/// let mut map: HashMap<i32, bool> = HashMap::default();
/// map.insert(3, true);
/// assert_eq!(map.get(&3), Some(&true));
/// ```
pub type HashMap<K, V, S = FixedHashState> = hashbrown::HashMap<K, V, S>;

// -----------------------------------------------------------------------------
// Tests
