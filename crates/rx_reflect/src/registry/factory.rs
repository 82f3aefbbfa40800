use alloc::boxed::Box;
use alloc::vec::Vec;
use core::any::Any;
use core::fmt;

use rx_utils::hash::HashMap;

use crate::Reflect;
use crate::info::ReflectableId;

/// Builds a new instance from type-erased arguments.
///
/// Returns `None` when the arguments are not of the expected type.
pub type Instantiator = Box<dyn Fn(&dyn Any) -> Option<Box<dyn Reflect>> + Send + Sync>;

/// Instantiators keyed by reflectable id.
///
/// A type can have several instantiators taking different arguments. The
/// first that accepts the arguments wins.
#[derive(Default)]
pub struct ReflectableFactory {
    instantiators: HashMap<ReflectableId, Vec<Instantiator>>,
}

impl ReflectableFactory {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, id: ReflectableId, instantiator: Instantiator) {
        self.instantiators.entry(id).or_default().push(instantiator);
    }

    pub fn contains(&self, id: ReflectableId) -> bool {
        self.instantiators.contains_key(&id)
    }

    pub fn instantiate(&self, id: ReflectableId, args: &dyn Any) -> Option<Box<dyn Reflect>> {
        self.instantiators
            .get(&id)?
            .iter()
            .find_map(|instantiator| instantiator(args))
    }

    pub(crate) fn remap(&mut self, map: impl Fn(ReflectableId) -> ReflectableId) {
        self.instantiators = self
            .instantiators
            .drain()
            .map(|(id, list)| (map(id), list))
            .collect();
    }
}

impl fmt::Debug for ReflectableFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.instantiators.iter().map(|(id, list)| (id, list.len())))
            .finish()
    }
}
