use core::any::TypeId;
use core::fmt;

use crate::hash::hashbrown::hash_map::Entry;
use crate::hash::{HashMap, NoOpHashState};

/// A map keyed by [`TypeId`].
///
/// `TypeId` already is a hash, so keys go through [`NoOpHashState`].
pub struct TypeIdMap<V>(HashMap<TypeId, V, NoOpHashState>);

impl<V> TypeIdMap<V> {
    /// Creates an empty map. Usable in `static` initializers.
    #[inline]
    pub const fn new() -> Self {
        Self(HashMap::with_hasher(NoOpHashState))
    }

    /// Returns the value for `type_id`, inserting the result of `f` first if absent.
    ///
    /// If `f` fails nothing is inserted and its error is returned.
    #[inline]
    pub fn get_or_try_insert<E>(
        &mut self,
        type_id: TypeId,
        f: impl FnOnce() -> Result<V, E>,
    ) -> Result<&mut V, E> {
        match self.0.entry(type_id) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => Ok(entry.insert(f()?)),
        }
    }

    #[inline]
    pub fn get(&self, type_id: &TypeId) -> Option<&V> {
        self.0.get(type_id)
    }

    #[inline]
    pub fn contains(&self, type_id: &TypeId) -> bool {
        self.0.contains_key(type_id)
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

impl<V: fmt::Debug> fmt::Debug for TypeIdMap<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.0.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use core::any::TypeId;

    use super::TypeIdMap;

    #[test]
    fn get_or_try_insert_calls_once() {
        let mut map = TypeIdMap::new();
        let mut calls = 0;
        for _ in 0..3 {
            let value = map.get_or_try_insert(TypeId::of::<u16>(), || {
                calls += 1;
                Ok::<_, ()>(7)
            });
            assert_eq!(value, Ok(&mut 7));
        }
        assert_eq!(calls, 1);
        assert_eq!(map.len(), 1);
        assert!(map.contains(&TypeId::of::<u16>()));
        assert!(!map.contains(&TypeId::of::<u32>()));
    }

    #[test]
    fn failed_insert_leaves_map_empty() {
        let mut map = TypeIdMap::<u8>::new();
        let result = map.get_or_try_insert(TypeId::of::<u8>(), || Err("cannot build"));
        assert_eq!(result, Err("cannot build"));
        assert!(map.is_empty());
        assert_eq!(map.get(&TypeId::of::<u8>()), None);
    }
}
