//! Hash containers used for name and type lookups.
//!
//! Maps default to [`FixedHashState`], so iteration order only depends on
//! the inserted keys and never on a per-process random seed.

use core::hash::{BuildHasher, Hasher};

use foldhash::fast::{FixedState, FoldHasher};

// -----------------------------------------------------------------------------
// FixedHashState

const FIXED_SEED: FixedState = FixedState::with_seed(0x2C6F_9A31_D04E_85B7);

/// A `foldhash` state with a seed fixed at compile time.
///
/// # Examples
///
/// ```
/// use core::hash::BuildHasher;
/// use refract_utils::hash::FixedHashState;
///
/// assert_eq!(FixedHashState.hash_one("finalField"), FixedHashState.hash_one("finalField"));
/// ```
#[derive(Copy, Clone, Default, Debug)]
pub struct FixedHashState;

impl BuildHasher for FixedHashState {
    type Hasher = FoldHasher<'static>;

    #[inline(always)]
    fn build_hasher(&self) -> Self::Hasher {
        FIXED_SEED.build_hasher()
    }
}

// -----------------------------------------------------------------------------
// NoOpHashState

/// A hasher for keys that already are well distributed hashes, such as `TypeId`.
///
/// `write_u64` stores the value as is; any other write folds its bytes in.
#[derive(Copy, Clone, Default, Debug)]
pub struct NoOpHasher {
    hash: u64,
}

impl Hasher for NoOpHasher {
    #[inline]
    fn finish(&self) -> u64 {
        self.hash
    }

    fn write(&mut self, bytes: &[u8]) {
        for byte in bytes {
            self.hash = self.hash.rotate_left(8) ^ u64::from(*byte);
        }
    }

    #[inline]
    fn write_u64(&mut self, i: u64) {
        self.hash = i;
    }
}

/// Builds [`NoOpHasher`]s.
#[derive(Copy, Clone, Default, Debug)]
pub struct NoOpHashState;

impl BuildHasher for NoOpHashState {
    type Hasher = NoOpHasher;

    #[inline(always)]
    fn build_hasher(&self) -> Self::Hasher {
        NoOpHasher { hash: 0 }
    }
}

// -----------------------------------------------------------------------------
// Containers

/// A [`hashbrown::HashMap`] using [`FixedHashState`] by default.
pub type HashMap<K, V, S = FixedHashState> = hashbrown::HashMap<K, V, S>;

/// A [`hashbrown::HashSet`] using [`FixedHashState`] by default.
pub type HashSet<T, S = FixedHashState> = hashbrown::HashSet<T, S>;

pub use foldhash;
pub use hashbrown;

#[cfg(test)]
mod tests {
    use core::hash::{BuildHasher, Hasher};

    use super::{HashMap, NoOpHashState};

    #[test]
    fn no_op_passes_u64_through() {
        let mut hasher = NoOpHashState.build_hasher();
        hasher.write_u64(0xDEAD_BEEF);
        assert_eq!(hasher.finish(), 0xDEAD_BEEF);
    }

    #[test]
    fn fixed_map_lookup() {
        let mut map: HashMap<_, _> = HashMap::default();
        map.insert("accessorValue", 1);
        map.insert("finalField", 2);
        assert_eq!(map.get("finalField"), Some(&2));
        assert_eq!(map.get("plainField"), None);
    }
}
