mod bounded_array;

pub use self::bounded_array::{
    BoundedArray,
    Iter,
};

/// Index types that may be used as keys for bounded containers.
pub trait Index: Copy + Clone {
    /// Creates a new key from the given index.
    fn from_index(index: usize) -> Self;
    /// Returns the index from the given key.
    fn into_index(self) -> usize;
}

/// A slightly faster hash map due to usage of `ahash` hasher.
pub type HashMap<K, V> = std::collections::HashMap<K, V, ahash::RandomState>;

/// A slightly faster hash set due to usage of `ahash` hasher.
pub type HashSet<T> = std::collections::HashSet<T, ahash::RandomState>;
