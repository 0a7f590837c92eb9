use super::Index;
use core::{
    iter::Enumerate,
    marker::PhantomData,
    ops,
    slice,
};

/// An array of values addressed by a typed index.
///
/// Accessing a slot outside of the array is reported as `None`
/// by the checked accessors and panics through `ops::Index`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundedArray<K, V> {
    values: Vec<V>,
    marker: PhantomData<fn() -> K>,
}

impl<K, V> Default for BoundedArray<K, V> {
    fn default() -> Self {
        Self {
            values: Vec::new(),
            marker: Default::default(),
        }
    }
}

impl<K, V> BoundedArray<K, V> {
    /// Returns the number of slots of the bounded array.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the bounded array has no slots.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the values of the bounded array as slice.
    #[inline]
    pub fn as_slice(&self) -> &[V] {
        &self.values
    }

    /// Resizes the bounded array to the new length.
    ///
    /// Additional slots are filled using the given closure.
    pub fn resize_with<F>(&mut self, new_len: usize, f: F)
    where
        F: FnMut() -> V,
    {
        self.values.resize_with(new_len, f)
    }
}

impl<K, V> BoundedArray<K, V>
where
    K: Index,
{
    /// Creates a new bounded array with the given length.
    ///
    /// Every slot is initialized by the closure given its key.
    pub fn with_len<F>(len: usize, mut f: F) -> Self
    where
        F: FnMut(K) -> V,
    {
        Self {
            values: (0..len).map(|index| f(K::from_index(index))).collect(),
            marker: Default::default(),
        }
    }

    /// Pushes a new value to the bounded array and returns its key.
    pub fn push(&mut self, value: V) -> K {
        let key = K::from_index(self.len());
        self.values.push(value);
        key
    }

    /// Returns a shared reference to the value at the given key if in bounds.
    #[inline]
    pub fn get(&self, key: K) -> Option<&V> {
        self.values.get(key.into_index())
    }

    /// Returns an exclusive reference to the value at the given key if in bounds.
    #[inline]
    pub fn get_mut(&mut self, key: K) -> Option<&mut V> {
        self.values.get_mut(key.into_index())
    }

    /// Returns `true` if the key addresses a slot of the bounded array.
    #[inline]
    pub fn contains_key(&self, key: K) -> bool {
        key.into_index() < self.len()
    }

    /// Returns an iterator over the keys and shared references to the values.
    pub fn iter(&self) -> Iter<K, V> {
        Iter {
            iter: self.values.iter().enumerate(),
            marker: Default::default(),
        }
    }
}

impl<K, V> ops::Index<K> for BoundedArray<K, V>
where
    K: Index,
{
    type Output = V;

    #[inline]
    fn index(&self, key: K) -> &Self::Output {
        self.get(key).expect("encountered out of bounds index")
    }
}

impl<K, V> ops::IndexMut<K> for BoundedArray<K, V>
where
    K: Index,
{
    #[inline]
    fn index_mut(&mut self, key: K) -> &mut Self::Output {
        self.get_mut(key).expect("encountered out of bounds index")
    }
}

impl<'a, K, V> IntoIterator for &'a BoundedArray<K, V>
where
    K: Index,
{
    type Item = (K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the keys and values of a bounded array.
#[derive(Debug, Clone)]
pub struct Iter<'a, K, V> {
    iter: Enumerate<slice::Iter<'a, V>>,
    marker: PhantomData<fn() -> K>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V>
where
    K: Index,
{
    type Item = (K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.iter
            .next()
            .map(|(index, value)| (K::from_index(index), value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl<'a, K, V> ExactSizeIterator for Iter<'a, K, V> where K: Index {}
