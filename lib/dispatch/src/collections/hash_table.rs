//! Fixed-size chaining hash table. Items are stored whole; their key is read through
//! the extraction function given at construction.
use std::fmt;
use super::list::List;

/// Bucket selection for a key type.
pub trait TableKey {
  fn hash_index(&self, size: usize) -> usize;
}

/// ceil(log2(x)), with ceil(log2(0)) = ceil(log2(1)) = 0.
#[inline]
fn ceil_log2(x: u128) -> u32 {
  if x <= 1 { 0 } else { 128 - (x - 1).leading_zeros() }
}

/// Mid-square hashing: square the key and take the middle `ceil(log2(size))` bits.
pub fn mid_square(key: u64, size: usize) -> usize {
  let size = size as u128;
  let squared = key as u128 * key as u128;
  let r = ceil_log2(size);
  let bits_in_key = ceil_log2(squared);

  if bits_in_key < r {
    return (squared % size) as usize;
  }
  let shifted = squared >> ((bits_in_key - r) / 2);
  let mid_bits = (1u128 << r) - 1;
  ((shifted & mid_bits) % size) as usize
}

/// Multiplicative string hashing, seeded with `size * 7` and multiplier 11.
/// Reducing at every step gives the same result as reducing once at the end.
pub fn multiplicative(key: &str, size: usize) -> usize {
  let size = size as u128;
  let seed = (size * 7) % size;
  key.chars()
    .fold(seed, |h, c| (h * 11 + c as u128) % size) as usize
}

macro_rules! impl_unsigned_key {
  ($($t:ty),*) => {$(
    impl TableKey for $t {
      #[inline]
      fn hash_index(&self, size: usize) -> usize { mid_square(*self as u64, size) }
    }
  )*};
}

macro_rules! impl_signed_key {
  ($($t:ty),*) => {$(
    impl TableKey for $t {
      #[inline]
      fn hash_index(&self, size: usize) -> usize { mid_square(self.unsigned_abs() as u64, size) }
    }
  )*};
}

impl_unsigned_key!(u8, u16, u32, u64, usize);
impl_signed_key!(i8, i16, i32, i64, isize);

impl TableKey for str {
  #[inline]
  fn hash_index(&self, size: usize) -> usize { multiplicative(self, size) }
}

impl TableKey for String {
  #[inline]
  fn hash_index(&self, size: usize) -> usize { multiplicative(self, size) }
}


pub struct HashTable<T, K: ?Sized> {
  buckets: Vec<List<T>>,
  key_of: fn(&T) -> &K,
  len: usize,
}

impl<T, K> HashTable<T, K>
  where
    K: TableKey + PartialEq + ?Sized
{
  /// A table with `size` buckets (at least one). It never grows.
  pub fn new(size: usize, key_of: fn(&T) -> &K) -> Self {
    let buckets = (0..size.max(1)).map(|_| List::new()).collect();
    HashTable { buckets, key_of, len: 0 }
  }

  #[inline]
  pub fn size(&self) -> usize { self.buckets.len() }

  #[inline]
  pub fn len(&self) -> usize { self.len }

  #[inline]
  pub fn is_empty(&self) -> bool { self.len == 0 }

  #[inline]
  fn bucket(&self, key: &K) -> usize {
    key.hash_index(self.buckets.len())
  }

  pub fn add(&mut self, item: T) {
    let b = self.bucket((self.key_of)(&item));
    self.buckets[b].push_back(item);
    self.len += 1;
  }

  pub fn get(&self, key: &K) -> Option<&T> {
    let key_of = self.key_of;
    self.buckets[self.bucket(key)].find(|item| key_of(item) == key)
  }

  pub fn get_mut(&mut self, key: &K) -> Option<&mut T> {
    let key_of = self.key_of;
    let b = self.bucket(key);
    self.buckets[b].find_mut(|item| key_of(item) == key)
  }

  #[inline]
  pub fn contains_key(&self, key: &K) -> bool {
    self.get(key).is_some()
  }

  pub fn remove(&mut self, key: &K) -> Option<T> {
    let key_of = self.key_of;
    let b = self.bucket(key);
    let removed = self.buckets[b].remove_first(|item| key_of(item) == key);
    if removed.is_some() {
      self.len -= 1;
    }
    removed
  }

  /// Every item stored under `key`, in insertion order.
  pub fn get_all(&self, key: &K) -> Vec<&T> {
    let key_of = self.key_of;
    self.buckets[self.bucket(key)].iter()
      .filter(|item| key_of(item) == key)
      .collect()
  }

  /// All items, bucket by bucket.
  pub fn iter(&self) -> impl Iterator<Item=&T> + '_ {
    self.buckets.iter().flat_map(|b| b.iter())
  }
}

impl<T: Clone, K: ?Sized> Clone for HashTable<T, K> {
  fn clone(&self) -> Self {
    HashTable { buckets: self.buckets.clone(), key_of: self.key_of, len: self.len }
  }
}

impl<T: fmt::Debug, K: ?Sized> fmt::Debug for HashTable<T, K> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("HashTable")
      .field("size", &self.buckets.len())
      .field("len", &self.len)
      .field("items", &self.buckets.iter().flat_map(|b| b.iter()).collect::<Vec<_>>())
      .finish()
  }
}
