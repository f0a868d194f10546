//! Decrease-key priority queue: a [`MinHeap`] plus a [`HashTable`] from item key to
//! heap position. Every relocation during percolation is written back to the table,
//! so an item's position can be found in O(1) and its priority changed in O(log n).
use std::fmt;
use super::hash_table::{HashTable, TableKey};
use super::min_heap::MinHeap;

#[derive(Debug, Clone)]
struct Slot<K> {
  key: K,
  index: usize,
}

fn slot_key<K>(slot: &Slot<K>) -> &K { &slot.key }

pub struct PriorityQueue<T, P, K> {
  heap: MinHeap<T, P>,
  positions: HashTable<Slot<K>, K>,
  key_of: fn(&T) -> &K,
}

impl<T, P, K> PriorityQueue<T, P, K>
  where
    P: PartialOrd,
    K: TableKey + PartialEq + Clone,
{
  /// `size` is the bucket count of the position table; the expected number of
  /// queued items is a good choice.
  pub fn new(size: usize, priority_of: fn(&T) -> P, key_of: fn(&T) -> &K) -> Self {
    PriorityQueue {
      heap: MinHeap::new(priority_of),
      positions: HashTable::new(size, slot_key),
      key_of,
    }
  }

  /// Build a queue from `items` in O(n). Keys must be distinct.
  pub fn heapify(size: usize, items: Vec<T>, priority_of: fn(&T) -> P, key_of: fn(&T) -> &K) -> Self {
    let heap = MinHeap::heapify(items, priority_of);
    let mut positions = HashTable::new(size, slot_key);
    for (index, item) in heap.as_slice().iter().enumerate() {
      debug_assert!(!positions.contains_key(key_of(item)), "duplicate key in priority queue");
      positions.add(Slot { key: key_of(item).clone(), index });
    }
    PriorityQueue { heap, positions, key_of }
  }

  #[inline]
  pub fn len(&self) -> usize { self.heap.len() }

  #[inline]
  pub fn is_empty(&self) -> bool { self.heap.is_empty() }

  #[inline]
  pub fn peek(&self) -> Option<&T> { self.heap.peek() }

  #[inline]
  pub fn as_slice(&self) -> &[T] { self.heap.as_slice() }

  #[inline]
  pub fn contains(&self, key: &K) -> bool { self.positions.contains_key(key) }

  /// Current heap position of the item with `key`.
  #[inline]
  pub fn get_index(&self, key: &K) -> Option<usize> {
    self.positions.get(key).map(|slot| slot.index)
  }

  pub fn get(&self, key: &K) -> Option<&T> {
    self.get_index(key).map(|i| &self.heap.as_slice()[i])
  }

  /// The heap together with a relocation callback writing into the position table.
  fn split(&mut self) -> (&mut MinHeap<T, P>, impl FnMut(&T, usize) + '_) {
    let PriorityQueue { heap, positions, key_of } = self;
    let key_of = *key_of;
    let moved = move |item: &T, index: usize| {
      if let Some(slot) = positions.get_mut(key_of(item)) {
        slot.index = index;
      }
    };
    (heap, moved)
  }

  /// Insert `item`. If its key is already queued the stored item is replaced and
  /// repositioned instead.
  pub fn push(&mut self, item: T) {
    let key = (self.key_of)(&item).clone();
    if self.positions.contains_key(&key) {
      self.update_priority(item);
      return;
    }
    self.positions.add(Slot { key, index: self.heap.len() });
    let (heap, mut moved) = self.split();
    heap.push_with(item, &mut moved);
  }

  pub fn pop(&mut self) -> Option<T> {
    let item = {
      let (heap, mut moved) = self.split();
      heap.pop_with(&mut moved)?
    };
    self.positions.remove((self.key_of)(&item));
    Some(item)
  }

  /// Store `item` over the queued item with the same key and restore heap order.
  /// Returns `false` if no item with that key is queued. With an unchanged
  /// priority nothing moves.
  pub fn update_priority(&mut self, item: T) -> bool {
    let index = match self.get_index((self.key_of)(&item)) {
      Some(index) => index,
      None => return false,
    };
    let (heap, mut moved) = self.split();
    heap.replace(index, item);
    let index = heap.percolate_up(index, &mut moved);
    heap.percolate_down(index, &mut moved);
    true
  }
}

impl<T: fmt::Debug, P, K> fmt::Debug for PriorityQueue<T, P, K> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("PriorityQueue").field("heap", &self.heap).finish()
  }
}
