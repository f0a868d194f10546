//! Array-backed binary min-heap ordered by a caller-supplied priority extractor.
//!
//! The percolation routines take a relocation callback `moved(item, new_index)`,
//! invoked for every item whose position changes. The plain heap passes a no-op;
//! [`PriorityQueue`](super::PriorityQueue) uses it to keep its index table in sync.

#[inline]
pub(super) fn unmoved<T>(_item: &T, _index: usize) {}

#[derive(Clone)]
pub struct MinHeap<T, P> {
  items: Vec<T>,
  priority_of: fn(&T) -> P,
}

impl<T, P: PartialOrd> MinHeap<T, P> {
  pub fn new(priority_of: fn(&T) -> P) -> Self {
    MinHeap { items: Vec::new(), priority_of }
  }

  /// Arrange `items` into heap order in O(n).
  pub fn heapify(items: Vec<T>, priority_of: fn(&T) -> P) -> Self {
    let mut heap = MinHeap { items, priority_of };
    for index in (0..heap.items.len() / 2).rev() {
      heap.percolate_down(index, &mut unmoved);
    }
    heap
  }

  #[inline]
  pub fn len(&self) -> usize { self.items.len() }

  #[inline]
  pub fn is_empty(&self) -> bool { self.items.is_empty() }

  #[inline]
  pub fn peek(&self) -> Option<&T> { self.items.first() }

  #[inline]
  pub fn priority(&self, item: &T) -> P { (self.priority_of)(item) }

  /// Items in heap (array) order.
  #[inline]
  pub fn as_slice(&self) -> &[T] { &self.items }

  pub fn push(&mut self, item: T) {
    self.push_with(item, &mut unmoved);
  }

  pub fn pop(&mut self) -> Option<T> {
    self.pop_with(&mut unmoved)
  }

  /// Append and percolate up. The new item's own starting slot is not reported.
  pub(super) fn push_with<F: FnMut(&T, usize)>(&mut self, item: T, moved: &mut F) -> usize {
    self.items.push(item);
    self.percolate_up(self.items.len() - 1, moved)
  }

  pub(super) fn pop_with<F: FnMut(&T, usize)>(&mut self, moved: &mut F) -> Option<T> {
    let last = self.items.pop()?;
    if self.items.is_empty() {
      return Some(last);
    }
    let min = std::mem::replace(&mut self.items[0], last);
    moved(&self.items[0], 0);
    self.percolate_down(0, moved);
    Some(min)
  }

  /// Overwrite the item at `index` without restoring heap order.
  pub(super) fn replace(&mut self, index: usize, item: T) -> T {
    std::mem::replace(&mut self.items[index], item)
  }

  #[inline]
  fn less(&self, a: usize, b: usize) -> bool {
    (self.priority_of)(&self.items[a]) < (self.priority_of)(&self.items[b])
  }

  fn swap<F: FnMut(&T, usize)>(&mut self, i: usize, j: usize, moved: &mut F) {
    self.items.swap(i, j);
    moved(&self.items[i], i);
    moved(&self.items[j], j);
  }

  /// Returns the final index of the item that started at `index`.
  pub(super) fn percolate_up<F: FnMut(&T, usize)>(&mut self, mut index: usize, moved: &mut F) -> usize {
    while index > 0 {
      let parent = (index - 1) / 2;
      if !self.less(index, parent) {
        break;
      }
      self.swap(parent, index, moved);
      index = parent;
    }
    index
  }

  /// Returns the final index of the item that started at `index`.
  pub(super) fn percolate_down<F: FnMut(&T, usize)>(&mut self, mut index: usize, moved: &mut F) -> usize {
    let len = self.items.len();
    loop {
      let left = 2 * index + 1;
      let right = left + 1;
      let mut min_index = index;
      if left < len && self.less(left, min_index) {
        min_index = left;
      }
      if right < len && self.less(right, min_index) {
        min_index = right;
      }
      if min_index == index {
        return index;
      }
      self.swap(index, min_index, moved);
      index = min_index;
    }
  }
}

impl<T: std::fmt::Debug, P> std::fmt::Debug for MinHeap<T, P> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_list().entries(self.items.iter()).finish()
  }
}


#[cfg(test)]
pub(super) mod tests {
  use super::*;
  use proptest::prelude::*;

  pub fn identity(x: &i32) -> i32 { *x }

  pub fn is_heap<T, P: PartialOrd>(items: &[T], priority_of: impl Fn(&T) -> P) -> bool {
    (1..items.len()).all(|i| priority_of(&items[(i - 1) / 2]) <= priority_of(&items[i]))
  }

  fn drain(heap: &mut MinHeap<i32, i32>) -> Vec<i32> {
    std::iter::from_fn(|| heap.pop()).collect()
  }

  #[test]
  fn push_pop_sorted() {
    let mut heap = MinHeap::new(identity);
    for x in &[5, 3, 8, 1, 9, 2, 2] {
      heap.push(*x);
      assert!(is_heap(heap.as_slice(), identity));
    }
    assert_eq!(heap.peek(), Some(&1));
    assert_eq!(drain(&mut heap), vec![1, 2, 2, 3, 5, 8, 9]);
    assert_eq!(heap.pop(), None);
    assert_eq!(heap.peek(), None);
  }

  #[test]
  fn heapify_orders_internal_nodes() {
    let heap = MinHeap::heapify(vec![5, 1, 9, 2], identity);
    assert!(is_heap(heap.as_slice(), identity));
    assert_eq!(heap.peek(), Some(&1));

    let mut heap = MinHeap::heapify(vec![7, 6, 5, 4, 3, 2, 1], identity);
    assert_eq!(drain(&mut heap), vec![1, 2, 3, 4, 5, 6, 7]);

    assert!(MinHeap::heapify(Vec::new(), identity).is_empty());
  }

  #[test]
  fn priority_extractor_is_used() {
    fn weight(x: &(char, u32)) -> u32 { x.1 }
    let mut heap = MinHeap::new(weight);
    heap.push(('a', 30));
    heap.push(('b', 10));
    heap.push(('c', 20));
    assert_eq!(heap.pop().map(|x| x.0), Some('b'));
    assert_eq!(heap.pop().map(|x| x.0), Some('c'));
  }

  proptest! {
    #[test]
    fn pops_non_decreasing(ops in proptest::collection::vec(proptest::option::of(-50i32..50), 0..200)) {
      let mut heap = MinHeap::new(identity);
      let mut shadow: Vec<i32> = Vec::new();
      for op in ops {
        match op {
          Some(x) => { heap.push(x); shadow.push(x); }
          None => {
            let expected = shadow.iter().copied().min();
            prop_assert_eq!(heap.pop(), expected);
            if let Some(m) = expected {
              let pos = shadow.iter().position(|&y| y == m).unwrap();
              shadow.swap_remove(pos);
            }
          }
        }
        prop_assert_eq!(heap.peek().copied(), shadow.iter().copied().min());
        prop_assert!(is_heap(heap.as_slice(), identity));
      }
    }

    #[test]
    fn heapify_any(items in proptest::collection::vec(any::<i32>(), 0..100)) {
      let mut sorted = items.clone();
      sorted.sort();
      let mut heap = MinHeap::heapify(items, identity);
      prop_assert!(is_heap(heap.as_slice(), identity));
      prop_assert_eq!(drain(&mut heap), sorted);
    }
  }
}
