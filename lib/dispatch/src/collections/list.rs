//! Doubly-linked list over a slab of nodes. Links are slab indices, so removal is a
//! plain unlink and freed slots are reused by later pushes.

#[derive(Debug, Clone)]
struct Node<T> {
  item: T,
  prev: Option<usize>,
  next: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct List<T> {
  slots: Vec<Option<Node<T>>>,
  free: Vec<usize>,
  head: Option<usize>,
  tail: Option<usize>,
  len: usize,
}

impl<T> Default for List<T> {
  fn default() -> Self {
    List { slots: Vec::new(), free: Vec::new(), head: None, tail: None, len: 0 }
  }
}

impl<T> List<T> {
  pub fn new() -> Self { Self::default() }

  #[inline]
  pub fn len(&self) -> usize { self.len }

  #[inline]
  pub fn is_empty(&self) -> bool { self.len == 0 }

  pub fn push_back(&mut self, item: T) {
    let node = Node { item, prev: self.tail, next: None };
    let idx = match self.free.pop() {
      Some(idx) => {
        self.slots[idx] = Some(node);
        idx
      }
      None => {
        self.slots.push(Some(node));
        self.slots.len() - 1
      }
    };

    match self.tail.and_then(|t| self.slots[t].as_mut()) {
      Some(tail) => tail.next = Some(idx),
      None => self.head = Some(idx),
    }
    self.tail = Some(idx);
    self.len += 1;
  }

  /// Slot index of the first item matching `pred`, walking from the head.
  fn position(&self, mut pred: impl FnMut(&T) -> bool) -> Option<usize> {
    let mut cur = self.head;
    while let Some(idx) = cur {
      let node = self.slots[idx].as_ref()?;
      if pred(&node.item) {
        return Some(idx);
      }
      cur = node.next;
    }
    None
  }

  pub fn find(&self, pred: impl FnMut(&T) -> bool) -> Option<&T> {
    let idx = self.position(pred)?;
    self.slots[idx].as_ref().map(|n| &n.item)
  }

  pub fn find_mut(&mut self, pred: impl FnMut(&T) -> bool) -> Option<&mut T> {
    let idx = self.position(pred)?;
    self.slots[idx].as_mut().map(|n| &mut n.item)
  }

  /// Unlink and return the first item matching `pred`.
  pub fn remove_first(&mut self, pred: impl FnMut(&T) -> bool) -> Option<T> {
    let idx = self.position(pred)?;
    let node = self.slots[idx].take()?;

    match node.prev.and_then(|p| self.slots[p].as_mut()) {
      Some(prev) => prev.next = node.next,
      None => self.head = node.next,
    }
    match node.next.and_then(|n| self.slots[n].as_mut()) {
      Some(next) => next.prev = node.prev,
      None => self.tail = node.prev,
    }

    self.free.push(idx);
    self.len -= 1;
    Some(node.item)
  }

  pub fn iter(&self) -> Iter<'_, T> {
    Iter { list: self, cur: self.head }
  }
}

pub struct Iter<'a, T> {
  list: &'a List<T>,
  cur: Option<usize>,
}

impl<'a, T> Iterator for Iter<'a, T> {
  type Item = &'a T;

  fn next(&mut self) -> Option<&'a T> {
    let idx = self.cur?;
    let node = self.list.slots[idx].as_ref()?;
    self.cur = node.next;
    Some(&node.item)
  }
}

impl<'a, T> IntoIterator for &'a List<T> {
  type Item = &'a T;
  type IntoIter = Iter<'a, T>;

  fn into_iter(self) -> Iter<'a, T> { self.iter() }
}
