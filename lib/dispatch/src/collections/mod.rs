pub mod list;
pub mod hash_table;
pub mod min_heap;
pub mod priority_queue;

pub use list::List;
pub use hash_table::{HashTable, TableKey};
pub use min_heap::MinHeap;
pub use priority_queue::PriorityQueue;
