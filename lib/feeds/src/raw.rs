use crate::time::Minutes;

/// Build a domain value from a parsed feed record.
pub trait FromRaw<T> where Self: Sized {
  fn from_raw(raw: T) -> Self;
}

#[derive(Debug, Clone, PartialEq)]
pub struct EdgeRecord {
  pub from: String,
  pub to: String,
  pub weight: f64,
}

/// Vertex addresses in feed order plus the undirected roads between them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapFeed {
  pub addresses: Vec<String>,
  pub edges: Vec<EdgeRecord>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParcelRecord {
  pub id: u32,
  pub address: String,
  pub city: String,
  pub state: String,
  pub zip: String,
  pub deadline: Minutes,
  pub mass: u32,
  pub notes: String,
}
