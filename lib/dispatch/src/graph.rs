//! Weighted road graph over an arena of vertices, with Dijkstra single-source
//! shortest paths.
use std::fmt;
use tracing::*;
use feeds::raw::{FromRaw, MapFeed};
use crate::Map;
use crate::collections::{HashTable, PriorityQueue, TableKey};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexId(u32);

impl VertexId {
  #[inline]
  pub fn index(self) -> usize { self.0 as usize }
}

impl fmt::Display for VertexId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "v{}", self.0)
  }
}

impl TableKey for VertexId {
  #[inline]
  fn hash_index(&self, size: usize) -> usize { self.0.hash_index(size) }
}

#[derive(Debug, Clone)]
struct AddressIndex {
  address: String,
  id: VertexId,
}

fn address_key(a: &AddressIndex) -> &str { &a.address }

#[derive(Debug, Clone)]
pub struct Graph {
  addresses: Vec<String>,
  by_address: HashTable<AddressIndex, str>,
  adjacency: Vec<Vec<VertexId>>,
  edge_weights: Map<(VertexId, VertexId), f64>,
}

impl Default for Graph {
  fn default() -> Self { Graph::new(1) }
}

impl Graph {
  /// `buckets` sizes the address index; the expected vertex count is a good choice.
  pub fn new(buckets: usize) -> Self {
    Graph {
      addresses: Vec::new(),
      by_address: HashTable::new(buckets, address_key),
      adjacency: Vec::new(),
      edge_weights: Map::default(),
    }
  }

  /// Re-adding a known address returns the existing vertex.
  pub fn add_vertex(&mut self, address: &str) -> VertexId {
    if let Some(id) = self.vertex(address) {
      return id;
    }
    let id = VertexId(self.addresses.len() as u32);
    self.addresses.push(address.to_string());
    self.adjacency.push(Vec::new());
    self.by_address.add(AddressIndex { address: address.to_string(), id });
    id
  }

  /// Adding an edge twice overwrites its weight.
  pub fn add_directed_edge(&mut self, from: VertexId, to: VertexId, weight: f64) {
    debug_assert!(from.index() < self.addresses.len() && to.index() < self.addresses.len());
    if self.edge_weights.insert((from, to), weight).is_none() {
      self.adjacency[from.index()].push(to);
    }
  }

  pub fn add_undirected_edge(&mut self, a: VertexId, b: VertexId, weight: f64) {
    self.add_directed_edge(a, b, weight);
    self.add_directed_edge(b, a, weight);
  }

  pub fn add_undirected_edge_unit(&mut self, a: VertexId, b: VertexId) {
    self.add_undirected_edge(a, b, 1.0);
  }

  #[inline]
  pub fn vertex(&self, address: &str) -> Option<VertexId> {
    self.by_address.get(address).map(|a| a.id)
  }

  #[inline]
  pub fn address(&self, id: VertexId) -> Option<&str> {
    self.addresses.get(id.index()).map(String::as_str)
  }

  #[inline]
  pub fn weight(&self, from: VertexId, to: VertexId) -> Option<f64> {
    self.edge_weights.get(&(from, to)).copied()
  }

  pub fn neighbors(&self, id: VertexId) -> &[VertexId] {
    self.adjacency.get(id.index()).map(Vec::as_slice).unwrap_or(&[])
  }

  pub fn vertices(&self) -> impl Iterator<Item=VertexId> {
    (0..self.addresses.len() as u32).map(VertexId)
  }

  #[inline]
  pub fn vertex_count(&self) -> usize { self.addresses.len() }

  /// Number of directed entries; an undirected edge counts twice.
  #[inline]
  pub fn edge_count(&self) -> usize { self.edge_weights.len() }

  /// Dijkstra from `source`. Weights must be non-negative.
  #[instrument(level="trace", skip(self))]
  pub fn shortest_paths(&self, source: VertexId) -> ShortestPaths {
    let n = self.vertex_count();
    let mut distance = vec![f64::INFINITY; n];
    let mut previous = vec![None; n];
    if let Some(d) = distance.get_mut(source.index()) {
      *d = 0.0;
    }

    let frontier = self.vertices()
      .map(|vertex| Frontier { vertex, distance: distance[vertex.index()] })
      .collect();
    let mut queue = PriorityQueue::heapify(n, frontier, frontier_distance, frontier_vertex);

    while let Some(Frontier { vertex: u, distance: du }) = queue.pop() {
      if du == f64::INFINITY {
        break;
      }
      for &v in self.neighbors(u) {
        let w = match self.weight(u, v) {
          Some(w) => w,
          None => continue,
        };
        let alt = du + w;
        if alt < distance[v.index()] {
          distance[v.index()] = alt;
          previous[v.index()] = Some(u);
          queue.update_priority(Frontier { vertex: v, distance: alt });
        }
      }
    }
    ShortestPaths { source, distance, previous }
  }

  /// Path from `source` to `target` out of a finished computation. Empty if `paths`
  /// was computed from another source or the target is unreachable.
  pub fn reconstruct_path(&self, paths: &ShortestPaths, source: VertexId, target: VertexId) -> Vec<VertexId> {
    if paths.source != source {
      warn!(%source, computed=%paths.source, "shortest paths computed from a different source");
      return Vec::new();
    }
    paths.reconstruct_path(target)
  }
}

#[derive(Debug, Copy, Clone)]
struct Frontier {
  vertex: VertexId,
  distance: f64,
}

fn frontier_vertex(f: &Frontier) -> &VertexId { &f.vertex }
fn frontier_distance(f: &Frontier) -> f64 { f.distance }

/// Result of [`Graph::shortest_paths`]: distances and back-pointers per vertex.
#[derive(Debug, Clone)]
pub struct ShortestPaths {
  source: VertexId,
  distance: Vec<f64>,
  previous: Vec<Option<VertexId>>,
}

impl ShortestPaths {
  #[inline]
  pub fn source(&self) -> VertexId { self.source }

  /// +∞ when unreachable.
  #[inline]
  pub fn distance(&self, target: VertexId) -> f64 {
    self.distance.get(target.index()).copied().unwrap_or(f64::INFINITY)
  }

  #[inline]
  pub fn previous(&self, target: VertexId) -> Option<VertexId> {
    self.previous.get(target.index()).copied().flatten()
  }

  #[inline]
  pub fn is_reachable(&self, target: VertexId) -> bool {
    self.distance(target).is_finite()
  }

  /// Source to `target`, both included, or empty if `target` is unreachable.
  pub fn reconstruct_path(&self, target: VertexId) -> Vec<VertexId> {
    if !self.is_reachable(target) {
      return Vec::new();
    }
    let mut path = vec![target];
    let mut current = target;
    while let Some(prev) = self.previous(current) {
      path.push(prev);
      current = prev;
    }
    path.reverse();
    debug_assert_eq!(path.first(), Some(&self.source));
    path
  }
}

impl FromRaw<MapFeed> for Graph {
  fn from_raw(feed: MapFeed) -> Self {
    let mut graph = Graph::new(feed.addresses.len());
    for address in &feed.addresses {
      graph.add_vertex(address);
    }
    for edge in &feed.edges {
      let from = graph.add_vertex(&edge.from);
      let to = graph.add_vertex(&edge.to);
      graph.add_undirected_edge(from, to, edge.weight);
    }
    debug!(vertices=graph.vertex_count(), edges=graph.edge_count(), "graph built");
    graph
  }
}
