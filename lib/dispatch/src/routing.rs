//! Greedy multi-stop routing: repeatedly travel to the closest required stop,
//! then to the end vertex.
use itertools::Itertools;
use tracing::*;
use crate::Set;
use crate::graph::{Graph, VertexId};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Route {
  /// Every vertex travelled through, starting at the start vertex.
  pub path: Vec<VertexId>,
  /// `false` when some stop or the end vertex was unreachable and the route was cut short.
  pub complete: bool,
}

impl Route {
  /// Sum of edge weights along the path.
  pub fn length(&self, graph: &Graph) -> f64 {
    self.path.iter()
      .tuple_windows()
      .map(|(&u, &v)| graph.weight(u, v).unwrap_or(0.0))
      .sum()
  }
}

#[instrument(level="debug", skip(graph))]
pub fn plan_route(graph: &Graph, start: VertexId, must_visit: &[VertexId], end: VertexId) -> Route {
  let mut seen = Set::default();
  let mut remaining = must_visit.iter()
    .copied()
    .filter(|v| seen.insert(*v))
    .collect_vec();

  let mut path = vec![start];
  let mut current = start;

  while !remaining.is_empty() {
    let paths = graph.shortest_paths(current);
    let mut closest = 0;
    for (i, &v) in remaining.iter().enumerate() {
      if paths.distance(v) < paths.distance(remaining[closest]) {
        closest = i;
      }
    }
    let next = remaining.remove(closest);
    let leg = paths.reconstruct_path(next);
    if leg.is_empty() {
      warn!(from=%current, to=%next, skipped=remaining.len(), "stop unreachable, route cut short");
      return Route { path, complete: false };
    }
    path.extend_from_slice(&leg[1..]);
    current = next;
  }

  let leg = graph.shortest_paths(current).reconstruct_path(end);
  if leg.is_empty() {
    warn!(from=%current, to=%end, "end unreachable, route cut short");
    return Route { path, complete: false };
  }
  path.extend_from_slice(&leg[1..]);
  trace!(?path);
  Route { path, complete: true }
}


#[cfg(test)]
mod tests {
  use super::*;
  use proptest::prelude::*;

  /// A line `0 - 1 - 2 - 3 - 4` with unit weights plus a shortcut `0 - 4` of weight 10.
  fn line() -> (Graph, Vec<VertexId>) {
    let mut g = Graph::new(5);
    let ids = (0..5).map(|i| g.add_vertex(&i.to_string())).collect_vec();
    for (&a, &b) in ids.iter().tuple_windows() {
      g.add_undirected_edge_unit(a, b);
    }
    g.add_undirected_edge(ids[0], ids[4], 10.0);
    (g, ids)
  }

  #[test]
  fn visits_every_stop() {
    crate::init_test_logging(None::<&str>);
    let (g, v) = line();
    let route = plan_route(&g, v[0], &[v[3], v[1], v[3]], v[0]);
    assert!(route.complete);
    assert_eq!(route.path, vec![v[0], v[1], v[2], v[3], v[2], v[1], v[0]]);
    assert_eq!(route.length(&g), 6.0);
  }

  #[test]
  fn closest_first() {
    let (g, v) = line();
    let route = plan_route(&g, v[2], &[v[4], v[1]], v[2]);
    assert!(route.complete);
    assert_eq!(route.path, vec![v[2], v[1], v[2], v[3], v[4], v[3], v[2]]);
  }

  #[test]
  fn no_stops() {
    let (g, v) = line();
    assert_eq!(plan_route(&g, v[1], &[], v[1]).path, vec![v[1]]);
    assert_eq!(plan_route(&g, v[1], &[v[1]], v[3]).path, vec![v[1], v[2], v[3]]);
  }

  #[test]
  fn unreachable_stop_gives_partial_route() {
    let (mut g, v) = line();
    let island = g.add_vertex("island");
    let full = plan_route(&g, v[0], &[v[2], v[4]], v[0]);
    assert!(full.complete);

    let partial = plan_route(&g, v[0], &[v[2], island, v[4]], v[0]);
    assert!(!partial.complete);
    assert_eq!(partial.path.first(), Some(&v[0]));
    assert!(!partial.path.contains(&island));
    assert!(partial.length(&g) <= full.length(&g));

    let stranded = plan_route(&g, v[0], &[v[1]], island);
    assert!(!stranded.complete);
    assert_eq!(stranded.path, vec![v[0], v[1]]);
  }

  /// A random spanning tree plus a few extra edges, so every vertex is reachable.
  fn connected_strategy() -> impl Strategy<Value=(usize, Vec<(usize, usize, u32)>, usize, usize, Vec<usize>)> {
    (2usize..8)
      .prop_flat_map(|n| {
        let tree = proptest::collection::vec((any::<prop::sample::Index>(), 1u32..20), n - 1);
        let extra = proptest::collection::vec((0..n, 0..n, 1u32..20), 0..10);
        let stops = proptest::collection::vec(0..n, 0..5);
        (Just(n), tree, extra, 0..n, 0..n, stops)
      })
      .prop_map(|(n, tree, extra, start, end, stops)| {
        let mut edges = tree.into_iter()
          .enumerate()
          .map(|(i, (parent, w))| (i + 1, parent.index(i + 1), w))
          .collect_vec();
        edges.extend(extra);
        (n, edges, start, end, stops)
      })
  }

  proptest! {
    #[test]
    fn route_covers_every_stop((n, edges, start, end, stops) in connected_strategy()) {
      let mut g = Graph::new(n);
      let ids = (0..n).map(|i| g.add_vertex(&format!("v{}", i))).collect_vec();
      for &(a, b, w) in &edges {
        if a == b { continue; }
        g.add_undirected_edge(ids[a], ids[b], w as f64);
      }
      let must_visit = stops.iter().map(|&i| ids[i]).collect_vec();
      let route = plan_route(&g, ids[start], &must_visit, ids[end]);

      prop_assert!(route.complete);
      prop_assert_eq!(route.path.first(), Some(&ids[start]));
      prop_assert_eq!(route.path.last(), Some(&ids[end]));
      for v in &must_visit {
        prop_assert!(route.path.contains(v));
      }
      for (&u, &v) in route.path.iter().tuple_windows() {
        prop_assert!(g.weight(u, v).is_some());
      }
    }
  }
}
