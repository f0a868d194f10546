use std::fmt;
use tracing::*;
use crate::graph::{Graph, VertexId};
use crate::routing::Route;
use super::ParcelId;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VehicleId(pub u32);

impl fmt::Display for VehicleId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

#[derive(Debug, Clone)]
pub struct Vehicle {
  id: VehicleId,
  location: VertexId,
  /// Distance units per hour.
  speed: f64,
  capacity: usize,
  mileage: f64,
  parcels: Vec<ParcelId>,
  /// Upcoming stops, the next one last.
  destinations: Vec<VertexId>,
  dist_to_next: f64,
  /// Part-way along the edge to the next stop.
  underway: bool,
}

impl Vehicle {
  pub fn new(id: VehicleId, location: VertexId, capacity: usize, speed: f64) -> Self {
    Vehicle {
      id,
      location,
      speed,
      capacity,
      mileage: 0.0,
      parcels: Vec::with_capacity(capacity),
      destinations: Vec::new(),
      dist_to_next: 0.0,
      underway: false,
    }
  }

  #[inline]
  pub fn id(&self) -> VehicleId { self.id }

  #[inline]
  pub fn location(&self) -> VertexId { self.location }

  #[inline]
  pub fn speed(&self) -> f64 { self.speed }

  #[inline]
  pub fn capacity(&self) -> usize { self.capacity }

  #[inline]
  pub fn mileage(&self) -> f64 { self.mileage }

  #[inline]
  pub fn parcels(&self) -> &[ParcelId] { &self.parcels }

  #[inline]
  pub fn next_stop(&self) -> Option<VertexId> { self.destinations.last().copied() }

  /// Remaining stops in visiting order.
  pub fn stops(&self) -> impl Iterator<Item=VertexId> + '_ {
    self.destinations.iter().rev().copied()
  }

  /// Distance left to [`next_stop`](Self::next_stop).
  #[inline]
  pub fn dist_to_next(&self) -> f64 { self.dist_to_next }

  #[inline]
  pub fn is_full(&self) -> bool { self.parcels.len() >= self.capacity }

  #[inline]
  pub fn is_idle(&self) -> bool { self.destinations.is_empty() }

  #[inline]
  pub fn is_underway(&self) -> bool { self.underway }

  /// Where a new route has to start: the far end of the current edge while
  /// underway, the current location otherwise.
  pub fn route_origin(&self) -> VertexId {
    match self.next_stop() {
      Some(next) if self.underway => next,
      _ => self.location,
    }
  }

  /// Returns `false`, leaving the manifest unchanged, when the vehicle is full.
  pub fn add_parcel(&mut self, parcel: ParcelId) -> bool {
    if self.is_full() {
      return false;
    }
    self.parcels.push(parcel);
    true
  }

  /// Keep only the parcels for which `keep` returns `true`.
  pub(crate) fn unload(&mut self, keep: impl FnMut(&ParcelId) -> bool) {
    self.parcels.retain(keep);
  }

  /// Replace the destination stack with `route`, which starts at [`route_origin`](Self::route_origin).
  /// An underway vehicle keeps its next stop and the distance left to it.
  pub fn install_route(&mut self, route: &Route, graph: &Graph) {
    let origin = self.route_origin();
    self.destinations = route.path.iter().rev().copied().collect();
    if self.underway {
      if self.destinations.last() != Some(&origin) {
        self.destinations.push(origin);
      }
      return;
    }
    if self.destinations.last() == Some(&self.location) {
      self.destinations.pop();
    }
    self.refresh_dist_to_next(graph);
  }

  pub(crate) fn refresh_dist_to_next(&mut self, graph: &Graph) {
    self.dist_to_next = match self.next_stop() {
      Some(next) => graph.weight(self.location, next).unwrap_or_else(|| {
        warn!(vehicle=%self.id, from=%self.location, to=%next, "no road to next stop");
        0.0
      }),
      None => 0.0,
    };
  }

  /// Travel the rest of the current edge and pop the stop.
  pub(crate) fn arrive(&mut self) -> Option<VertexId> {
    let next = self.destinations.pop()?;
    self.mileage += self.dist_to_next;
    self.dist_to_next = 0.0;
    self.underway = false;
    self.location = next;
    Some(next)
  }

  /// Cover `distance` of the current edge without reaching its end.
  pub(crate) fn advance(&mut self, distance: f64) {
    self.dist_to_next -= distance;
    self.mileage += distance;
    self.underway = true;
  }
}
