//! Time-windowed management events. Each fires at most once, at the first check
//! that falls inside its window.
use crate::Minutes;
use super::{ParcelId, VehicleId};

/// Inclusive on both ends.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TimeWindow {
  pub from: Minutes,
  pub to: Minutes,
}

impl TimeWindow {
  pub fn new(from: Minutes, to: Minutes) -> Self { TimeWindow { from, to } }

  #[inline]
  pub fn contains(&self, t: Minutes) -> bool { self.from <= t && t <= self.to }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EventAction {
  /// Held parcels arrive at the hub.
  Release { parcels: Vec<ParcelId> },
  /// New destination for a parcel, released to the hub if it is still held.
  CorrectAddress { parcel: ParcelId, address: String, city: String, state: String, zip: String },
  ChangeDeadline { parcel: ParcelId, deadline: Minutes },
  /// Send a vehicle back through the hub at its next arrival.
  Recall { vehicle: VehicleId },
}

impl EventAction {
  /// Hub events are checked once per tick, the rest at vehicle arrivals.
  #[inline]
  pub fn at_hub(&self) -> bool {
    !matches!(self, EventAction::Recall { .. })
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ManagementEvent {
  pub window: TimeWindow,
  pub action: EventAction,
  fired: bool,
}

impl ManagementEvent {
  pub fn new(window: TimeWindow, action: EventAction) -> Self {
    ManagementEvent { window, action, fired: false }
  }

  #[inline]
  pub fn fired(&self) -> bool { self.fired }

  #[inline]
  pub fn is_due(&self, t: Minutes) -> bool { !self.fired && self.window.contains(t) }

  /// Marks the event fired and returns its action, or `None` if it is not due at `t`.
  pub(crate) fn fire(&mut self, t: Minutes) -> Option<EventAction> {
    if !self.is_due(t) {
      return None;
    }
    self.fired = true;
    Some(self.action.clone())
  }
}
