use tracing::*;
use feeds::time::format_clock;
use crate::{Error, Minutes};
use crate::collections::{HashTable, PriorityQueue};
use crate::graph::{Graph, VertexId};
use crate::routing::plan_route;
use crate::scenario::ScenarioConfig;
use super::parcel::parcel_key;
use super::{EventAction, ManagementEvent, Parcel, ParcelId, ParcelStatus, Vehicle, VehicleId};

/// A parcel waiting at the hub.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Pending {
  pub parcel: ParcelId,
  pub deadline: Minutes,
}

fn pending_parcel(p: &Pending) -> &ParcelId { &p.parcel }

/// Earliest deadline first, lower id on ties.
fn urgency(p: &Pending) -> (Minutes, ParcelId) { (p.deadline, p.parcel) }

/// Pause point of [`Simulation::run`].
pub trait Checkpoint {
  /// Called when the clock reaches the current mark. Returns the next mark.
  fn pause(&mut self, sim: &Simulation) -> Minutes;
}

impl<F> Checkpoint for F where F: FnMut(&Simulation) -> Minutes {
  fn pause(&mut self, sim: &Simulation) -> Minutes { self(sim) }
}

#[derive(Debug)]
pub struct Simulation {
  graph: Graph,
  hub: VertexId,
  parcels: HashTable<Parcel, ParcelId>,
  /// Sorted.
  parcel_ids: Vec<ParcelId>,
  pending: PriorityQueue<Pending, (Minutes, ParcelId), ParcelId>,
  vehicles: Vec<Vehicle>,
  events: Vec<ManagementEvent>,
  clock: Minutes,
  tick: Minutes,
  end: Minutes,
}

impl Simulation {
  /// Validate `config` against the map and parcel set, put every vehicle at the hub,
  /// apply holds and preassignments, then load the fleet in order.
  pub fn new(graph: Graph, parcels: Vec<Parcel>, config: &ScenarioConfig) -> Result<Simulation, Error> {
    if !(config.tick > 0.0) {
      return Err(Error::InvalidParameter(format!("tick must be positive, got {}", config.tick)));
    }
    if !(config.start <= config.end) {
      return Err(Error::InvalidParameter(format!(
        "day ends at {} before it starts at {}", format_clock(config.end), format_clock(config.start))));
    }
    let hub = graph.vertex(&config.hub).ok_or_else(|| Error::UnknownAddress(config.hub.clone()))?;

    let mut vehicles: Vec<Vehicle> = Vec::with_capacity(config.vehicles.len());
    for spec in &config.vehicles {
      if spec.capacity == 0 || !(spec.speed > 0.0) {
        return Err(Error::InvalidParameter(format!(
          "vehicle {} needs positive capacity and speed (got {} and {})", spec.id, spec.capacity, spec.speed)));
      }
      if vehicles.iter().any(|v| v.id() == spec.id) {
        return Err(Error::InvalidParameter(format!("vehicle {} listed twice", spec.id)));
      }
      vehicles.push(Vehicle::new(spec.id, hub, spec.capacity, spec.speed));
    }

    let mut table = HashTable::new(parcels.len(), parcel_key);
    let mut parcel_ids = Vec::with_capacity(parcels.len());
    for parcel in parcels {
      if table.contains_key(&parcel.id()) {
        return Err(Error::InvalidParameter(format!("parcel {} listed twice", parcel.id())));
      }
      parcel_ids.push(parcel.id());
      table.add(parcel);
    }
    parcel_ids.sort();

    let mut sim = Simulation {
      pending: PriorityQueue::new(parcel_ids.len(), urgency, pending_parcel),
      graph,
      hub,
      parcels: table,
      parcel_ids,
      vehicles,
      events: config.events.clone(),
      clock: config.start,
      tick: config.tick,
      end: config.end,
    };

    for event in &sim.events {
      match &event.action {
        EventAction::Release { parcels } => {
          for &id in parcels {
            sim.check_parcel(id)?;
          }
        }
        EventAction::CorrectAddress { parcel, .. } | EventAction::ChangeDeadline { parcel, .. } =>
          sim.check_parcel(*parcel)?,
        EventAction::Recall { vehicle } => {
          sim.vehicle_index(*vehicle).ok_or(Error::UnknownVehicle(*vehicle))?;
        }
      }
    }

    for &id in &config.held {
      sim.parcels.get_mut(&id).ok_or(Error::UnknownParcel(id))?.status = ParcelStatus::ShippingToHub;
    }

    for (vehicle, ids) in &config.assign {
      let index = sim.vehicle_index(*vehicle).ok_or(Error::UnknownVehicle(*vehicle))?;
      for &id in ids {
        let parcel = sim.parcels.get_mut(&id).ok_or(Error::UnknownParcel(id))?;
        if parcel.status == ParcelStatus::OutForDelivery {
          return Err(Error::InvalidParameter(format!("parcel {} assigned twice", id)));
        }
        if !sim.vehicles[index].add_parcel(id) {
          return Err(Error::InvalidParameter(format!("vehicle {} is full, cannot take parcel {}", vehicle, id)));
        }
        parcel.status = ParcelStatus::OutForDelivery;
      }
    }

    for id in &sim.parcel_ids {
      if let Some(parcel) = sim.parcels.get(id) {
        if parcel.status == ParcelStatus::ArrivedAtHub {
          sim.pending.push(Pending { parcel: *id, deadline: parcel.deadline });
        }
      }
    }

    info!(
      vehicles=sim.vehicles.len(),
      parcels=sim.parcel_ids.len(),
      pending=sim.pending.len(),
      start=%format_clock(sim.clock),
      "simulation ready"
    );
    let fleet: Vec<usize> = (0..sim.vehicles.len()).collect();
    let start = sim.clock;
    sim.load(&fleet, start);
    Ok(sim)
  }

  fn check_parcel(&self, id: ParcelId) -> Result<(), Error> {
    if self.parcels.contains_key(&id) { Ok(()) } else { Err(Error::UnknownParcel(id)) }
  }

  #[inline]
  fn vehicle_index(&self, id: VehicleId) -> Option<usize> {
    self.vehicles.iter().position(|v| v.id() == id)
  }

  #[inline]
  pub fn clock(&self) -> Minutes { self.clock }

  #[inline]
  pub fn tick(&self) -> Minutes { self.tick }

  #[inline]
  pub fn end(&self) -> Minutes { self.end }

  #[inline]
  pub fn is_finished(&self) -> bool { self.clock >= self.end }

  #[inline]
  pub fn hub(&self) -> VertexId { self.hub }

  #[inline]
  pub fn graph(&self) -> &Graph { &self.graph }

  pub fn parcel(&self, id: ParcelId) -> Option<&Parcel> { self.parcels.get(&id) }

  /// Every parcel in id order.
  pub fn parcels(&self) -> impl Iterator<Item=&Parcel> + '_ {
    self.parcel_ids.iter().filter_map(move |id| self.parcels.get(id))
  }

  #[inline]
  pub fn vehicles(&self) -> &[Vehicle] { &self.vehicles }

  pub fn vehicle(&self, id: VehicleId) -> Option<&Vehicle> {
    self.vehicles.iter().find(|v| v.id() == id)
  }

  /// Parcels waiting at the hub, in queue (heap) order.
  #[inline]
  pub fn pending_at_hub(&self) -> &[Pending] { self.pending.as_slice() }

  pub fn count_status(&self, status: ParcelStatus) -> usize {
    self.parcels.iter().filter(|p| p.status == status).count()
  }

  pub fn delivered_count(&self) -> usize {
    self.parcels.iter().filter(|p| p.status.is_delivered()).count()
  }

  pub fn total_mileage(&self) -> f64 {
    self.vehicles.iter().map(Vehicle::mileage).sum()
  }

  /// Fill each vehicle from the hub queue in the given order, then re-plan its route.
  /// Vehicles that are not standing at the hub are left as they are.
  pub fn load_vehicles(&mut self, ids: &[VehicleId]) -> Result<(), Error> {
    let indices = ids.iter()
      .map(|&id| self.vehicle_index(id).ok_or(Error::UnknownVehicle(id)))
      .collect::<Result<Vec<_>, _>>()?;
    let now = self.clock;
    self.load(&indices, now);
    Ok(())
  }

  #[instrument(level="debug", name="load_vehicles", skip(self))]
  fn load(&mut self, indices: &[usize], time: Minutes) {
    for &index in indices {
      let vehicle = &mut self.vehicles[index];
      if vehicle.location() != self.hub || vehicle.is_underway() {
        debug!(vehicle=%vehicle.id(), "not at the hub, skipped");
        continue;
      }
      while !vehicle.is_full() {
        let next = match self.pending.pop() {
          Some(next) => next,
          None => break,
        };
        vehicle.add_parcel(next.parcel);
        if let Some(parcel) = self.parcels.get_mut(&next.parcel) {
          parcel.status = ParcelStatus::OutForDelivery;
        }
        trace!(vehicle=%vehicle.id(), parcel=%next.parcel, "loaded");
      }
      // parcels addressed to the hub itself
      self.deliver_at(index, time);
      self.plan_vehicle(index, false);
    }
  }

  /// Route the vehicle over its parcels' destinations, ending at the hub. With
  /// `via_hub` the hub is also a required stop.
  fn plan_vehicle(&mut self, index: usize, via_hub: bool) {
    let Simulation { graph, parcels, vehicles, hub, .. } = self;
    let vehicle = &mut vehicles[index];
    let mut stops = Vec::with_capacity(vehicle.parcels().len() + 1);
    for id in vehicle.parcels() {
      let parcel = match parcels.get(id) {
        Some(p) => p,
        None => continue,
      };
      match graph.vertex(parcel.destination_key()) {
        Some(v) => stops.push(v),
        None => warn!(vehicle=%vehicle.id(), parcel=%id, destination=parcel.destination_key(), "destination is not on the map"),
      }
    }
    if via_hub {
      stops.push(*hub);
    }
    let route = plan_route(graph, vehicle.route_origin(), &stops, *hub);
    debug!(
      vehicle=%vehicle.id(),
      parcels=vehicle.parcels().len(),
      length=route.length(graph),
      complete=route.complete,
      "route planned"
    );
    vehicle.install_route(&route, graph);
  }

  fn route_to_hub(&mut self, index: usize) {
    let route = plan_route(&self.graph, self.vehicles[index].route_origin(), &[], self.hub);
    debug!(vehicle=%self.vehicles[index].id(), length=route.length(&self.graph), "returning to hub");
    self.vehicles[index].install_route(&route, &self.graph);
  }

  /// Hand over every parcel aboard addressed to the vehicle's location.
  fn deliver_at(&mut self, index: usize, time: Minutes) {
    let Simulation { graph, parcels, vehicles, .. } = self;
    let vehicle = &mut vehicles[index];
    let here = match graph.address(vehicle.location()) {
      Some(a) => a,
      None => return,
    };
    let vehicle_id = vehicle.id();
    vehicle.unload(|id| match parcels.get_mut(id) {
      Some(parcel) if parcel.destination_key() == here => {
        parcel.deliver(time);
        info!(vehicle=%vehicle_id, parcel=%id, time=%format_clock(time), status=%parcel.status, "delivered");
        false
      }
      _ => true,
    });
  }

  /// Move a held parcel into the hub queue.
  fn release(&mut self, id: ParcelId) -> bool {
    let parcel = match self.parcels.get_mut(&id) {
      Some(p) if p.status == ParcelStatus::ShippingToHub => p,
      _ => {
        debug!(parcel=%id, "not held, nothing to release");
        return false;
      }
    };
    parcel.status = ParcelStatus::ArrivedAtHub;
    self.pending.push(Pending { parcel: id, deadline: parcel.deadline });
    true
  }

  fn apply_hub_events(&mut self, now: Minutes) {
    for i in 0..self.events.len() {
      if !self.events[i].action.at_hub() {
        continue;
      }
      let action = match self.events[i].fire(now) {
        Some(action) => action,
        None => continue,
      };
      info!(time=%format_clock(now), ?action, "management event");
      match action {
        EventAction::Release { parcels } => {
          for id in parcels {
            self.release(id);
          }
        }
        EventAction::CorrectAddress { parcel, address, city, state, zip } => {
          let aboard = match self.parcels.get_mut(&parcel) {
            Some(p) => {
              p.correct_address(&address, &city, &state, &zip);
              p.status == ParcelStatus::OutForDelivery
            }
            None => false,
          };
          if !aboard {
            self.release(parcel);
          } else if let Some(index) = self.vehicles.iter().position(|v| v.parcels().contains(&parcel)) {
            debug!(vehicle=%self.vehicles[index].id(), %parcel, "re-routing for corrected address");
            if !self.vehicles[index].is_underway() {
              self.deliver_at(index, now);
            }
            self.plan_vehicle(index, false);
          }
        }
        EventAction::ChangeDeadline { parcel, deadline } => {
          if let Some(p) = self.parcels.get_mut(&parcel) {
            p.deadline = deadline;
          }
          self.pending.update_priority(Pending { parcel, deadline });
        }
        EventAction::Recall { .. } => {}
      }
    }
  }

  fn apply_vehicle_events(&mut self, index: usize, time: Minutes) {
    let id = self.vehicles[index].id();
    let mut recalled = false;
    for event in self.events.iter_mut() {
      if let EventAction::Recall { vehicle } = event.action {
        if vehicle == id && event.fire(time).is_some() {
          recalled = true;
        }
      }
    }
    if recalled {
      info!(vehicle=%id, time=%format_clock(time), "recalled to hub");
      self.plan_vehicle(index, true);
    }
  }

  /// Drive one vehicle from `start` until `boundary` or until it runs out of stops.
  fn advance_vehicle(&mut self, index: usize, start: Minutes, boundary: Minutes) {
    let mut t = start;
    while t < boundary {
      let vehicle = &mut self.vehicles[index];
      if vehicle.is_idle() {
        break;
      }
      let travel = vehicle.dist_to_next() * 60.0 / vehicle.speed();

      if t + travel < boundary {
        t += travel;
        let here = match vehicle.arrive() {
          Some(v) => v,
          None => break,
        };
        trace!(vehicle=%vehicle.id(), at=?self.graph.address(here), time=%format_clock(t), "arrived");

        self.deliver_at(index, t);
        self.apply_vehicle_events(index, t);
        if here == self.hub && !self.pending.is_empty() {
          self.load(&[index], t);
        }

        let vehicle = &mut self.vehicles[index];
        if !vehicle.is_idle() {
          vehicle.refresh_dist_to_next(&self.graph);
        } else if here != self.hub {
          self.route_to_hub(index);
        } else if !self.pending.is_empty() {
          self.load(&[index], t);
        }
      } else {
        let covered = (boundary - t) * vehicle.speed() / 60.0;
        vehicle.advance(covered);
        t = boundary;
      }
    }
  }

  /// Advance the whole fleet by one tick.
  #[instrument(level="debug", skip(self), fields(clock=%format_clock(self.clock)))]
  pub fn step(&mut self) {
    let now = self.clock;
    self.apply_hub_events(now);
    let boundary = (now + self.tick).min(self.end);

    for index in 0..self.vehicles.len() {
      self.advance_vehicle(index, now, boundary);
      let vehicle = &self.vehicles[index];
      if vehicle.is_idle() && vehicle.location() == self.hub && !vehicle.is_full() && !self.pending.is_empty() {
        self.load(&[index], now);
      }
    }
    self.clock = now + self.tick;
  }

  /// Step until the end of the day, consulting `checkpoint` whenever the clock
  /// reaches the mark it last returned.
  pub fn run<C: Checkpoint + ?Sized>(&mut self, checkpoint: &mut C) {
    let mut run_until = self.clock;
    while !self.is_finished() {
      if self.clock >= run_until {
        run_until = checkpoint.pause(self);
      }
      self.step();
    }
    info!(
      clock=%format_clock(self.clock),
      delivered=self.delivered_count(),
      late=self.count_status(ParcelStatus::DeliveredLate),
      mileage=self.total_mileage(),
      "day over"
    );
  }

  pub fn run_to_end(&mut self) {
    self.run(&mut |_: &Simulation| f64::INFINITY);
  }
}


#[cfg(test)]
mod tests {
  use super::*;
  use crate::scenario::VehicleSpec;
  use crate::sim::TimeWindow;

  const HUB: &str = "Hub (0)";

  /// Hub - A 1, A - C 5, Hub - B 2.
  fn map() -> Graph {
    let mut g = Graph::new(4);
    let hub = g.add_vertex(HUB);
    let a = g.add_vertex("A (1)");
    let b = g.add_vertex("B (2)");
    let c = g.add_vertex("C (3)");
    g.add_undirected_edge(hub, a, 1.0);
    g.add_undirected_edge(a, c, 5.0);
    g.add_undirected_edge(hub, b, 2.0);
    g
  }

  fn parcel(id: u32, street: &str, zip: &str, deadline: Minutes) -> Parcel {
    Parcel::new(ParcelId(id), street, "City", "UT", zip, deadline)
  }

  fn fleet(specs: &[(u32, usize)]) -> Vec<VehicleSpec> {
    specs.iter()
      .map(|&(id, capacity)| VehicleSpec { id: VehicleId(id), capacity, speed: 18.0 })
      .collect()
  }

  fn config(vehicles: Vec<VehicleSpec>) -> ScenarioConfig {
    ScenarioConfig { hub: HUB.to_string(), vehicles, ..ScenarioConfig::default() }
  }

  fn vertex(sim: &Simulation, address: &str) -> VertexId {
    sim.graph().vertex(address).unwrap()
  }

  #[test]
  fn six_parcels_one_address() {
    crate::init_test_logging(None::<&str>);
    let parcels = (1..=6).map(|id| parcel(id, "A", "1", 600.0)).collect();
    let mut sim = Simulation::new(map(), parcels, &config(fleet(&[(1, 16), (2, 16)]))).unwrap();
    assert_eq!(sim.vehicles()[0].parcels().len(), 6);
    assert!(sim.vehicles()[1].is_idle());
    assert_eq!(sim.count_status(ParcelStatus::OutForDelivery), 6);

    sim.run_to_end();
    assert_eq!(sim.count_status(ParcelStatus::OutForDelivery), 0);
    for p in sim.parcels() {
      assert!(p.status.is_delivered());
      assert_eq!(p.delivered_at, Some(480.0 + 60.0 / 18.0));
      assert_eq!(p.status, ParcelStatus::DeliveredOnTime);
    }
    let v = &sim.vehicles()[0];
    assert_eq!(v.location(), sim.hub());
    assert!((v.mileage() - 2.0).abs() < 1e-9);
    assert!((sim.total_mileage() - 2.0).abs() < 1e-9);
    assert_eq!(sim.clock(), 1020.0);
  }

  #[test]
  fn most_urgent_loaded_first_then_reload() {
    let parcels = vec![
      parcel(1, "B", "2", 900.0),
      parcel(2, "A", "1", 540.0),
      parcel(3, "C", "3", 700.0),
      parcel(4, "B", "2", 530.0),
      parcel(5, "A", "1", 1000.0),
    ];
    let mut sim = Simulation::new(map(), parcels, &config(fleet(&[(1, 2)]))).unwrap();
    let mut aboard = sim.vehicles()[0].parcels().to_vec();
    aboard.sort();
    assert_eq!(aboard, vec![ParcelId(2), ParcelId(4)]);
    assert_eq!(sim.pending_at_hub().len(), 3);
    assert_eq!(sim.pending_at_hub()[0].parcel, ParcelId(3));

    sim.run_to_end();
    assert!(sim.pending_at_hub().is_empty());
    assert_eq!(sim.delivered_count(), 5);
    assert!(sim.parcels().all(|p| p.delivered_at.is_some()));
  }

  #[test]
  fn recall_collects_released_parcel() {
    crate::init_test_logging(None::<&str>);
    let mut cfg = config(fleet(&[(1, 4)]));
    cfg.held = vec![ParcelId(7)];
    cfg.events = vec![
      ManagementEvent::new(TimeWindow::new(480.0, 490.0), EventAction::Recall { vehicle: VehicleId(1) }),
      ManagementEvent::new(TimeWindow::new(485.0, 490.0), EventAction::Release { parcels: vec![ParcelId(7)] }),
    ];
    let parcels = vec![parcel(1, "C", "3", 1020.0), parcel(7, "B", "2", 1020.0)];
    let mut sim = Simulation::new(map(), parcels, &cfg).unwrap();
    assert_eq!(sim.parcel(ParcelId(7)).unwrap().status, ParcelStatus::ShippingToHub);

    sim.step();
    let v = &sim.vehicles()[0];
    assert_eq!(v.location(), vertex(&sim, "A (1)"));
    assert_eq!(v.next_stop(), Some(sim.hub()));
    assert!(sim.events[0].fired());
    assert!(!sim.events[1].fired());

    sim.step();
    let v = &sim.vehicles()[0];
    assert_eq!(sim.parcel(ParcelId(7)).unwrap().status, ParcelStatus::OutForDelivery);
    assert!(v.parcels().contains(&ParcelId(7)));
    assert_eq!(v.next_stop(), Some(vertex(&sim, "B (2)")));

    sim.run_to_end();
    assert_eq!(sim.delivered_count(), 2);
    assert!(sim.events.iter().all(|e| e.fired()));
  }

  #[test]
  fn corrected_address_is_delivered() {
    let mut cfg = config(fleet(&[(1, 4)]));
    cfg.held = vec![ParcelId(9)];
    cfg.events = vec![ManagementEvent::new(
      TimeWindow::new(500.0, 505.0),
      EventAction::CorrectAddress {
        parcel: ParcelId(9),
        address: "C".into(),
        city: "City".into(),
        state: "UT".into(),
        zip: "3".into(),
      },
    )];
    let parcels = vec![parcel(9, "Wrong", "0", 1020.0)];
    let mut sim = Simulation::new(map(), parcels, &cfg).unwrap();
    while sim.clock() < 500.0 {
      sim.step();
    }
    assert_eq!(sim.parcel(ParcelId(9)).unwrap().status, ParcelStatus::ShippingToHub);
    sim.step();
    assert_eq!(sim.parcel(ParcelId(9)).unwrap().destination_key(), "C (3)");
    sim.run_to_end();
    let p = sim.parcel(ParcelId(9)).unwrap();
    assert_eq!(p.status, ParcelStatus::DeliveredOnTime);
  }

  #[test]
  fn hub_parcel_delivered_on_load() {
    let parcels = vec![parcel(1, "Hub", "0", 600.0), parcel(2, "A", "1", 600.0)];
    let mut sim = Simulation::new(map(), parcels, &config(fleet(&[(1, 4)]))).unwrap();
    let p = sim.parcel(ParcelId(1)).unwrap();
    assert_eq!(p.status, ParcelStatus::DeliveredOnTime);
    assert_eq!(p.delivered_at, Some(480.0));
    assert_eq!(sim.vehicles()[0].parcels(), &[ParcelId(2)]);

    sim.run_to_end();
    assert_eq!(sim.delivered_count(), 2);
    assert!(sim.vehicles()[0].parcels().is_empty());
  }

  #[test]
  fn correction_of_loaded_parcel_reroutes_vehicle() {
    let mut cfg = config(fleet(&[(1, 4)]));
    cfg.events = vec![ManagementEvent::new(
      TimeWindow::new(480.0, 485.0),
      EventAction::CorrectAddress {
        parcel: ParcelId(1),
        address: "C".into(),
        city: "City".into(),
        state: "UT".into(),
        zip: "3".into(),
      },
    )];
    let mut sim = Simulation::new(map(), vec![parcel(1, "A", "1", 1020.0)], &cfg).unwrap();
    assert_eq!(sim.parcel(ParcelId(1)).unwrap().status, ParcelStatus::OutForDelivery);

    sim.step();
    let c = vertex(&sim, "C (3)");
    assert!(sim.vehicles()[0].stops().any(|v| v == c));

    sim.run_to_end();
    let p = sim.parcel(ParcelId(1)).unwrap();
    assert_eq!(p.destination_key(), "C (3)");
    assert_eq!(p.status, ParcelStatus::DeliveredOnTime);
    assert!((p.delivered_at.unwrap() - 500.0).abs() < 1e-6);
    assert!(sim.vehicles()[0].parcels().is_empty());
    assert!((sim.total_mileage() - 12.0).abs() < 1e-9);
  }

  #[test]
  fn loading_skips_vehicle_between_stops() {
    let mut sim = Simulation::new(map(), vec![parcel(1, "C", "3", 1020.0)], &config(fleet(&[(1, 4)]))).unwrap();
    sim.step();
    let (dist, next) = {
      let v = &sim.vehicles()[0];
      assert!(v.is_underway());
      assert_eq!(v.location(), vertex(&sim, "A (1)"));
      assert!((v.dist_to_next() - 4.5).abs() < 1e-9);
      (v.dist_to_next(), v.next_stop())
    };

    assert_eq!(sim.load_vehicles(&[VehicleId(1)]), Ok(()));
    let v = &sim.vehicles()[0];
    assert_eq!(v.dist_to_next(), dist);
    assert_eq!(v.next_stop(), next);

    sim.run_to_end();
    assert_eq!(sim.delivered_count(), 1);
    assert!((sim.total_mileage() - 12.0).abs() < 1e-9);
  }

  #[test]
  fn deadline_change_reorders_queue() {
    let mut cfg = config(fleet(&[(1, 1)]));
    cfg.events = vec![ManagementEvent::new(
      TimeWindow::new(480.0, 485.0),
      EventAction::ChangeDeadline { parcel: ParcelId(3), deadline: 500.0 },
    )];
    let parcels = vec![parcel(3, "A", "1", 900.0), parcel(4, "B", "2", 600.0), parcel(5, "A", "1", 700.0)];
    let mut sim = Simulation::new(map(), parcels, &cfg).unwrap();
    assert_eq!(sim.vehicles()[0].parcels(), &[ParcelId(4)]);
    assert_eq!(sim.pending_at_hub()[0].parcel, ParcelId(5));

    sim.step();
    assert_eq!(sim.pending_at_hub()[0], Pending { parcel: ParcelId(3), deadline: 500.0 });
    assert_eq!(sim.parcel(ParcelId(3)).unwrap().deadline, 500.0);
  }

  #[test]
  fn preassigned_parcels_stay_on_their_vehicle() {
    let mut cfg = config(fleet(&[(1, 16), (2, 16)]));
    cfg.assign = vec![(VehicleId(2), vec![ParcelId(2), ParcelId(3)])];
    let parcels = (1..=4).map(|id| parcel(id, "B", "2", 800.0)).collect();
    let mut sim = Simulation::new(map(), parcels, &cfg).unwrap();
    assert_eq!(sim.vehicle(VehicleId(1)).unwrap().parcels(), &[ParcelId(1), ParcelId(4)]);
    assert_eq!(sim.vehicle(VehicleId(2)).unwrap().parcels(), &[ParcelId(2), ParcelId(3)]);
    sim.run_to_end();
    assert_eq!(sim.delivered_count(), 4);
  }

  #[test]
  fn off_map_parcel_stays_aboard() {
    let parcels = vec![parcel(1, "Ghost", "5", 600.0), parcel(2, "A", "1", 600.0)];
    let mut sim = Simulation::new(map(), parcels, &config(fleet(&[(1, 4)]))).unwrap();
    sim.run_to_end();
    assert_eq!(sim.parcel(ParcelId(1)).unwrap().status, ParcelStatus::OutForDelivery);
    assert_eq!(sim.parcel(ParcelId(2)).unwrap().status, ParcelStatus::DeliveredOnTime);
    assert_eq!(sim.vehicles()[0].location(), sim.hub());
  }

  #[test]
  fn checkpoint_marks() {
    let mut cfg = config(fleet(&[(1, 4)]));
    cfg.end = 720.0;
    let mut sim = Simulation::new(map(), Vec::new(), &cfg).unwrap();
    let mut marks = Vec::new();
    sim.run(&mut |sim: &Simulation| {
      marks.push(sim.clock());
      sim.clock() + 60.0
    });
    assert_eq!(marks, vec![480.0, 540.0, 600.0, 660.0]);
    assert!(sim.is_finished());
  }

  #[test]
  fn invalid_configuration() {
    let parcels = || vec![parcel(1, "A", "1", 600.0)];

    let mut cfg = config(fleet(&[(1, 4)]));
    cfg.hub = "Nowhere (0)".into();
    assert_eq!(Simulation::new(map(), parcels(), &cfg).unwrap_err(), Error::UnknownAddress("Nowhere (0)".into()));

    let mut cfg = config(fleet(&[(1, 4)]));
    cfg.vehicles[0].speed = 0.0;
    assert!(matches!(Simulation::new(map(), parcels(), &cfg), Err(Error::InvalidParameter(_))));

    let mut cfg = config(fleet(&[(1, 4)]));
    cfg.tick = 0.0;
    assert!(matches!(Simulation::new(map(), parcels(), &cfg), Err(Error::InvalidParameter(_))));

    let mut cfg = config(fleet(&[(1, 4)]));
    cfg.held = vec![ParcelId(99)];
    assert_eq!(Simulation::new(map(), parcels(), &cfg).unwrap_err(), Error::UnknownParcel(ParcelId(99)));

    let mut cfg = config(fleet(&[(1, 4)]));
    cfg.events = vec![ManagementEvent::new(TimeWindow::new(0.0, 1.0), EventAction::Recall { vehicle: VehicleId(5) })];
    assert_eq!(Simulation::new(map(), parcels(), &cfg).unwrap_err(), Error::UnknownVehicle(VehicleId(5)));

    let mut cfg = config(fleet(&[(1, 1)]));
    cfg.assign = vec![(VehicleId(1), vec![ParcelId(1), ParcelId(1)])];
    assert!(matches!(Simulation::new(map(), parcels(), &cfg), Err(Error::InvalidParameter(_))));

    let mut sim = Simulation::new(map(), parcels(), &config(fleet(&[(1, 4)]))).unwrap();
    assert_eq!(sim.load_vehicles(&[VehicleId(3)]), Err(Error::UnknownVehicle(VehicleId(3))));
    assert_eq!(sim.load_vehicles(&[VehicleId(1)]), Ok(()));
  }
}
