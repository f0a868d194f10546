//! Scenario configuration (`scenario.json`) and assembly of a [`Simulation`] from a
//! scenario directory.
//!
//! ```json
//! {
//!   "hub": "4001 South 700 East (84107)",
//!   "tick": 5, "start": "08:00:00 AM", "end": "05:00:00 PM",
//!   "vehicles": [{"id": 1, "capacity": 16, "speed": 18}],
//!   "held": [6, 25],
//!   "assign": [{"vehicle": 1, "parcels": [13, 14]}],
//!   "events": [
//!     {"kind": "release", "from": "09:05:00 AM", "to": "09:10:00 AM", "parcels": [6, 25]},
//!     {"kind": "recall", "from": "09:00:00 AM", "to": "09:05:00 AM", "vehicle": 1}
//!   ]
//! }
//! ```
use anyhow::{anyhow, bail, Context, Result};
use json::JsonValue;
use tracing::*;
use feeds::layout::ScenarioDir;
use feeds::raw::FromRaw;
use feeds::time::{parse_clock, END_OF_DAY};
use crate::Minutes;
use crate::graph::Graph;
use crate::sim::*;

pub const DEFAULT_TICK: Minutes = 5.0;
pub const DEFAULT_START: &str = "08:00:00 AM";

#[derive(Debug, Clone, PartialEq)]
pub struct VehicleSpec {
  pub id: VehicleId,
  pub capacity: usize,
  /// Distance units per hour.
  pub speed: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioConfig {
  /// Address of the hub vertex.
  pub hub: String,
  /// Fleet order is the loading and stepping order.
  pub vehicles: Vec<VehicleSpec>,
  pub tick: Minutes,
  pub start: Minutes,
  pub end: Minutes,
  /// Parcels that are not at the hub when the day starts.
  pub held: Vec<ParcelId>,
  /// Parcels put on a vehicle before the first load.
  pub assign: Vec<(VehicleId, Vec<ParcelId>)>,
  pub events: Vec<ManagementEvent>,
}

impl Default for ScenarioConfig {
  fn default() -> Self {
    ScenarioConfig {
      hub: String::new(),
      vehicles: Vec::new(),
      tick: DEFAULT_TICK,
      start: 8.0 * 60.0,
      end: 17.0 * 60.0,
      held: Vec::new(),
      assign: Vec::new(),
      events: Vec::new(),
    }
  }
}

fn get_str<'a>(v: &'a JsonValue, key: &str) -> Result<&'a str> {
  v[key].as_str().ok_or_else(|| anyhow!("`{}` must be a string", key))
}

fn get_u32(v: &JsonValue, key: &str) -> Result<u32> {
  v[key].as_u32().ok_or_else(|| anyhow!("`{}` must be a non-negative integer", key))
}

fn get_f64(v: &JsonValue, key: &str) -> Result<f64> {
  v[key].as_f64().ok_or_else(|| anyhow!("`{}` must be a number", key))
}

/// A clock string, or a number of minutes.
fn get_clock(v: &JsonValue, key: &str) -> Result<Minutes> {
  let field = &v[key];
  if let Some(minutes) = field.as_f64() {
    return Ok(minutes);
  }
  let s = field.as_str().ok_or_else(|| anyhow!("`{}` must be a clock time", key))?;
  parse_clock(s).with_context(|| format!("bad `{}`", key))
}

fn get_ids(v: &JsonValue, key: &str) -> Result<Vec<ParcelId>> {
  let field = &v[key];
  if !field.is_array() {
    bail!("`{}` must be a list of parcel ids", key);
  }
  field.members()
    .map(|id| id.as_u32().map(ParcelId).ok_or_else(|| anyhow!("`{}` holds a non-integer id: {}", key, id)))
    .collect()
}

fn parse_vehicle(v: &JsonValue) -> Result<VehicleSpec> {
  Ok(VehicleSpec {
    id: VehicleId(get_u32(v, "id")?),
    capacity: get_u32(v, "capacity")? as usize,
    speed: get_f64(v, "speed")?,
  })
}

fn parse_event(v: &JsonValue) -> Result<ManagementEvent> {
  let window = TimeWindow::new(get_clock(v, "from")?, get_clock(v, "to")?);
  let action = match get_str(v, "kind")? {
    "release" => EventAction::Release { parcels: get_ids(v, "parcels")? },
    "correct_address" => EventAction::CorrectAddress {
      parcel: ParcelId(get_u32(v, "parcel")?),
      address: get_str(v, "address")?.to_string(),
      city: get_str(v, "city")?.to_string(),
      state: get_str(v, "state")?.to_string(),
      zip: get_str(v, "zip")?.to_string(),
    },
    "change_deadline" => EventAction::ChangeDeadline {
      parcel: ParcelId(get_u32(v, "parcel")?),
      deadline: get_clock(v, "deadline")?,
    },
    "recall" => EventAction::Recall { vehicle: VehicleId(get_u32(v, "vehicle")?) },
    other => bail!("unknown event kind {:?}", other),
  };
  Ok(ManagementEvent::new(window, action))
}

impl ScenarioConfig {
  /// Missing timing fields fall back to the defaults; `hub` and `vehicles` are required.
  pub fn from_json(text: &str) -> Result<ScenarioConfig> {
    let root = json::parse(text)?;
    let mut config = ScenarioConfig::default();
    config.hub = get_str(&root, "hub")?.to_string();

    if !root["tick"].is_null() {
      config.tick = get_f64(&root, "tick")?;
    }
    config.start = if root["start"].is_null() { parse_clock(DEFAULT_START)? } else { get_clock(&root, "start")? };
    config.end = if root["end"].is_null() { parse_clock(END_OF_DAY)? } else { get_clock(&root, "end")? };

    if !root["vehicles"].is_array() {
      bail!("`vehicles` must be a list");
    }
    for (k, v) in root["vehicles"].members().enumerate() {
      let spec = parse_vehicle(v).with_context(|| format!("vehicle entry {}", k))?;
      trace!(?spec);
      config.vehicles.push(spec);
    }

    if !root["held"].is_null() {
      config.held = get_ids(&root, "held")?;
    }
    for (k, a) in root["assign"].members().enumerate() {
      let vehicle = VehicleId(get_u32(a, "vehicle").with_context(|| format!("assign entry {}", k))?);
      config.assign.push((vehicle, get_ids(a, "parcels")?));
    }
    for (k, e) in root["events"].members().enumerate() {
      config.events.push(parse_event(e).with_context(|| format!("event {}", k))?);
    }
    Ok(config)
  }
}

/// Everything read from a scenario directory, before validation.
#[derive(Debug, Clone)]
pub struct Scenario {
  pub name: String,
  pub config: ScenarioConfig,
  pub graph: Graph,
  pub parcels: Vec<Parcel>,
}

impl Scenario {
  #[instrument(level="info", skip(dir), fields(dir=?dir.path()))]
  pub fn load(dir: &ScenarioDir) -> Result<Scenario> {
    let text = dir.load_config_text()?;
    let config = ScenarioConfig::from_json(&text)
      .with_context(|| format!("failed to parse {:?}", dir.path().join(feeds::layout::CONFIG_FILE)))?;
    let graph = Graph::from_raw(dir.load_map()?);
    let parcels: Vec<_> = dir.load_parcels()?.into_iter().map(Parcel::from_raw).collect();
    info!(vertices=graph.vertex_count(), parcels=parcels.len(), vehicles=config.vehicles.len(), "scenario loaded");
    Ok(Scenario { name: dir.name(), config, graph, parcels })
  }

  pub fn into_simulation(self) -> Result<Simulation> {
    let name = self.name;
    Simulation::new(self.graph, self.parcels, &self.config)
      .with_context(|| format!("invalid scenario {}", name))
  }
}
