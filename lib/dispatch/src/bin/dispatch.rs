use std::path::PathBuf;
use anyhow::Result;
use structopt::StructOpt;
use tracing::*;

use dispatch::*;
use dispatch::scenario::Scenario;
use dispatch::sim::Simulation;
use feeds::layout::ScenarioDir;
use feeds::time::{format_clock, parse_clock};

mod common;
use common::*;

fn parse_clock_arg(s: &str) -> Result<Minutes, String> {
  parse_clock(s).map_err(|e| e.to_string())
}

#[derive(Debug, StructOpt)]
struct ClArgs {
    /// Directory holding map.csv, parcels.csv and scenario.json. Relative paths are
    /// looked up under DATA_ROOT when it is set.
    #[structopt(parse(from_os_str))]
    scenario: PathBuf,
    /// Minutes per simulation tick.
    #[structopt(long, validator=clap_range_validator(Some(0.01f64), None))]
    tick: Option<f64>,
    /// Start of the day, e.g. "08:00:00 AM".
    #[structopt(long, parse(try_from_str=parse_clock_arg))]
    start: Option<Minutes>,
    /// End of the day, e.g. "05:00:00 PM".
    #[structopt(long, parse(try_from_str=parse_clock_arg))]
    end: Option<Minutes>,
    /// Log a status snapshot every this many simulated minutes.
    #[structopt(long="checkpoint-every", short="c", validator=clap_range_validator(Some(1u32), None))]
    checkpoint_every: Option<u32>,
    #[structopt(flatten)]
    output: OutputOptions,
}

fn log_status(sim: &Simulation) {
  info!(
    clock=%format_clock(sim.clock()),
    delivered=sim.delivered_count(),
    pending=sim.pending_at_hub().len(),
    "checkpoint"
  );
  for v in sim.vehicles() {
    info!(
      vehicle=%v.id(),
      location=sim.graph().address(v.location()).unwrap_or_default(),
      mileage=v.mileage(),
      aboard=v.parcels().len()
    );
  }
}

fn main() -> Result<()> {
    let args : ClArgs = StructOpt::from_args();
    let _g = init_logging(args.output.log.clone())?;
    debug!(?args);

    let dir = ScenarioDir::open(&args.scenario)?;
    let mut scenario = Scenario::load(&dir)?;
    if let Some(tick) = args.tick {
        scenario.config.tick = tick;
    }
    if let Some(start) = args.start {
        scenario.config.start = start;
    }
    if let Some(end) = args.end {
        scenario.config.end = end;
    }
    let mut sim = scenario.into_simulation()?;

    match args.checkpoint_every {
        Some(every) => sim.run(&mut |sim: &Simulation| {
            log_status(sim);
            sim.clock() + every as Minutes
        }),
        None => sim.run_to_end(),
    }
    log_status(&sim);

    output_report(&args.output, &sim)?;
    Ok(())
}
