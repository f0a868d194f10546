use std::io::Write;
use std::str::FromStr;
use anyhow::Result;
use itertools::Itertools;
use feeds::time::format_clock;
use crate::sim::{ParcelStatus, Simulation};

pub const OUTPUT_FORMAT_STRINGS: [&str; 2] = ["json", "json-summ"];

#[derive(Debug, Copy, Clone)]
pub enum OutputFormat {
    Json,
    JsonSummary,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        return match s {
            "json" => Ok(Self::Json),
            "json-summ" => Ok(Self::JsonSummary),
            _ => Err(format!("invalid string: {}", s))
        };
    }
}

impl Default for OutputFormat {
  fn default() -> Self { OutputFormat::JsonSummary }
}


pub trait Report {
    fn write_json(&self, buf : impl Write) -> Result<()>;
    fn write_json_summary(&self, buf : impl Write) -> Result<()>;

    fn write(&self, buf : impl Write, output : OutputFormat) -> Result<()> {
        match output {
            OutputFormat::JsonSummary => self.write_json_summary(buf)?,
            OutputFormat::Json => self.write_json(buf)?,
        };
        Ok(())
    }
}

fn round2(x: f64) -> f64 { (x * 100.0).round() / 100.0 }

impl Report for Simulation {
    fn write_json(&self, mut buf: impl Write) -> Result<()> {
        let parcels: json::JsonValue = self.parcels()
            .map(|p| json::object! {
                id: p.id().0,
                status: p.status.to_string(),
                address: p.address(),
                city: p.city.as_str(),
                state: p.state.as_str(),
                zip: p.zip(),
                deadline: format_clock(p.deadline),
                delivered_at: p.delivered_at.map(format_clock),
                mass: p.mass,
                notes: p.notes.as_str(),
            })
            .collect_vec()
            .into();

        let vehicles: json::JsonValue = self.vehicles().iter()
            .map(|v| json::object! {
                id: v.id().0,
                location: self.graph().address(v.location()).unwrap_or_default(),
                mileage: round2(v.mileage()),
                parcels: v.parcels().iter().map(|p| p.0).collect_vec(),
            })
            .collect_vec()
            .into();

        let root = json::object! {
            clock: format_clock(self.clock()),
            parcels: parcels,
            vehicles: vehicles,
        };
        root.write_pretty(&mut buf, 2)?;
        return Ok(())
    }

    fn write_json_summary(&self, mut buf : impl Write) -> Result<()> {
        let mut root = json::object! {
            clock: format_clock(self.clock()),
            total_mileage: round2(self.total_mileage()),
        };
        for &status in ParcelStatus::ALL.iter() {
            root[status.key()] = self.count_status(status).into();
        }
        root["late"] = self.parcels()
            .filter(|p| p.status == ParcelStatus::DeliveredLate)
            .map(|p| p.id().0)
            .collect_vec()
            .into();
        root.write_pretty(&mut buf, 2)?;
        return Ok(())
    }
}
