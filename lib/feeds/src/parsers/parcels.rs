use anyhow::Context;
use itertools::Itertools;
use crate::{Error, Result};
use crate::raw::ParcelRecord;
use crate::time::parse_clock;
use super::common::split_row;

const REQUIRED_FIELDS: [&str; 7] = ["id", "address", "city", "state", "zip", "deadline", "mass"];

/// Parse one parcel per non-blank line. Any fields past the eighth belong to the
/// free-text notes, which may themselves contain commas.
pub fn parcel_feed_from_str(data: &str) -> Result<Vec<ParcelRecord>> {
  let mut records = Vec::new();
  for (k, line) in data.lines().enumerate() {
    let line = line.trim();
    if line.is_empty() {
      continue;
    }
    let line = line.replace('"', "");
    let cells = split_row(&line).with_context(|| format!("parcel line {}", k + 1))?;
    if cells.len() < REQUIRED_FIELDS.len() {
      return Err(Error::MissingField { line: k + 1, field: REQUIRED_FIELDS[cells.len()] }.into());
    }

    let id: u32 = cells[0].parse().with_context(|| format!("line {}: bad parcel id {:?}", k + 1, cells[0]))?;
    let deadline = parse_clock(cells[5]).with_context(|| format!("line {}: bad deadline", k + 1))?;
    let mass: u32 = cells[6].parse().with_context(|| format!("line {}: bad mass {:?}", k + 1, cells[6]))?;

    records.push(ParcelRecord {
      id,
      address: cells[1].to_string(),
      city: cells[2].to_string(),
      state: cells[3].to_string(),
      zip: cells[4].to_string(),
      deadline,
      mass,
      notes: cells[7..].iter().join(", "),
    });
  }
  Ok(records)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn notes_with_commas_are_joined() -> Result<()> {
    let data = "\
1,195 W Oakland Ave,Salt Lake City,UT,84115,10:30:00 AM,21,
6,3060 Lester St,West Valley City,UT,84119,10:30:00 AM,88,\"Delayed on flight, will not arrive until 9:05 am\"

9,300 State St,Salt Lake City,UT,84103,EOD,2,Wrong address listed
";
    let parcels = parcel_feed_from_str(data)?;
    assert_eq!(parcels.len(), 3);
    assert_eq!(parcels[0].notes, "");
    assert_eq!(parcels[0].deadline, 630.0);
    assert_eq!(parcels[1].notes, "Delayed on flight, will not arrive until 9:05 am");
    assert_eq!(parcels[2].deadline, 1020.0);
    assert_eq!(parcels[2].zip, "84103");
    Ok(())
  }

  #[test]
  fn seven_fields_is_enough() -> Result<()> {
    let parcels = parcel_feed_from_str("4,Main St,Town,UT,84000,EOD,3")?;
    assert_eq!(parcels[0].mass, 3);
    assert!(parcels[0].notes.is_empty());
    Ok(())
  }

  #[test]
  fn missing_fields_rejected() {
    let err = parcel_feed_from_str("4,Main St,Town,UT").unwrap_err();
    assert!(err.to_string().contains("zip"));
  }

  #[test]
  fn bad_id_rejected() {
    assert!(parcel_feed_from_str("x,Main St,Town,UT,84000,EOD,3,").is_err());
  }
}
