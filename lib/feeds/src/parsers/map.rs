use anyhow::Context;
use crate::{Error, Result};
use crate::raw::{MapFeed, EdgeRecord};
use super::common::split_row;

/// Parse a distance table. The first line is a header and is skipped. Data row `r`
/// starts with the address and holds the weights to rows `0..=r`; anything past
/// the diagonal is ignored. Non-positive weights mean "no direct road".
pub fn map_feed_from_str(data: &str) -> Result<MapFeed> {
  let mut lines = data.lines().filter(|l| !l.trim().is_empty());
  lines.next();

  let mut addresses: Vec<String> = Vec::new();
  let mut edges = Vec::new();

  for (r, line) in lines.enumerate() {
    let line = line.replace('"', "");
    let cells = split_row(&line).with_context(|| format!("distance row {}", r))?;
    let address = cells[0].to_string();
    let weights = &cells[1..];
    if weights.len() < r {
      return Err(Error::ShortRow { row: r, expected: r, found: weights.len() }.into());
    }

    for (j, cell) in weights.iter().take(r).enumerate() {
      let weight: f64 = cell.parse()
        .with_context(|| format!("distance row {} column {}: bad weight {:?}", r, j, cell))?;
      if weight > 0.0 {
        edges.push(EdgeRecord { from: address.clone(), to: addresses[j].clone(), weight });
      }
    }
    addresses.push(address);
  }

  Ok(MapFeed { addresses, edges })
}

#[cfg(test)]
mod tests {
  use super::*;

  const TRIANGLE: &str = "\
address,hub,a,b
\"Hub (1)\",0
A (2),2.5,0,
B (3), 4.0 ,1.5,0
";

  #[test]
  fn lower_triangle() -> Result<()> {
    let feed = map_feed_from_str(TRIANGLE)?;
    assert_eq!(feed.addresses, vec!["Hub (1)", "A (2)", "B (3)"]);
    assert_eq!(feed.edges.len(), 3);
    assert_eq!(feed.edges[0], EdgeRecord { from: "A (2)".into(), to: "Hub (1)".into(), weight: 2.5 });
    assert_eq!(feed.edges[2], EdgeRecord { from: "B (3)".into(), to: "A (2)".into(), weight: 1.5 });
    Ok(())
  }

  #[test]
  fn zero_weight_is_no_edge() -> Result<()> {
    let feed = map_feed_from_str("h\nX,0\nY,0.0,0\n")?;
    assert_eq!(feed.addresses.len(), 2);
    assert!(feed.edges.is_empty());
    Ok(())
  }

  #[test]
  fn short_row_rejected() {
    let err = map_feed_from_str("h\nX,0\nY,1,0\nZ,1\n").unwrap_err();
    assert!(err.to_string().contains("row 2"));
  }

  #[test]
  fn bad_weight_rejected() {
    assert!(map_feed_from_str("h\nX,0\nY,far,0\n").is_err());
  }
}
