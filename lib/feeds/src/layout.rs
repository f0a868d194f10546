use std::path::{Path, PathBuf};
use anyhow::{Context, Result};
use crate::Error;
use crate::parsers::{ParseFeed, MapCsv, ParcelCsv};
use crate::raw::{MapFeed, ParcelRecord};

pub const MAP_FILE: &str = "map.csv";
pub const PARCEL_FILE: &str = "parcels.csv";
pub const CONFIG_FILE: &str = "scenario.json";

/// A scenario directory: `map.csv`, `parcels.csv` and `scenario.json` side by side.
#[derive(Debug, Clone)]
pub struct ScenarioDir {
  dir: PathBuf,
}

impl ScenarioDir {
  pub fn open(dir: impl AsRef<Path>) -> Result<ScenarioDir> {
    let dir = dir.as_ref();
    let ctx = format!("try read directory {:?}", &dir);
    let dir = dir.canonicalize().context(ctx)?;

    for file in &[MAP_FILE, PARCEL_FILE, CONFIG_FILE] {
      let p = dir.join(file);
      if !p.is_file() {
        return Err(Error::MissingFile(p).into());
      }
    }
    Ok(ScenarioDir { dir })
  }

  pub fn path(&self) -> &Path { &self.dir }

  pub fn name(&self) -> String {
    self.dir.file_name()
      .map(|n| n.to_string_lossy().into_owned())
      .unwrap_or_default()
  }

  pub fn load_map(&self) -> Result<MapFeed> {
    MapFeed::parse(MapCsv(self.dir.join(MAP_FILE)))
  }

  pub fn load_parcels(&self) -> Result<Vec<ParcelRecord>> {
    Vec::<ParcelRecord>::parse(ParcelCsv(self.dir.join(PARCEL_FILE)))
  }

  pub fn load_config_text(&self) -> Result<String> {
    let p = self.dir.join(CONFIG_FILE);
    std::fs::read_to_string(&p).with_context(|| format!("failed to read {:?}", p))
  }
}
