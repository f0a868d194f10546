use std::path::Path;
use anyhow::Context;
use crate::Result;
use crate::raw::{MapFeed, ParcelRecord};

mod map;
pub use map::map_feed_from_str;

mod parcels;
pub use parcels::parcel_feed_from_str;

pub(crate) mod clock;

mod nom_prelude {
  pub use nom::{
    IResult,
    error::{
      self,
      ParseError,
      FromExternalError,
    },
    sequence::*,
    multi::*,
    combinator::*,
    branch::alt,
    character::complete::*,
    bytes::complete::{tag, take_till},
    Finish,
  };
  pub use std::str::FromStr;
  pub use std::num::ParseIntError;
}

mod common;

pub trait ParseFeed<Fmt>: Sized {
  fn parse(inputs: Fmt) -> Result<Self>;
}

/// Lower-triangular distance table, one row per address.
#[derive(Debug, Copy, Clone)]
pub struct MapCsv<P>(pub P);

/// One parcel per line: `id,address,city,state,zip,deadline,mass,notes...`
#[derive(Debug, Copy, Clone)]
pub struct ParcelCsv<P>(pub P);

impl<P: AsRef<Path>> ParseFeed<MapCsv<P>> for MapFeed {
  fn parse(path: MapCsv<P>) -> Result<MapFeed> {
    let path = path.0.as_ref();
    let data = std::fs::read_to_string(path).with_context(|| format!("failed to read {:?}", path))?;
    map_feed_from_str(&data).with_context(|| format!("failed to parse {:?}", path))
  }
}

impl<P: AsRef<Path>> ParseFeed<ParcelCsv<P>> for Vec<ParcelRecord> {
  fn parse(path: ParcelCsv<P>) -> Result<Vec<ParcelRecord>> {
    let path = path.0.as_ref();
    let data = std::fs::read_to_string(path).with_context(|| format!("failed to read {:?}", path))?;
    parcel_feed_from_str(&data).with_context(|| format!("failed to parse {:?}", path))
  }
}
