pub use anyhow::Result;

use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub enum Error {
    MissingFile(PathBuf),
    ShortRow { row: usize, expected: usize, found: usize },
    MissingField { line: usize, field: &'static str },
    BadClock(String),
}


impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::MissingFile(p) => write!(f, "missing scenario file {:?}", p),
            Error::ShortRow { row, expected, found } =>
                write!(f, "distance row {} has {} weights, expected at least {}", row, found, expected),
            Error::MissingField { line, field } => write!(f, "line {}: missing field `{}`", line, field),
            Error::BadClock(s) => write!(f, "not a clock time: {:?}", s),
        }
    }
}

impl std::error::Error for Error {}


pub mod layout;
pub mod raw;
pub mod time;

mod parsers;
pub use parsers::{ParseFeed, MapCsv, ParcelCsv, map_feed_from_str, parcel_feed_from_str};
