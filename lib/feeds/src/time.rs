//! Conversion between `HH:MM:SS AM` clock strings and minutes from the start of the day.
use crate::{Error, Result};
use crate::parsers::clock;
use nom::Finish;

pub type Minutes = f64;

/// Deadline alias used by the parcel feed for "end of day".
pub const EOD: &str = "EOD";
pub const END_OF_DAY: &str = "05:00:00 PM";

/// Parse a clock string such as `10:30:00 AM` into minutes since midnight.
/// Seconds are accepted but ignored.
pub fn parse_clock(s: &str) -> Result<Minutes> {
  let s = s.trim();
  let s = if s == EOD { END_OF_DAY } else { s };
  match clock::clock(s).finish() {
    Ok((_, (hour, minute, pm))) => {
      let pm_offset = if pm { 12 * 60 } else { 0 };
      Ok(((hour % 12) * 60 + minute + pm_offset) as Minutes)
    }
    Err(_) => Err(Error::BadClock(s.to_string()).into()),
  }
}

pub fn format_clock(minutes: Minutes) -> String {
  let total = minutes.max(0.0) as u64;
  let mut hours = total / 60;
  let suffix = if hours < 12 { "AM" } else { "PM" };
  if hours > 12 {
    hours %= 12;
  }
  format!("{:02}:{:02}:00 {}", hours, total % 60, suffix)
}
