use super::nom_prelude::*;
use super::common::u32_;

/// `HH:MM:SS AM|PM` -> (hour, minute, is_pm)
pub fn clock(input: &str) -> IResult<&str, (u32, u32, bool)> {
  let (input, (hour, _, minute, _, _seconds, _, half)) = tuple((
    verify(u32_, |h: &u32| *h <= 12),
    char(':'),
    verify(u32_, |m: &u32| *m < 60),
    char(':'),
    verify(u32_, |s: &u32| *s < 60),
    space1,
    alt((tag("AM"), tag("PM"))),
  ))(input)?;
  let (input, _) = eof(input)?;
  Ok((input, (hour, minute, half == "PM")))
}
