use super::nom_prelude::*;

pub fn u32_<'a, E>(input: &'a str) -> IResult<&'a str, u32, E>
  where
    E: ParseError<&'a str> + FromExternalError<&'a str, ParseIntError>
{
  map_res(digit1, u32::from_str)(input)
}

/// A single comma-free cell, surrounding whitespace removed.
pub fn cell<'a, E>(input: &'a str) -> IResult<&'a str, &'a str, E>
  where
    E: ParseError<&'a str>
{
  map(take_till(|c| c == ','), str::trim)(input)
}

pub fn row<'a, E>(input: &'a str) -> IResult<&'a str, Vec<&'a str>, E>
  where
    E: ParseError<&'a str>
{
  separated_list1(char(','), cell)(input)
}

/// Split a CSV line into trimmed cells. Quoting is not supported; quote characters
/// must be stripped by the caller beforehand.
pub fn split_row(line: &str) -> crate::Result<Vec<&str>> {
  match row::<error::Error<&str>>(line).finish() {
    Ok((_, cells)) => Ok(cells),
    Err(e) => Err(anyhow::Error::msg(e.to_string())),
  }
}
