use std::fmt::Display;
use std::str::FromStr;
use std::path::PathBuf;
use anyhow::{Context, Result};
use structopt::StructOpt;
use dispatch::report::{OutputFormat, Report, OUTPUT_FORMAT_STRINGS};

#[derive(Clone, Debug, StructOpt)]
pub struct OutputOptions {
  #[structopt(long="format", short="f", parse(try_from_str), default_value="json-summ", possible_values=&OUTPUT_FORMAT_STRINGS)]
  pub fmt: OutputFormat,
  #[structopt(long="output", short="o")]
  pub file: Option<PathBuf>,
  #[structopt(long)]
  pub log: Option<PathBuf>,
}

pub fn clap_range_validator<T>(minval: Option<T>, maxval: Option<T>) -> impl Fn(String) -> Result<(), String>
    where
        T: FromStr + PartialOrd + Display + Copy,
        T::Err: Display
{
    return move |val| {
        let x: T = val.parse().map_err(|e: T::Err| e.to_string())?;
        if let Some(y) = minval {
            if x < y { return Err(format!("must be at least {}", y)); }
        }
        if let Some(y) = maxval {
            if x > y { return Err(format!("must be at most {}", y)); }
        }
        return Ok(());
    };
}

pub fn output_report(options: &OutputOptions, report: &impl Report) -> Result<()> {
  match options.file.as_ref() {
      Some(path) => {
        let file = std::fs::File::create(path).with_context(|| format!("failed to create {:?}", path))?;
        report.write(std::io::BufWriter::new(file), options.fmt)?;
      }
      None => {
        report.write(std::io::stdout(), options.fmt)?;
      }
    }
  Ok(())
}
