use std::fmt;
use std::path::Path;
use fnv::{FnvHashMap, FnvHashSet};

pub mod collections;
pub mod graph;
pub mod routing;
pub mod sim;
pub mod scenario;
pub mod report;

pub use feeds::time::Minutes;
use sim::{ParcelId, VehicleId};

pub type Map<K, V> = FnvHashMap<K, V>;
pub type Set<T> = FnvHashSet<T>;


/// Failures when assembling a simulation from configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    UnknownVehicle(VehicleId),
    UnknownParcel(ParcelId),
    UnknownAddress(String),
    InvalidParameter(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnknownVehicle(v) => write!(f, "no vehicle with id {}", v),
            Error::UnknownParcel(p) => write!(f, "no parcel with id {}", p),
            Error::UnknownAddress(a) => write!(f, "address {:?} is not on the map", a),
            Error::InvalidParameter(msg) => write!(f, "invalid parameter: {}", msg),
        }
    }
}

impl std::error::Error for Error {}


mod logging_setup {
    use super::*;
    use anyhow::Context;
    use tracing_subscriber::{EnvFilter, fmt, registry, prelude::*};
    use tracing_appender::{non_blocking, non_blocking::WorkerGuard};
    use std::fs::OpenOptions;

    fn build_and_set_global_subscriber<P>(logfile: Option<P>, is_test : bool) -> anyhow::Result<Option<WorkerGuard>> where
        P : AsRef<Path>
    {
        let stderr_log = fmt::layer().with_writer(std::io::stderr);
        let env_filter = EnvFilter::from_default_env();
        let r = registry().with(stderr_log).with(env_filter);

        let flush_guard = match logfile {
            Some(p) => {
                let p = p.as_ref();
                let logfile = OpenOptions::new()
                    .create(true)
                    .write(true)
                    .truncate(true)
                    .open(p)
                    .with_context(|| format!("failed to open log file {:?}", p))?;
                let (writer, _guard) = non_blocking::NonBlockingBuilder::default()
                    .lossy(false)
                    .finish(logfile);
                let json = fmt::layer()
                    .json()
                    .with_span_list(true)
                    .with_current_span(false)
                    .with_writer(writer);

                let r = r.with(json);
                if is_test { r.try_init().ok(); }
                else { r.init(); }
                Some(_guard)
            },
            None => {
                if is_test { r.try_init().ok(); }
                else { r.init(); }
                None
            }
        };
        Ok(flush_guard)
    }

    /// Install the global subscriber: `RUST_LOG`-filtered text on stderr, plus JSON
    /// lines in `logfile` if given. Keep the guard alive until exit.
    pub fn init_logging(logfile: Option<impl AsRef<Path>>) -> anyhow::Result<Option<WorkerGuard>> {
        build_and_set_global_subscriber(logfile, false)
    }

    #[allow(dead_code)]
    pub(crate) fn init_test_logging(logfile: Option<impl AsRef<Path>>) -> Option<WorkerGuard> {
        build_and_set_global_subscriber(logfile, true).ok().flatten()
    }
}
pub use logging_setup::*;
