//! Destinations and the backend that opens them
//!
//! The routing engine never writes bytes itself. It describes each destination
//! with a [`DestinationSpec`] and asks a [`SinkBackend`] to open it; the
//! returned [`Destination`] owns its handle and evaluates its own filter for
//! every record.

mod file;
mod rotation;
mod stream;

use std::fmt;
use std::io;
use std::path::PathBuf;

pub use file::FileDestination;
pub use rotation::{DEFAULT_MAX_SIZE_BYTES, RotationPolicy};
pub use stream::StreamDestination;

use crate::format::Formatter;
use crate::module::ModuleId;
use crate::record::Record;
use crate::severity::{Severity, SeverityMask};

/// An open destination
pub trait Destination: Send + Sync {
    /// Whether `record` passes this destination's filter
    fn accept(&self, record: &Record) -> bool;

    /// Format and append `record`
    fn write(&self, record: &Record) -> io::Result<()>;

    /// Push buffered output to the underlying handle
    fn flush(&self) -> io::Result<()> {
        Ok(())
    }
}

/// Where a destination writes
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Target {
    /// Append to a file
    File(PathBuf),
    /// Mirror to the operator's console
    Console,
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::File(path) => write!(f, "{}", path.display()),
            Target::Console => f.write_str("<console>"),
        }
    }
}

/// Admission predicate of a destination
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteFilter {
    /// Per-module file: records on `channel` whose level is in `mask`, plus
    /// every `critical` record regardless of channel or mask
    Module {
        /// Identity of the owning module
        channel: ModuleId,
        /// Levels enabled for the module
        mask: SeverityMask,
    },
    /// Any channel, levels in the mask
    Severities(SeverityMask),
    /// Everything
    All,
}

impl RouteFilter {
    /// Evaluate the predicate
    pub fn admits(&self, record: &Record) -> bool {
        match self {
            RouteFilter::Module { channel, mask } => {
                (record.channel() == channel.as_str() && mask.allows(record.severity()))
                    || record.severity() == Severity::Critical
            }
            RouteFilter::Severities(mask) => mask.allows(record.severity()),
            RouteFilter::All => true,
        }
    }
}

/// Everything a backend needs to open one destination
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestinationSpec {
    /// Path or stream
    pub target: Target,
    /// Admission predicate
    pub filter: RouteFilter,
    /// Rotation policy, for file targets
    pub rotation: Option<RotationPolicy>,
    /// Line formatter
    pub formatter: Formatter,
    /// Flush after every record
    pub auto_flush: bool,
}

/// Opens destinations from their descriptors
pub trait SinkBackend: Send + Sync {
    /// Open the destination described by `spec`
    fn open(&self, spec: &DestinationSpec) -> io::Result<Box<dyn Destination>>;
}

/// Files on the local filesystem, console on stderr
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardBackend;

impl SinkBackend for StandardBackend {
    fn open(&self, spec: &DestinationSpec) -> io::Result<Box<dyn Destination>> {
        match &spec.target {
            Target::File(path) => Ok(Box::new(FileDestination::open(
                path.clone(),
                spec.filter.clone(),
                spec.formatter,
                spec.rotation,
                spec.auto_flush,
            )?)),
            Target::Console => Ok(Box::new(StreamDestination::stderr(
                spec.filter.clone(),
                spec.formatter,
                spec.auto_flush,
            ))),
        }
    }
}
