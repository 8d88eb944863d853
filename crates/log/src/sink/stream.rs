//! Stream-backed destination (stderr by default)

use std::io::{self, Write};

use parking_lot::Mutex;

use super::{Destination, RouteFilter};
use crate::format::Formatter;
use crate::record::Record;

/// Writes formatted records to a byte stream
pub struct StreamDestination {
    filter: RouteFilter,
    formatter: Formatter,
    auto_flush: bool,
    stream: Mutex<Box<dyn Write + Send>>,
}

impl StreamDestination {
    /// Wrap an arbitrary stream
    pub fn new(
        stream: Box<dyn Write + Send>,
        filter: RouteFilter,
        formatter: Formatter,
        auto_flush: bool,
    ) -> Self {
        Self {
            filter,
            formatter,
            auto_flush,
            stream: Mutex::new(stream),
        }
    }

    /// Console mirror on stderr
    pub fn stderr(filter: RouteFilter, formatter: Formatter, auto_flush: bool) -> Self {
        Self::new(Box::new(io::stderr()), filter, formatter, auto_flush)
    }
}

impl Destination for StreamDestination {
    fn accept(&self, record: &Record) -> bool {
        self.filter.admits(record)
    }

    fn write(&self, record: &Record) -> io::Result<()> {
        let line = self.formatter.format(record);
        let mut stream = self.stream.lock();
        stream.write_all(line.as_bytes())?;
        if self.auto_flush {
            stream.flush()?;
        }
        Ok(())
    }

    fn flush(&self) -> io::Result<()> {
        self.stream.lock().flush()
    }
}

impl std::fmt::Debug for StreamDestination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamDestination")
            .field("filter", &self.filter)
            .field("formatter", &self.formatter)
            .finish_non_exhaustive()
    }
}
