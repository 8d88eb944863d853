//! Rotating file destination

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use time::OffsetDateTime;

use super::rotation::{RotationPolicy, rotated_path};
use super::{Destination, RouteFilter};
use crate::format::Formatter;
use crate::record::Record;

/// Appends formatted records to a file, rotating by size and time of day.
///
/// Rotation is evaluated against the timestamp of the record being written.
pub struct FileDestination {
    path: PathBuf,
    filter: RouteFilter,
    formatter: Formatter,
    rotation: Option<RotationPolicy>,
    auto_flush: bool,
    state: Mutex<FileState>,
}

struct FileState {
    /// `None` after a rotation whose reopen failed; the next write retries.
    writer: Option<BufWriter<File>>,
    written: u64,
    next_rotation: Option<OffsetDateTime>,
}

impl FileDestination {
    /// Open (or create) `path` in append mode
    pub fn open(
        path: impl Into<PathBuf>,
        filter: RouteFilter,
        formatter: Formatter,
        rotation: Option<RotationPolicy>,
        auto_flush: bool,
    ) -> io::Result<Self> {
        let path = path.into();
        let (writer, written) = open_append(&path)?;
        let next_rotation = rotation.map(|policy| policy.next_rotation(OffsetDateTime::now_utc()));

        Ok(Self {
            path,
            filter,
            formatter,
            rotation,
            auto_flush,
            state: Mutex::new(FileState {
                writer: Some(writer),
                written,
                next_rotation,
            }),
        })
    }

    /// Path of the active file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn rotate(&self, state: &mut FileState, at: OffsetDateTime) -> io::Result<()> {
        if let Some(writer) = state.writer.as_mut() {
            writer.flush()?;
        }
        let rotated = rotated_path(&self.path, at);
        match fs::rename(&self.path, &rotated) {
            Ok(()) => tracing::debug!(
                path = %self.path.display(),
                rotated = %rotated.display(),
                "Log file rotated"
            ),
            // Removed from under us; start a fresh file at the same path.
            Err(error) if error.kind() == io::ErrorKind::NotFound => {}
            Err(error) => return Err(error),
        }

        state.writer = None;
        state.written = 0;
        self.reopen(state)
    }

    fn reopen(&self, state: &mut FileState) -> io::Result<()> {
        let (writer, written) = open_append(&self.path)?;
        state.writer = Some(writer);
        state.written = written;
        Ok(())
    }
}

impl Destination for FileDestination {
    fn accept(&self, record: &Record) -> bool {
        self.filter.admits(record)
    }

    fn write(&self, record: &Record) -> io::Result<()> {
        let line = self.formatter.format(record);
        let incoming = line.len() as u64;
        let at = record.timestamp();

        let mut state = self.state.lock();
        if let Some(policy) = self.rotation {
            let due = state.next_rotation.is_some_and(|boundary| at >= boundary);
            if due {
                if state.written > 0 {
                    self.rotate(&mut state, at)?;
                }
                state.next_rotation = Some(policy.next_rotation(at));
            } else if policy.exceeds_size(state.written, incoming) {
                self.rotate(&mut state, at)?;
            }
        }

        if state.writer.is_none() {
            self.reopen(&mut state)?;
        }
        if let Some(writer) = state.writer.as_mut() {
            writer.write_all(line.as_bytes())?;
            if self.auto_flush {
                writer.flush()?;
            }
        }
        state.written += incoming;
        Ok(())
    }

    fn flush(&self) -> io::Result<()> {
        match self.state.lock().writer.as_mut() {
            Some(writer) => writer.flush(),
            None => Ok(()),
        }
    }
}

impl std::fmt::Debug for FileDestination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileDestination")
            .field("path", &self.path)
            .field("filter", &self.filter)
            .field("auto_flush", &self.auto_flush)
            .finish_non_exhaustive()
    }
}

fn open_append(path: &Path) -> io::Result<(BufWriter<File>, u64)> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let written = file.metadata()?.len();
    Ok((BufWriter::new(file), written))
}
