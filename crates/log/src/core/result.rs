//! Extension trait for tagging IO results with their origin

use std::io;
use std::path::Path;

use crate::core::error::{LogError, LogResult};

/// Extension trait for `io::Result`
pub trait IoResultExt<T> {
    /// Convert to [`LogError::BackendIo`] naming the failing destination
    fn for_destination(self, target: impl std::fmt::Display) -> LogResult<T>;

    /// Convert to [`LogError::LogDirectory`] naming the failing directory
    fn for_log_dir(self, path: &Path) -> LogResult<T>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn for_destination(self, target: impl std::fmt::Display) -> LogResult<T> {
        self.map_err(|source| LogError::BackendIo {
            target: target.to_string(),
            source,
        })
    }

    fn for_log_dir(self, path: &Path) -> LogResult<T> {
        self.map_err(|source| LogError::LogDirectory {
            path: path.to_path_buf(),
            source,
        })
    }
}
