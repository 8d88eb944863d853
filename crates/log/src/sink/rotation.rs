//! Size- and time-based rotation policy

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use time::macros::{format_description, time};
use time::{Duration, OffsetDateTime, Time, UtcOffset};

/// Default size limit of a single log file (10 MiB)
pub const DEFAULT_MAX_SIZE_BYTES: u64 = 10 * 1024 * 1024;

/// When a file is closed and renamed
///
/// The daily boundary is a UTC time of day, matching the UTC timestamps
/// records carry. A deployment that wants local noon sets `daily_at` to
/// local noon expressed in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RotationPolicy {
    /// Rotate before a write would push the file past this size
    pub max_size_bytes: u64,
    /// Rotate once per day at this UTC time of day
    #[serde(with = "time_of_day")]
    pub daily_at: Time,
}

impl Default for RotationPolicy {
    fn default() -> Self {
        Self {
            max_size_bytes: DEFAULT_MAX_SIZE_BYTES,
            daily_at: time!(12:00:00),
        }
    }
}

impl RotationPolicy {
    /// First daily boundary strictly after `after`, in UTC
    pub fn next_rotation(&self, after: OffsetDateTime) -> OffsetDateTime {
        let after = after.to_offset(UtcOffset::UTC);
        let candidate = after.replace_time(self.daily_at);
        if candidate > after {
            candidate
        } else {
            candidate + Duration::DAY
        }
    }

    /// Whether appending `incoming` bytes to a file holding `written` bytes
    /// must rotate first. An empty file never rotates on size.
    pub fn exceeds_size(&self, written: u64, incoming: u64) -> bool {
        written > 0 && written.saturating_add(incoming) > self.max_size_bytes
    }
}

/// Name for `path` once rotated at `at`: `<file>.<YYYYmmdd-HHMMSS>`, with a
/// `.N` suffix when that name is already taken.
pub(crate) fn rotated_path(path: &Path, at: OffsetDateTime) -> PathBuf {
    let stamp = at
        .format(format_description!(
            "[year][month][day]-[hour][minute][second]"
        ))
        .unwrap_or_else(|_| at.unix_timestamp().to_string());
    let file_name = path
        .file_name()
        .map_or_else(|| "log".into(), |name| name.to_string_lossy());

    let base = path.with_file_name(format!("{file_name}.{stamp}"));
    if !base.exists() {
        return base;
    }
    (1u32..)
        .map(|n| path.with_file_name(format!("{file_name}.{stamp}.{n}")))
        .find(|candidate| !candidate.exists())
        .unwrap_or(base)
}

mod time_of_day {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};
    use time::Time;
    use time::macros::format_description;

    pub fn serialize<S: Serializer>(value: &Time, serializer: S) -> Result<S::Ok, S::Error> {
        let text = value
            .format(format_description!("[hour]:[minute]:[second]"))
            .map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&text)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Time, D::Error> {
        let text = String::deserialize(deserializer)?;
        Time::parse(&text, format_description!("[hour]:[minute]:[second]"))
            .map_err(D::Error::custom)
    }
}
