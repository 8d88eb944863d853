//! Severity levels and severity masks
//!
//! Levels are independent bit flags, not a threshold scale: a mask selects an
//! arbitrary subset, so `{debug, error}` is as valid as `{info, warning, error}`.

use std::fmt;
use std::str::FromStr;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::core::LogError;

/// Severity of a single record
///
/// Declaration order is the importance order (`debug` lowest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u16)]
pub enum Severity {
    /// Verbose diagnostic output
    Debug = 1 << 0,
    /// Noteworthy but routine events
    Notification = 1 << 1,
    /// General information
    Info = 1 << 2,
    /// Something unexpected that the module recovered from
    Warning = 1 << 3,
    /// An operation failed
    Error = 1 << 4,
    /// The module cannot continue correctly
    Critical = 1 << 5,
}

impl Severity {
    /// Every level, lowest first
    pub const ALL: [Severity; 6] = [
        Severity::Debug,
        Severity::Notification,
        Severity::Info,
        Severity::Warning,
        Severity::Error,
        Severity::Critical,
    ];

    /// Lowercase tag used in formatted output
    pub const fn as_str(self) -> &'static str {
        match self {
            Severity::Debug => "debug",
            Severity::Notification => "notification",
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
            Severity::Critical => "critical",
        }
    }

    /// ANSI escape used for this level on the console
    pub const fn color(self) -> &'static str {
        match self {
            Severity::Debug => "\x1b[1m\x1b[36m",
            Severity::Notification => "\x1b[1m\x1b[34m",
            Severity::Info => "\x1b[1m\x1b[37m",
            Severity::Warning => "\x1b[1m\x1b[33m",
            Severity::Error | Severity::Critical => "\x1b[1m\x1b[31m",
        }
    }

    /// The single-bit mask for this level
    pub const fn bit(self) -> SeverityMask {
        SeverityMask::from_bits_truncate(self as u16)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debug" => Ok(Severity::Debug),
            "notification" | "notice" => Ok(Severity::Notification),
            "info" => Ok(Severity::Info),
            "warning" | "warn" => Ok(Severity::Warning),
            "error" => Ok(Severity::Error),
            "critical" | "crit" => Ok(Severity::Critical),
            other => Err(LogError::configuration(format!(
                "unknown severity '{other}'"
            ))),
        }
    }
}

bitflags! {
    /// Subset of [`Severity`] levels enabled for a module.
    ///
    /// The empty mask (`SeverityMask::empty()`, also `Default`) is "none".
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct SeverityMask: u16 {
        /// [`Severity::Debug`]
        const DEBUG = 1 << 0;
        /// [`Severity::Notification`]
        const NOTIFICATION = 1 << 1;
        /// [`Severity::Info`]
        const INFO = 1 << 2;
        /// [`Severity::Warning`]
        const WARNING = 1 << 3;
        /// [`Severity::Error`]
        const ERROR = 1 << 4;
        /// [`Severity::Critical`]
        const CRITICAL = 1 << 5;
    }
}

impl SeverityMask {
    /// Mask given to every module when it is first registered
    pub const MODULE_DEFAULT: SeverityMask = SeverityMask::INFO
        .union(SeverityMask::WARNING)
        .union(SeverityMask::ERROR);

    /// Levels admitted by the global aggregator
    pub const AGGREGATED: SeverityMask = SeverityMask::ERROR.union(SeverityMask::CRITICAL);

    /// Whether `level` is set
    pub const fn allows(self, level: Severity) -> bool {
        self.contains(level.bit())
    }

    /// Copy of this mask with `level` set
    pub const fn with(self, level: Severity) -> Self {
        self.union(level.bit())
    }

    /// Copy of this mask with `level` cleared
    pub const fn without(self, level: Severity) -> Self {
        self.difference(level.bit())
    }

    /// Levels present in this mask, lowest first
    pub fn levels(self) -> impl Iterator<Item = Severity> {
        Severity::ALL.into_iter().filter(move |level| self.allows(*level))
    }
}

impl From<Severity> for SeverityMask {
    fn from(level: Severity) -> Self {
        level.bit()
    }
}

impl FromIterator<Severity> for SeverityMask {
    fn from_iter<I: IntoIterator<Item = Severity>>(iter: I) -> Self {
        iter.into_iter()
            .fold(SeverityMask::empty(), |mask, level| mask.with(level))
    }
}

impl fmt::Display for SeverityMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("none");
        }
        let mut first = true;
        for level in self.levels() {
            if !first {
                f.write_str(",")?;
            }
            f.write_str(level.as_str())?;
            first = false;
        }
        Ok(())
    }
}

/// Parses `"info,warning"`, `"error | critical"`, `"all"` or `"none"`
impl FromStr for SeverityMask {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "none" => Ok(SeverityMask::empty()),
            "all" => Ok(SeverityMask::all()),
            list => list
                .split([',', '|'])
                .map(str::parse::<Severity>)
                .collect::<Result<SeverityMask, _>>(),
        }
    }
}
