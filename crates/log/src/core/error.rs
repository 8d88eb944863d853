//! Error and warning types for the router
//!
//! Fatal conditions abort the operation that raised them and leave the
//! installed routing untouched. Warnings never abort; they are collected in a
//! [`RoutingReport`](crate::RoutingReport) and also emitted through `tracing`.

use std::io;
use std::path::PathBuf;

/// Result alias for router operations
pub type LogResult<T> = Result<T, LogError>;

/// Fatal router errors
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum LogError {
    /// Module list is empty, contains duplicates, or was never loaded
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The global log directory cannot be created or written
    #[error("Log directory '{}' is not writable: {source}", path.display())]
    LogDirectory {
        /// Directory that failed
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: io::Error,
    },

    /// A destination could not be opened or written
    #[error("Destination '{target}' failed: {source}")]
    BackendIo {
        /// Display form of the destination target
        target: String,
        /// Underlying IO error
        #[source]
        source: io::Error,
    },
}

impl LogError {
    /// Shorthand for [`LogError::Configuration`]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// True for errors caused by the caller's configuration rather than IO
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }
}

/// Non-fatal conditions reported while reconfiguring
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum RoutingWarning {
    /// enable/disable/set_mask referenced an identity that is not registered
    #[error("Unknown module '{0}', mask change ignored")]
    UnknownModule(String),

    /// A registered module cannot be turned into a destination
    #[error("Module '{id}' skipped: {reason}")]
    MalformedModule {
        /// Module identity as registered
        id: String,
        /// Why it was rejected
        reason: String,
    },

    /// A per-module or console destination failed to open
    #[error("Destination '{target}' skipped: {error}")]
    DestinationSkipped {
        /// Display form of the destination target
        target: String,
        /// Rendered IO error
        error: String,
    },
}
