//! Log records as seen by destinations

use time::OffsetDateTime;

use crate::severity::Severity;

/// A single emitted log record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    channel: String,
    severity: Severity,
    message: String,
    timestamp: OffsetDateTime,
}

impl Record {
    /// Create a record stamped with the current UTC time
    pub fn new(channel: impl Into<String>, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            severity,
            message: message.into(),
            timestamp: OffsetDateTime::now_utc(),
        }
    }

    /// Override the timestamp. Any offset is accepted; rotation compares
    /// instants, and formatting prints the time in the given offset.
    #[must_use]
    pub fn at(mut self, timestamp: OffsetDateTime) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Channel tag (the emitting module's identity)
    pub fn channel(&self) -> &str {
        &self.channel
    }

    /// Severity of the record
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Message text
    pub fn message(&self) -> &str {
        &self.message
    }

    /// When the record was produced
    pub fn timestamp(&self) -> OffsetDateTime {
        self.timestamp
    }
}
