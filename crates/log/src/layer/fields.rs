//! Field extraction for bridged `tracing` events

use std::fmt;

use tracing::field::{Field, Visit};

/// Collects the fields the router cares about from one event
#[derive(Debug, Default)]
pub(super) struct RecordFields {
    pub channel: Option<String>,
    pub severity: Option<String>,
    pub message: String,
}

impl Visit for RecordFields {
    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "channel" => self.channel = Some(value.to_string()),
            "severity" => self.severity = Some(value.to_string()),
            "message" => self.message = value.to_string(),
            _ => {}
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        match field.name() {
            "channel" => self.channel = Some(format!("{value:?}")),
            "severity" => self.severity = Some(format!("{value:?}")),
            "message" => self.message = format!("{value:?}"),
            _ => {}
        }
    }
}
