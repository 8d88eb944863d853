//! Bridge from `tracing` events into the routing engine
//!
//! Events carry their channel in a `channel` field (falling back to the
//! event target) and may override the severity with a `severity` field, which
//! is how `notification` and `critical` are reached from `tracing` macros.
//! Events emitted by this crate itself are ignored so that router
//! diagnostics never feed back into the routing they describe.

mod fields;

use std::io::{self, Write};
use std::sync::Arc;

use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

use self::fields::RecordFields;
use crate::engine::RoutingEngine;
use crate::record::Record;
use crate::severity::Severity;

/// `tracing_subscriber` layer that emits every event through a [`RoutingEngine`]
#[derive(Debug, Clone)]
pub struct RoutingLayer {
    engine: Arc<RoutingEngine>,
}

impl RoutingLayer {
    /// Forward events to `engine`
    pub fn new(engine: Arc<RoutingEngine>) -> Self {
        Self { engine }
    }
}

impl<S> Layer<S> for RoutingLayer
where
    S: Subscriber,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if metadata.target().starts_with(env!("CARGO_CRATE_NAME")) {
            return;
        }

        let mut fields = RecordFields::default();
        event.record(&mut fields);

        let severity = fields
            .severity
            .as_deref()
            .and_then(|s| s.parse::<Severity>().ok())
            .unwrap_or_else(|| severity_for(*metadata.level()));
        let channel = fields
            .channel
            .unwrap_or_else(|| metadata.target().to_string());

        let report = self
            .engine
            .emit(&Record::new(channel, severity, fields.message));

        // Router diagnostics are filtered above, so failures go straight to stderr.
        if !report.is_ok() {
            let mut stderr = io::stderr().lock();
            for error in &report.failures {
                let _ = writeln!(stderr, "nebula-log-router: {error}");
            }
        }
    }
}

/// Default mapping of `tracing` levels
pub fn severity_for(level: Level) -> Severity {
    match level {
        Level::ERROR => Severity::Error,
        Level::WARN => Severity::Warning,
        Level::INFO => Severity::Info,
        _ => Severity::Debug,
    }
}
