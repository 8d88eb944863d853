//! Channel-bound logger handles

use crate::engine::{EmitReport, RoutingEngine};
use crate::module::ModuleId;
use crate::record::Record;
use crate::severity::Severity;

/// Emits records tagged with one module's identity
///
/// ```rust,no_run
/// use nebula_log_router::{ModuleConfig, RouterConfig, RoutingEngine};
///
/// let engine = RoutingEngine::new(RouterConfig::new("logs"));
/// engine.load([ModuleConfig::new("parser", "1", "0")])?;
///
/// let log = engine.channel("parser.1.0");
/// log.info("parser ready");
/// # Ok::<(), nebula_log_router::LogError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ChannelLogger<'a> {
    engine: &'a RoutingEngine,
    channel: ModuleId,
}

impl<'a> ChannelLogger<'a> {
    pub(crate) fn new(engine: &'a RoutingEngine, channel: ModuleId) -> Self {
        Self { engine, channel }
    }

    /// Channel tag attached to every record
    pub fn channel(&self) -> &ModuleId {
        &self.channel
    }

    /// Emit `message` at `level`
    pub fn log(&self, level: Severity, message: impl Into<String>) -> EmitReport {
        self.engine
            .emit(&Record::new(self.channel.as_str(), level, message))
    }

    /// Emit at [`Severity::Debug`]
    pub fn debug(&self, message: impl Into<String>) -> EmitReport {
        self.log(Severity::Debug, message)
    }

    /// Emit at [`Severity::Notification`]
    pub fn notification(&self, message: impl Into<String>) -> EmitReport {
        self.log(Severity::Notification, message)
    }

    /// Emit at [`Severity::Info`]
    pub fn info(&self, message: impl Into<String>) -> EmitReport {
        self.log(Severity::Info, message)
    }

    /// Emit at [`Severity::Warning`]
    pub fn warning(&self, message: impl Into<String>) -> EmitReport {
        self.log(Severity::Warning, message)
    }

    /// Emit at [`Severity::Error`]
    pub fn error(&self, message: impl Into<String>) -> EmitReport {
        self.log(Severity::Error, message)
    }

    /// Emit at [`Severity::Critical`]
    pub fn critical(&self, message: impl Into<String>) -> EmitReport {
        self.log(Severity::Critical, message)
    }
}
