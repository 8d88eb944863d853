//! # Nebula Log Router - Per-Module Log Routing
//!
//! Routes records from named, versioned modules into one file per module, a
//! shared `critical.log` aggregator and an optional console mirror. Which
//! levels reach a module's file is a bitmask that can be changed at runtime;
//! every change rebuilds the whole destination set and swaps it in atomically.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use nebula_log_router::prelude::*;
//!
//! fn main() -> LogResult<()> {
//!     let engine = nebula_log_router::init_with(
//!         RouterConfig::new("logs").with_console(true),
//!         [ModuleConfig::new("parser", "1", "0")],
//!     )?;
//!
//!     let log = engine.channel("parser.1.0");
//!     log.info("parser ready");
//!
//!     engine.enable("parser.1.0", Severity::Debug)?;
//!     log.debug("now visible in logs/parser10.log");
//!     Ok(())
//! }
//! ```
//!
//! ## Routing rules
//!
//! - `<log_dir>/<name><version><subversion>.log` admits records on the
//!   module's channel whose level is in its mask, plus every `critical`
//!   record from any channel.
//! - `<log_dir>/critical.log` admits every `error` and `critical` record.
//! - The console mirror, when enabled, admits everything.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod config;
mod core;
mod engine;
mod format;
mod layer;
mod logger;
mod macros;
mod module;
mod record;
mod severity;
pub mod sink;
mod table;

// Public API
pub use config::RouterConfig;
pub use crate::core::{IoResultExt, LogError, LogResult, RoutingWarning};
pub use engine::{EmitReport, RoutingEngine, RoutingReport};
pub use format::Formatter;
pub use layer::{RoutingLayer, severity_for};
pub use logger::ChannelLogger;
pub use module::{ModuleConfig, ModuleId};
pub use record::Record;
pub use severity::{Severity, SeverityMask};
pub use table::{ModuleFilterEntry, ModuleFilterTable};

/// Prelude for common imports
pub mod prelude {
    pub use crate::{
        ChannelLogger, EmitReport, LogError, LogResult, ModuleConfig, ModuleId, Record, RouterConfig,
        RoutingEngine, RoutingLayer, RoutingReport, Severity, SeverityMask, route_log,
    };
}

/// Construct an engine and load its module list
pub fn init_with<I>(config: RouterConfig, modules: I) -> LogResult<RoutingEngine>
where
    I: IntoIterator<Item = ModuleConfig>,
{
    let engine = RoutingEngine::new(config);
    let report = engine.load(modules)?;
    tracing::debug!(
        destinations = report.destinations,
        warnings = report.warnings.len(),
        "Log router initialized"
    );
    Ok(engine)
}

/// Same as [`init_with`] using [`RouterConfig::from_env`]
pub fn init<I>(modules: I) -> LogResult<RoutingEngine>
where
    I: IntoIterator<Item = ModuleConfig>,
{
    init_with(RouterConfig::from_env(), modules)
}
