//! The routing engine
//!
//! Reconfiguration (load, enable, disable, set_mask, rebuild) is serialized by
//! one lock around the filter table. Each successful change builds a complete
//! new destination set and publishes it with a single [`ArcSwap`] store.
//! Emitters load whichever set is current, so a record is never routed by a
//! mix of two configurations.
//!
//! The new set is opened before the old one is released ("build new, then
//! close old"). Old handles are flushed right after the swap and closed when
//! the last emitter still holding them finishes.

mod plan;

use std::fs;
use std::sync::Arc;

use arc_swap::ArcSwap;
use parking_lot::Mutex;

use crate::config::RouterConfig;
use crate::core::{IoResultExt, LogError, LogResult, RoutingWarning};
use crate::logger::ChannelLogger;
use crate::module::{ModuleConfig, ModuleId};
use crate::record::Record;
use crate::severity::{Severity, SeverityMask};
use crate::sink::{Destination, DestinationSpec, SinkBackend, StandardBackend};
use crate::table::ModuleFilterTable;

use self::plan::RouteRole;

/// Outcome of a reconfiguration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoutingReport {
    /// Whether a new destination set was installed
    pub rebuilt: bool,
    /// Number of destinations now installed
    pub destinations: usize,
    /// Non-fatal conditions encountered
    pub warnings: Vec<RoutingWarning>,
}

impl RoutingReport {
    /// True when nothing was skipped or ignored
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Outcome of routing one record
#[derive(Debug, Default)]
pub struct EmitReport {
    /// Destinations that stored the record
    pub delivered: usize,
    /// Destinations that admitted the record but failed to store it
    pub failures: Vec<LogError>,
}

impl EmitReport {
    /// True when no admitting destination failed
    pub fn is_ok(&self) -> bool {
        self.failures.is_empty()
    }

    /// Delivered count, or the first failure
    pub fn into_result(self) -> LogResult<usize> {
        match self.failures.into_iter().next() {
            Some(error) => Err(error),
            None => Ok(self.delivered),
        }
    }
}

struct InstalledRoute {
    spec: DestinationSpec,
    destination: Box<dyn Destination>,
}

#[derive(Default)]
struct RouteSet {
    routes: Vec<InstalledRoute>,
}

impl RouteSet {
    fn flush(&self) -> LogResult<()> {
        for route in &self.routes {
            route.destination.flush().for_destination(&route.spec.target)?;
        }
        Ok(())
    }
}

/// Routes records to per-module files, the error/critical aggregator and the
/// optional console mirror.
///
/// The engine is an ordinary value: construct it once, share it by reference
/// (or `Arc`) with whatever emits or reconfigures logs.
pub struct RoutingEngine {
    config: RouterConfig,
    backend: Box<dyn SinkBackend>,
    table: Mutex<ModuleFilterTable>,
    routes: ArcSwap<RouteSet>,
}

impl RoutingEngine {
    /// Engine writing through the [`StandardBackend`]
    pub fn new(config: RouterConfig) -> Self {
        Self::with_backend(config, StandardBackend)
    }

    /// Engine writing through a custom backend
    pub fn with_backend(config: RouterConfig, backend: impl SinkBackend + 'static) -> Self {
        Self {
            config,
            backend: Box::new(backend),
            table: Mutex::new(ModuleFilterTable::new()),
            routes: ArcSwap::from_pointee(RouteSet::default()),
        }
    }

    /// Configuration fixed at construction
    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Replace the module list and rebuild.
    ///
    /// Every module starts at [`SeverityMask::MODULE_DEFAULT`]. On error the
    /// previous table and routing stay installed.
    pub fn load<I>(&self, modules: I) -> LogResult<RoutingReport>
    where
        I: IntoIterator<Item = ModuleConfig>,
    {
        let mut table = self.table.lock();
        let mut candidate = ModuleFilterTable::new();
        candidate.load(modules)?;

        let report = self.install(&candidate)?;
        *table = candidate;
        Ok(report)
    }

    /// Set `level` for module `id` and rebuild
    pub fn enable(&self, id: &str, level: Severity) -> LogResult<RoutingReport> {
        self.reconfigure(id, |table| table.enable(id, level))
    }

    /// Clear `level` for module `id` and rebuild
    pub fn disable(&self, id: &str, level: Severity) -> LogResult<RoutingReport> {
        self.reconfigure(id, |table| table.disable(id, level))
    }

    /// Replace the mask of module `id` and rebuild
    pub fn set_mask(&self, id: &str, mask: SeverityMask) -> LogResult<RoutingReport> {
        self.reconfigure(id, |table| table.set_mask(id, mask))
    }

    /// Current mask of `id`, empty if unknown
    pub fn lookup(&self, id: &str) -> SeverityMask {
        self.table.lock().lookup(id)
    }

    /// Registered modules in registration order
    pub fn modules(&self) -> Vec<ModuleConfig> {
        self.table
            .lock()
            .entries()
            .map(|entry| entry.module().clone())
            .collect()
    }

    /// Rebuild the destination set from the current table
    pub fn rebuild(&self) -> LogResult<RoutingReport> {
        let table = self.table.lock();
        self.install(&table)
    }

    /// Descriptors of the installed destinations
    pub fn installed(&self) -> Vec<DestinationSpec> {
        self.routes
            .load()
            .routes
            .iter()
            .map(|route| route.spec.clone())
            .collect()
    }

    /// Route `record` through the installed set.
    ///
    /// A failing destination does not stop delivery to the others. Each
    /// failure is returned in the report and also logged through `tracing`.
    pub fn emit(&self, record: &Record) -> EmitReport {
        let routes = self.routes.load();
        let mut report = EmitReport::default();
        for route in &routes.routes {
            if !route.destination.accept(record) {
                continue;
            }
            match route.destination.write(record).for_destination(&route.spec.target) {
                Ok(()) => report.delivered += 1,
                Err(error) => {
                    tracing::error!(channel = record.channel(), %error, "Failed to write log record");
                    report.failures.push(error);
                }
            }
        }
        report
    }

    /// Logger bound to one channel
    pub fn channel(&self, id: impl Into<ModuleId>) -> ChannelLogger<'_> {
        ChannelLogger::new(self, id.into())
    }

    /// Flush every installed destination
    pub fn flush(&self) -> LogResult<()> {
        self.routes.load().flush()
    }

    fn reconfigure(
        &self,
        id: &str,
        apply: impl FnOnce(&mut ModuleFilterTable) -> bool,
    ) -> LogResult<RoutingReport> {
        let mut table = self.table.lock();
        let mut candidate = table.clone();
        if !apply(&mut candidate) {
            let warning = RoutingWarning::UnknownModule(id.to_string());
            tracing::warn!(module = id, "{warning}");
            return Ok(RoutingReport {
                rebuilt: false,
                destinations: self.routes.load().routes.len(),
                warnings: vec![warning],
            });
        }

        let report = self.install(&candidate)?;
        *table = candidate;
        Ok(report)
    }

    /// Open the planned set and swap it in. Caller holds the table lock.
    fn install(&self, table: &ModuleFilterTable) -> LogResult<RoutingReport> {
        if !table.is_loaded() {
            return Err(LogError::configuration(
                "no module list loaded, routing cannot be built",
            ));
        }

        let log_dir = &self.config.log_dir;
        fs::create_dir_all(log_dir).for_log_dir(log_dir)?;

        let plan = plan::plan(table, &self.config);
        let mut warnings = plan.warnings;
        let mut routes = Vec::with_capacity(plan.routes.len());

        for planned in plan.routes {
            match self.backend.open(&planned.spec) {
                Ok(destination) => routes.push(InstalledRoute {
                    spec: planned.spec,
                    destination,
                }),
                Err(source) if planned.role == RouteRole::Aggregator => {
                    return Err(LogError::LogDirectory {
                        path: log_dir.clone(),
                        source,
                    });
                }
                Err(error) => warnings.push(RoutingWarning::DestinationSkipped {
                    target: planned.spec.target.to_string(),
                    error: error.to_string(),
                }),
            }
        }

        for warning in &warnings {
            tracing::warn!("{warning}");
        }

        let destinations = routes.len();
        let previous = self.routes.swap(Arc::new(RouteSet { routes }));
        if let Err(error) = previous.flush() {
            tracing::warn!(%error, "Failed to flush replaced destinations");
        }

        tracing::debug!(destinations, modules = table.len(), "Routing rebuilt");
        Ok(RoutingReport {
            rebuilt: true,
            destinations,
            warnings,
        })
    }
}

impl Drop for RoutingEngine {
    fn drop(&mut self) {
        if let Err(error) = self.flush() {
            tracing::warn!(%error, "Failed to flush destinations on shutdown");
        }
    }
}

impl std::fmt::Debug for RoutingEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoutingEngine")
            .field("config", &self.config)
            .field("destinations", &self.routes.load().routes.len())
            .finish_non_exhaustive()
    }
}
