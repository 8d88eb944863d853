//! Per-module severity masks
//!
//! The table is plain data. Routing side effects (rebuild after every change)
//! live in [`RoutingEngine`](crate::RoutingEngine), which owns a table behind
//! its reconfiguration lock.

use indexmap::IndexMap;
use indexmap::map::Entry;

use crate::core::{LogError, LogResult};
use crate::module::{ModuleConfig, ModuleId};
use crate::severity::{Severity, SeverityMask};

/// One registered module and its current mask
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleFilterEntry {
    id: ModuleId,
    module: ModuleConfig,
    mask: SeverityMask,
}

impl ModuleFilterEntry {
    fn new(module: ModuleConfig) -> Self {
        Self {
            id: module.id(),
            module,
            mask: SeverityMask::MODULE_DEFAULT,
        }
    }

    /// Channel identity
    pub fn id(&self) -> &ModuleId {
        &self.id
    }

    /// Module record as registered
    pub fn module(&self) -> &ModuleConfig {
        &self.module
    }

    /// Currently enabled levels
    pub fn mask(&self) -> SeverityMask {
        self.mask
    }

    /// Whether the module runs
    pub fn run_enabled(&self) -> bool {
        self.module.run_enabled
    }
}

/// Mapping from module identity to its severity mask, in registration order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleFilterTable {
    entries: IndexMap<ModuleId, ModuleFilterEntry>,
}

impl ModuleFilterTable {
    /// Create an empty, unloaded table
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole table with `modules`, each at the default mask.
    ///
    /// Fails on an empty list or a duplicate identity; on failure the current
    /// contents are kept.
    pub fn load<I>(&mut self, modules: I) -> LogResult<()>
    where
        I: IntoIterator<Item = ModuleConfig>,
    {
        let mut entries = IndexMap::new();
        for module in modules {
            match entries.entry(module.id()) {
                Entry::Occupied(occupied) => {
                    return Err(LogError::configuration(format!(
                        "duplicate module identity '{}'",
                        occupied.key()
                    )));
                }
                Entry::Vacant(vacant) => {
                    vacant.insert(ModuleFilterEntry::new(module));
                }
            }
        }

        if entries.is_empty() {
            return Err(LogError::configuration("module list is empty"));
        }

        self.entries = entries;
        Ok(())
    }

    /// Set `level` for `id`. Returns `false` if `id` is unknown.
    pub fn enable(&mut self, id: &str, level: Severity) -> bool {
        self.update(id, |mask| mask.with(level))
    }

    /// Clear `level` for `id`. Returns `false` if `id` is unknown.
    pub fn disable(&mut self, id: &str, level: Severity) -> bool {
        self.update(id, |mask| mask.without(level))
    }

    /// Replace the mask of `id` wholesale. Returns `false` if `id` is unknown.
    pub fn set_mask(&mut self, id: &str, mask: SeverityMask) -> bool {
        self.update(id, |_| mask)
    }

    /// Mask of `id`, or the empty mask if unknown
    pub fn lookup(&self, id: &str) -> SeverityMask {
        self.entries
            .get(id)
            .map_or(SeverityMask::empty(), ModuleFilterEntry::mask)
    }

    /// Entry for `id`
    pub fn get(&self, id: &str) -> Option<&ModuleFilterEntry> {
        self.entries.get(id)
    }

    /// Whether `id` is registered
    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Entries in registration order
    pub fn entries(&self) -> impl Iterator<Item = &ModuleFilterEntry> {
        self.entries.values()
    }

    /// Whether [`load`](Self::load) has succeeded at least once
    pub fn is_loaded(&self) -> bool {
        !self.entries.is_empty()
    }

    /// Number of registered modules
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True before the first successful load
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn update(&mut self, id: &str, f: impl FnOnce(SeverityMask) -> SeverityMask) -> bool {
        match self.entries.get_mut(id) {
            Some(entry) => {
                entry.mask = f(entry.mask);
                true
            }
            None => false,
        }
    }
}
