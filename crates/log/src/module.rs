//! Module identities and the records a configuration source supplies

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Channel identifier of a module: `"<name>.<version>.<subversion>"`
///
/// Used both as the filter-table key and as the channel tag of every record
/// the module emits.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModuleId(String);

impl ModuleId {
    /// Build the identity from its components
    pub fn new(name: &str, version: &str, subversion: &str) -> Self {
        Self(format!("{name}.{version}.{subversion}"))
    }

    /// The identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ModuleId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for ModuleId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ModuleId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ModuleId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// One module as supplied by a configuration source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleConfig {
    /// Module name
    pub name: String,
    /// Major version
    pub version: String,
    /// Minor version
    pub subversion: String,
    /// Whether the module runs and therefore gets a log file
    #[serde(default = "default_run_enabled", alias = "runEnabled")]
    pub run_enabled: bool,
}

impl ModuleConfig {
    /// Create a running module
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        subversion: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            subversion: subversion.into(),
            run_enabled: true,
        }
    }

    /// Set the run flag
    #[must_use]
    pub fn with_run_enabled(mut self, run_enabled: bool) -> Self {
        self.run_enabled = run_enabled;
        self
    }

    /// Channel identity of this module
    pub fn id(&self) -> ModuleId {
        ModuleId::new(&self.name, &self.version, &self.subversion)
    }

    /// File name of the per-module log: `<name><version><subversion>.log`
    pub fn file_name(&self) -> String {
        format!("{}{}{}.log", self.name, self.version, self.subversion)
    }

    /// Reason this module cannot get a destination, if any
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("empty module name".to_string());
        }
        let parts = [&self.name, &self.version, &self.subversion];
        if parts
            .iter()
            .any(|part| part.contains(['/', '\\']) || part.as_str() == "..")
        {
            return Err("identity contains a path component".to_string());
        }
        Ok(())
    }
}

fn default_run_enabled() -> bool {
    true
}
