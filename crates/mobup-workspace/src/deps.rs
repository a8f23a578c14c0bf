use crate::version::ModuleVersion;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// A dependency as found in one root module's `vendor/` directory
#[derive(Debug, Clone)]
pub struct VendoredModule {
    pub name: String,
    pub version: ModuleVersion,
    /// Where `go mod vendor` left the sources
    pub local: PathBuf,
}

/// Highest vendored version of every module, keyed by module name
#[derive(Debug, Default)]
pub struct DependencySet {
    modules: BTreeMap<String, VendoredModule>,
}

impl DependencySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `module` if it is unknown or strictly newer than the current
    /// pick. Returns true when the set changed.
    pub fn offer(&mut self, module: VendoredModule) -> bool {
        match self.modules.get(&module.name) {
            Some(current) if !module.version.is_newer(&current.version) => false,
            _ => {
                self.modules.insert(module.name.clone(), module);
                true
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&VendoredModule> {
        self.modules.get(name)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Modules in ascending name order
    pub fn iter(&self) -> impl Iterator<Item = &VendoredModule> {
        self.modules.values()
    }
}
