//! Explicit manifest registry

use crate::domain::ModuleManifest;

use super::TypeRegistry;

/// Registry backed by an explicit, caller-supplied list of manifests.
///
/// Deterministic and self-contained: two harnesses built over two
/// `ManifestRegistry` values share no state.
#[derive(Debug, Clone, Default)]
pub struct ManifestRegistry {
    modules: Vec<ModuleManifest>,
}

impl ManifestRegistry {
    pub fn new(modules: Vec<ModuleManifest>) -> Self {
        Self { modules }
    }

    /// Add a module manifest.
    pub fn with_module(mut self, module: ModuleManifest) -> Self {
        self.modules.push(module);
        self
    }
}

impl TypeRegistry for ManifestRegistry {
    fn module(&self, name: &str) -> Option<ModuleManifest> {
        self.modules.iter().find(|m| m.name == name).cloned()
    }

    fn module_names(&self) -> Vec<String> {
        self.modules.iter().map(|m| m.name.clone()).collect()
    }
}
