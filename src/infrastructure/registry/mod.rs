//! Module-manifest registry boundary
//!
//! The registry abstracts "which modules exist in the program" so the
//! scanner can run against an explicit manifest list in tests and against
//! link-time registration in a real binary. The scan contract (subtype
//! filter plus ignore prefixes) is identical either way.

mod linked;
mod manifest;

pub use linked::{LinkedRegistry, MODULE_MANIFESTS};
pub use manifest::ManifestRegistry;

use crate::domain::ModuleManifest;

/// Source of module manifests consulted by the scanner.
pub trait TypeRegistry: Send + Sync {
    /// Look up one module manifest by name.
    fn module(&self, name: &str) -> Option<ModuleManifest>;

    /// Names of every module known to this registry, in registration order.
    fn module_names(&self) -> Vec<String>;
}
