//! Link-time module registration
//!
//! Every module compiled into the binary can self-register by adding a
//! manifest constructor to the distributed slice:
//!
//! ```ignore
//! use linkme::distributed_slice;
//! use wireup::infrastructure::registry::MODULE_MANIFESTS;
//!
//! #[distributed_slice(MODULE_MANIFESTS)]
//! static HANDLERS_MODULE: fn() -> ModuleManifest = handlers_manifest;
//!
//! fn handlers_manifest() -> ModuleManifest {
//!     ModuleManifest::new("app::handlers")
//!         .candidate(candidate! { TodoHandler as dyn Handler { new(repo: TodoRepository); } })
//! }
//! ```

use linkme::distributed_slice;

use crate::domain::ModuleManifest;

use super::TypeRegistry;

/// Manifest constructors contributed by every linked module.
#[distributed_slice]
pub static MODULE_MANIFESTS: [fn() -> ModuleManifest];

/// Registry over every module manifest linked into the running binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinkedRegistry;

impl LinkedRegistry {
    pub fn new() -> Self {
        Self
    }
}

impl TypeRegistry for LinkedRegistry {
    fn module(&self, name: &str) -> Option<ModuleManifest> {
        MODULE_MANIFESTS.iter().map(|build| build()).find(|m| m.name == name)
    }

    fn module_names(&self) -> Vec<String> {
        MODULE_MANIFESTS.iter().map(|build| build().name).collect()
    }
}
