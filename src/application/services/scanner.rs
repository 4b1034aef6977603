//! Candidate type discovery
//!
//! Walks module manifests from an anchor module, transitively loading every
//! referenced module, and filters exported types down to strict matches of
//! the base capability.

use std::any::TypeId;
use std::sync::Arc;

use tracing::debug;

use crate::application::{HarnessError, HarnessResult};
use crate::domain::{CandidateSpec, ModuleManifest};
use crate::infrastructure::registry::TypeRegistry;

/// Prefixes excluded by default: the framework itself, the standard library,
/// and the serialization library. Callers may replace the list entirely.
pub const DEFAULT_IGNORE_PREFIXES: &[&str] = &["wireup", "std", "serde"];

/// Discovers candidate types through a [`TypeRegistry`].
///
/// The scanner keeps its own ordered list of loaded modules rather than
/// consulting process-wide state, so independent harness instances never
/// observe each other.
pub struct TypeScanner {
    registry: Arc<dyn TypeRegistry>,
    loaded: Vec<ModuleManifest>,
}

impl TypeScanner {
    pub fn new(registry: Arc<dyn TypeRegistry>) -> Self {
        Self {
            registry,
            loaded: Vec::new(),
        }
    }

    /// Ordered candidate discovery for `base`, starting from `anchor`.
    ///
    /// Candidates appear in discovery order: module load order, then type
    /// declaration order within a module. No dedup beyond the prefix
    /// filter: a type surfaced by two modules yields two entries.
    pub fn scan(
        &mut self,
        base: TypeId,
        anchor: &str,
        ignore: Option<&[String]>,
    ) -> HarnessResult<Vec<CandidateSpec>> {
        let defaults: Vec<String> = DEFAULT_IGNORE_PREFIXES
            .iter()
            .map(|p| (*p).to_string())
            .collect();
        let ignore = ignore.unwrap_or(&defaults);

        // The anchor module loads unconditionally; the ignore list applies
        // to its references and to type enumeration.
        self.load_with_references(anchor, anchor, ignore)?;

        let mut candidates = Vec::new();
        for module in &self.loaded {
            if starts_with_any(&module.name, ignore) {
                continue;
            }
            for spec in &module.types {
                if starts_with_any(spec.type_name, ignore) {
                    continue;
                }
                if spec.is_strict_match(base) {
                    candidates.push(spec.clone());
                }
            }
        }

        debug!(
            "scan: {} candidate(s) across {} loaded module(s)",
            candidates.len(),
            self.loaded.len()
        );
        Ok(candidates)
    }

    /// Names of the modules loaded so far, in load order.
    pub fn loaded_modules(&self) -> Vec<&str> {
        self.loaded.iter().map(|m| m.name.as_str()).collect()
    }

    fn load_with_references(
        &mut self,
        name: &str,
        referenced_by: &str,
        ignore: &[String],
    ) -> HarnessResult<()> {
        // A module already in the loaded list is not revisited; this is
        // what breaks reference cycles.
        if self.is_loaded(name) {
            return Ok(());
        }

        let module =
            self.registry
                .module(name)
                .ok_or_else(|| HarnessError::ModuleNotFound {
                    name: name.to_string(),
                    referenced_by: referenced_by.to_string(),
                })?;
        debug!("scan: loaded module {name}");

        let references = module.references.clone();
        self.loaded.push(module);

        for reference in &references {
            if starts_with_any(reference, ignore) {
                continue;
            }
            self.load_with_references(reference, name, ignore)?;
        }
        Ok(())
    }

    fn is_loaded(&self, name: &str) -> bool {
        self.loaded.iter().any(|m| m.name == name)
    }
}

/// Ordinal (byte-wise, case-sensitive) prefix check against a list.
fn starts_with_any(value: &str, prefixes: &[String]) -> bool {
    prefixes.iter().any(|prefix| value.starts_with(prefix.as_str()))
}
