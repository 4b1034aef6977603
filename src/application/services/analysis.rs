//! Dependency-needs analysis
//!
//! Records which service keys are required by which constructors across all
//! candidates. The graph is diagnostic: resolution never consults it, but
//! the needed-capability computation and error reporting do.

use std::collections::BTreeMap;

use crate::domain::{CandidateSpec, ServiceKey};

/// Where a requirement comes from: one constructor of one candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstructorSite {
    /// Fully-qualified name of the candidate declaring the constructor.
    pub owner: &'static str,
    /// Position of the constructor in the candidate's declaration order.
    pub constructor_index: usize,
    /// Number of parameters the constructor takes.
    pub param_count: usize,
}

/// Mapping from a required key to every constructor that declares it.
/// Built once, read-only afterward.
#[derive(Debug, Clone, Default)]
pub struct NeedsGraph {
    edges: BTreeMap<ServiceKey, Vec<ConstructorSite>>,
}

impl NeedsGraph {
    /// Build the graph from the discovered candidates.
    pub fn analyze(candidates: &[CandidateSpec]) -> Self {
        let mut edges: BTreeMap<ServiceKey, Vec<ConstructorSite>> = BTreeMap::new();
        for candidate in candidates {
            for (constructor_index, constructor) in candidate.constructors.iter().enumerate() {
                for param in constructor.params() {
                    edges.entry(*param).or_default().push(ConstructorSite {
                        owner: candidate.type_name,
                        constructor_index,
                        param_count: constructor.param_count(),
                    });
                }
            }
        }
        Self { edges }
    }

    /// Every required key, in deterministic order.
    pub fn required_keys(&self) -> impl Iterator<Item = &ServiceKey> {
        self.edges.keys()
    }

    /// The constructors that require `key`.
    pub fn sites(&self, key: &ServiceKey) -> &[ConstructorSite] {
        self.edges.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}
