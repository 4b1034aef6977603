//! Domain entities: core data structures for discovery and resolution

use std::any::{Any, TypeId};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::domain::error::{DomainError, DomainResult};

/// A service value as stored in the container and passed to constructors.
pub type ServiceInstance = Arc<dyn Any + Send + Sync>;

/// Identity of a service type: runtime `TypeId` plus the fully-qualified name.
///
/// The name is what candidate selection and diagnostics work with; the id is
/// what override and registration lookup work with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ServiceKey {
    pub id: TypeId,
    pub name: &'static str,
}

impl ServiceKey {
    /// Key for a service type `S`.
    pub fn of<S: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<S>(),
            name: std::any::type_name::<S>(),
        }
    }
}

impl fmt::Display for ServiceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

// Ordered by name so key sets iterate deterministically across runs.
impl Ord for ServiceKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name.cmp(other.name).then_with(|| self.id.cmp(&other.id))
    }
}

impl PartialOrd for ServiceKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Registration lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifetime {
    /// Created at most once per provider, then shared.
    Singleton,
    /// Created anew for every resolution.
    Scoped,
}

/// Arguments resolved for one constructor invocation, in declaration order.
pub struct ResolvedArgs {
    values: Vec<ServiceInstance>,
}

impl ResolvedArgs {
    pub fn new(values: Vec<ServiceInstance>) -> Self {
        Self { values }
    }

    /// Typed access to the argument at `index`.
    pub fn get<P: Send + Sync + 'static>(&self, index: usize) -> DomainResult<Arc<P>> {
        let mismatch = || DomainError::ArgumentMismatch {
            expected: std::any::type_name::<P>(),
            index,
        };
        let value = self.values.get(index).ok_or_else(mismatch)?;
        value.clone().downcast::<P>().map_err(|_| mismatch())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Constructor function: receives resolved arguments, returns the instance.
pub type ConstructorFn = fn(&ResolvedArgs) -> DomainResult<ServiceInstance>;

/// One constructor of a candidate type: ordered parameter keys plus the
/// invocation function. Authored via the [`candidate!`](crate::candidate) macro.
#[derive(Clone)]
pub struct ConstructorSpec {
    params: Vec<ServiceKey>,
    invoke: ConstructorFn,
}

impl ConstructorSpec {
    pub fn new(params: Vec<ServiceKey>, invoke: ConstructorFn) -> Self {
        Self { params, invoke }
    }

    /// Parameter keys in declaration order.
    pub fn params(&self) -> &[ServiceKey] {
        &self.params
    }

    pub fn param_count(&self) -> usize {
        self.params.len()
    }

    /// Invoke the constructor with already-resolved arguments.
    pub fn invoke(&self, args: &ResolvedArgs) -> DomainResult<ServiceInstance> {
        (self.invoke)(args)
    }
}

impl fmt::Debug for ConstructorSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstructorSpec")
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

/// A concrete type registered against a base capability.
///
/// Identity is the fully-qualified name; a type surfaced by two modules
/// yields two independent entries and the first occurrence wins selection.
#[derive(Debug, Clone)]
pub struct CandidateSpec {
    /// Fully-qualified name from `std::any::type_name`.
    pub type_name: &'static str,
    pub type_id: TypeId,
    /// `TypeId` of the base capability this candidate is registered against.
    pub base_id: TypeId,
    /// Constructors in declaration order.
    pub constructors: Vec<ConstructorSpec>,
}

impl CandidateSpec {
    /// Strict match: registered against `base`, and not the base itself.
    pub fn is_strict_match(&self, base: TypeId) -> bool {
        self.base_id == base && self.type_id != base
    }
}

/// Manifest of one program module: its identity, the modules it references,
/// and the candidate types it exports.
#[derive(Debug, Clone, Default)]
pub struct ModuleManifest {
    pub name: String,
    pub references: Vec<String>,
    pub types: Vec<CandidateSpec>,
}

impl ModuleManifest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            references: Vec::new(),
            types: Vec::new(),
        }
    }

    /// Add a referenced module name.
    pub fn reference(mut self, name: impl Into<String>) -> Self {
        self.references.push(name.into());
        self
    }

    /// Add an exported candidate type.
    pub fn candidate(mut self, spec: CandidateSpec) -> Self {
        self.types.push(spec);
        self
    }
}

/// Per-call override instances, keyed by exact runtime type.
///
/// Overrides take precedence over the container for any constructor
/// parameter of the same type; the last write wins on duplicates.
#[derive(Clone, Default)]
pub struct Overrides {
    entries: HashMap<TypeId, ServiceInstance>,
}

impl Overrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an override instance.
    pub fn with<S: Send + Sync + 'static>(self, instance: S) -> Self {
        self.with_shared(Arc::new(instance))
    }

    /// Add an already-shared override instance.
    pub fn with_shared<S: Send + Sync + 'static>(mut self, instance: Arc<S>) -> Self {
        self.entries.insert(TypeId::of::<S>(), instance);
        self
    }

    pub fn get(&self, key: &ServiceKey) -> Option<ServiceInstance> {
        self.entries.get(&key.id).cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for Overrides {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Overrides")
            .field("len", &self.entries.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Widget(u32);

    #[test]
    fn given_duplicate_override_types_when_adding_then_last_write_wins() {
        let overrides = Overrides::new().with(Widget(1)).with(Widget(2));

        let key = ServiceKey::of::<Widget>();
        let value = overrides.get(&key).expect("override present");
        let widget = value.downcast::<Widget>().expect("widget");
        assert_eq!(widget.0, 2);
        assert_eq!(overrides.len(), 1);
    }

    #[test]
    fn given_resolved_args_when_typed_get_then_index_and_type_checked() {
        let args = ResolvedArgs::new(vec![Arc::new(Widget(7)) as ServiceInstance]);

        let widget: Arc<Widget> = args.get(0).expect("typed get");
        assert_eq!(widget.0, 7);

        let missing = args.get::<Widget>(1);
        assert!(matches!(
            missing,
            Err(DomainError::ArgumentMismatch { index: 1, .. })
        ));

        let wrong_type = args.get::<String>(0);
        assert!(matches!(
            wrong_type,
            Err(DomainError::ArgumentMismatch { index: 0, .. })
        ));
    }

    #[test]
    fn given_service_keys_when_ordering_then_sorted_by_name() {
        let a = ServiceKey::of::<Widget>();
        let b = ServiceKey::of::<String>();
        let mut keys = vec![a, b];
        keys.sort();
        assert_eq!(keys[0].name, std::any::type_name::<String>());
    }
}
