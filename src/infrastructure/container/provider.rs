//! Frozen, resolvable service provider

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::domain::{DomainResult, Lifetime, ServiceInstance, ServiceKey};

use super::ServiceRegistration;

/// Immutable resolution view over a frozen [`ServiceCollection`](super::ServiceCollection).
///
/// Lookup is optional-valued: an absent registration is `None`, never an
/// error. MissingService is raised by the resolver, at the edge.
pub struct ServiceProvider {
    registrations: Vec<ServiceRegistration>,
    singletons: Mutex<HashMap<ServiceKey, ServiceInstance>>,
}

impl ServiceProvider {
    pub(crate) fn new(registrations: Vec<ServiceRegistration>) -> Self {
        Self {
            registrations,
            singletons: Mutex::new(HashMap::new()),
        }
    }

    /// Raw lookup: `None` when no registration targets the key.
    pub fn get_raw(&self, key: &ServiceKey) -> Option<DomainResult<ServiceInstance>> {
        // Last registration for a key wins.
        let registration = self.registrations.iter().rev().find(|r| r.key() == *key)?;
        Some(self.resolve(registration))
    }

    /// Typed convenience lookup.
    pub fn get<S: Send + Sync + 'static>(&self) -> Option<Arc<S>> {
        match self.get_raw(&ServiceKey::of::<S>())? {
            Ok(value) => value.downcast::<S>().ok(),
            Err(_) => None,
        }
    }

    /// Registration keys in insertion order.
    pub fn keys(&self) -> Vec<ServiceKey> {
        self.registrations.iter().map(|r| r.key()).collect()
    }

    pub fn contains(&self, key: &ServiceKey) -> bool {
        self.registrations.iter().any(|r| r.key() == *key)
    }

    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    fn resolve(&self, registration: &ServiceRegistration) -> DomainResult<ServiceInstance> {
        if registration.lifetime() == Lifetime::Singleton {
            if let Some(hit) = self.cached(&registration.key()) {
                return Ok(hit);
            }
        }

        // The cache lock is not held while the factory runs, so a factory
        // may resolve other services from the same provider.
        let value = registration.materialize(self)?;

        if registration.lifetime() == Lifetime::Singleton {
            self.cache()
                .entry(registration.key())
                .or_insert_with(|| value.clone());
        }
        Ok(value)
    }

    fn cached(&self, key: &ServiceKey) -> Option<ServiceInstance> {
        self.cache().get(key).cloned()
    }

    fn cache(&self) -> std::sync::MutexGuard<'_, HashMap<ServiceKey, ServiceInstance>> {
        match self.singletons.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::super::ServiceCollection;
    use super::*;

    struct Counter(usize);

    #[test]
    fn given_singleton_factory_when_resolving_twice_then_invoked_once() {
        static CALLS: AtomicUsize = AtomicUsize::new(0);

        let mut services = ServiceCollection::new();
        services.register_singleton(|_| Counter(CALLS.fetch_add(1, Ordering::SeqCst)));
        let provider = services.build();

        let first = provider.get::<Counter>().expect("resolve");
        let second = provider.get::<Counter>().expect("resolve");
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(CALLS.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn given_scoped_factory_when_resolving_twice_then_invoked_each_time() {
        static CALLS: AtomicUsize = AtomicUsize::new(0);

        let mut services = ServiceCollection::new();
        services.register_scoped(|_| Counter(CALLS.fetch_add(1, Ordering::SeqCst)));
        let provider = services.build();

        let first = provider.get::<Counter>().expect("resolve");
        let second = provider.get::<Counter>().expect("resolve");
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(CALLS.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn given_factory_depending_on_other_service_when_resolving_then_no_deadlock() {
        struct Doubled(usize);

        let mut services = ServiceCollection::new();
        services.register_instance(Counter(21));
        services.register_singleton(|provider| {
            let counter = provider.get::<Counter>().expect("counter registered");
            Doubled(counter.0 * 2)
        });
        let provider = services.build();

        assert_eq!(provider.get::<Doubled>().expect("resolve").0, 42);
    }

    #[test]
    fn given_absent_key_when_looked_up_then_none_not_error() {
        let provider = ServiceCollection::new().build();
        assert!(provider.get_raw(&ServiceKey::of::<Counter>()).is_none());
        assert!(provider.get::<Counter>().is_none());
    }
}
