//! Service registration and resolution store
//!
//! [`ServiceCollection`] is the mutable, append-only registration list;
//! freezing it with [`ServiceCollection::build`] produces the immutable
//! [`ServiceProvider`] everything resolves against. There is no removal
//! API: customization hooks may add registrations, never take them away.

mod builtins;
mod provider;

pub use builtins::{ContainerHandle, HostEnvironment, Logger, LoggerFactory, RegisteredServices};
pub use provider::ServiceProvider;

use std::sync::Arc;

use crate::domain::{DomainResult, Lifetime, ServiceInstance, ServiceKey};

/// Factory invoked against the frozen provider to produce a service value.
pub type ServiceFactory =
    Arc<dyn Fn(&ServiceProvider) -> DomainResult<ServiceInstance> + Send + Sync>;

#[derive(Clone)]
enum RegistrationSource {
    Instance(ServiceInstance),
    Factory(ServiceFactory),
}

/// One registration: key, lifetime, and how to produce the value.
#[derive(Clone)]
pub struct ServiceRegistration {
    key: ServiceKey,
    lifetime: Lifetime,
    source: RegistrationSource,
}

impl ServiceRegistration {
    pub fn key(&self) -> ServiceKey {
        self.key
    }

    pub fn lifetime(&self) -> Lifetime {
        self.lifetime
    }

    fn materialize(&self, provider: &ServiceProvider) -> DomainResult<ServiceInstance> {
        match &self.source {
            RegistrationSource::Instance(value) => Ok(value.clone()),
            RegistrationSource::Factory(factory) => factory(provider),
        }
    }
}

/// Ordered, append-only collection of service registrations.
#[derive(Clone, Default)]
pub struct ServiceCollection {
    registrations: Vec<ServiceRegistration>,
}

impl ServiceCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an existing instance with process lifetime.
    pub fn register_instance<S: Send + Sync + 'static>(&mut self, instance: S) {
        self.register_shared(Arc::new(instance));
    }

    /// Register an already-shared instance with process lifetime.
    pub fn register_shared<S: Send + Sync + 'static>(&mut self, instance: Arc<S>) {
        self.registrations.push(ServiceRegistration {
            key: ServiceKey::of::<S>(),
            lifetime: Lifetime::Singleton,
            source: RegistrationSource::Instance(instance),
        });
    }

    /// Register a factory invoked at most once; the result is cached.
    pub fn register_singleton<S, F>(&mut self, factory: F)
    where
        S: Send + Sync + 'static,
        F: Fn(&ServiceProvider) -> S + Send + Sync + 'static,
    {
        self.register_factory::<S, F>(Lifetime::Singleton, factory);
    }

    /// Register a factory invoked on every resolution.
    pub fn register_scoped<S, F>(&mut self, factory: F)
    where
        S: Send + Sync + 'static,
        F: Fn(&ServiceProvider) -> S + Send + Sync + 'static,
    {
        self.register_factory::<S, F>(Lifetime::Scoped, factory);
    }

    fn register_factory<S, F>(&mut self, lifetime: Lifetime, factory: F)
    where
        S: Send + Sync + 'static,
        F: Fn(&ServiceProvider) -> S + Send + Sync + 'static,
    {
        let factory: ServiceFactory =
            Arc::new(move |provider| Ok(Arc::new(factory(provider)) as ServiceInstance));
        self.registrations.push(ServiceRegistration {
            key: ServiceKey::of::<S>(),
            lifetime,
            source: RegistrationSource::Factory(factory),
        });
    }

    /// Whether any registration targets exactly this key.
    pub fn contains(&self, key: &ServiceKey) -> bool {
        self.registrations.iter().any(|r| r.key == *key)
    }

    /// Registration keys in insertion order.
    pub fn keys(&self) -> Vec<ServiceKey> {
        self.registrations.iter().map(|r| r.key).collect()
    }

    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    /// Freeze into a resolvable provider. Registration order is preserved;
    /// the last registration for a key wins at lookup.
    pub fn build(self) -> ServiceProvider {
        ServiceProvider::new(self.registrations)
    }
}
