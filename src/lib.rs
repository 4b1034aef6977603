//! Auto-wiring test-harness engine
//!
//! `wireup` discovers candidate types through module manifests, analyzes
//! their constructor dependencies, builds a service container seeded with
//! built-ins and layered configuration, and resolves typed instances with
//! per-call overrides.
//!
//! The usual entry point is [`TestHarness`]:
//!
//! ```ignore
//! let harness = TestHarness::<dyn Handler>::builder(registry, "my_fixtures")
//!     .configure_services(|services, _needed| {
//!         services.register_instance(InMemoryRepository::default());
//!     })
//!     .build();
//! harness.checkpoint()?;
//! let handler = harness.get::<TodoHandler>()?;
//! ```
//!
//! Layering follows clean architecture: `domain` holds the specs and keys,
//! `application` the pipeline, `infrastructure` the registry and container.

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod macros;
pub mod util;

pub use application::{
    ConfigSupplier, Facilitator, HarnessError, HarnessResult, HarnessState, NeedsGraph,
    ServiceHook, TestHarness, TestHarnessBuilder, TypeScanner, DEFAULT_IGNORE_PREFIXES,
};
pub use config::Settings;
pub use domain::{
    CandidateSpec, ConstructorSpec, DomainError, DomainResult, Lifetime, ModuleManifest,
    Overrides, ResolvedArgs, ServiceInstance, ServiceKey,
};
pub use infrastructure::container::{
    ContainerHandle, HostEnvironment, Logger, LoggerFactory, RegisteredServices,
    ServiceCollection, ServiceProvider,
};
pub use infrastructure::registry::{
    LinkedRegistry, ManifestRegistry, TypeRegistry, MODULE_MANIFESTS,
};
