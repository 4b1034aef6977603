//! The auto-wiring engine: scan → analyze → prepare → resolve
//!
//! A [`Facilitator`] owns the discovered candidates, the needs graph, and
//! the container for one base capability `B`. Construction runs discovery
//! and the container skeleton; [`Facilitator::initialize_services`] runs the
//! customization hook and freezes the provider; [`Facilitator::get`]
//! resolves and constructs candidates.

use std::any::TypeId;
use std::collections::BTreeSet;
use std::marker::PhantomData;
use std::sync::Arc;

use itertools::Itertools;
use tracing::debug;

use crate::application::services::analysis::NeedsGraph;
use crate::application::services::scanner::TypeScanner;
use crate::application::{HarnessError, HarnessResult};
use crate::config::Settings;
use crate::domain::{
    CandidateSpec, DomainError, Overrides, ResolvedArgs, ServiceInstance, ServiceKey,
};
use crate::infrastructure::container::{
    ContainerHandle, HostEnvironment, LoggerFactory, RegisteredServices, ServiceCollection,
    ServiceProvider,
};
use crate::infrastructure::registry::TypeRegistry;

/// Supplies the settings to register; `None` falls back to layered loading.
pub type ConfigSupplier = dyn Fn() -> Option<Settings> + Send + Sync;

/// Receives the mutable collection and the needed-capability set at
/// finalize. The only place domain-specific services get registered.
pub type ServiceHook = dyn Fn(&mut ServiceCollection, &BTreeSet<ServiceKey>) + Send + Sync;

/// Needed-capability computation state. Explicit, so a re-entrant call can
/// observe `InProgress` and back off instead of recomputing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
enum NeedsComputation {
    #[default]
    NotStarted,
    InProgress,
    Done(BTreeSet<ServiceKey>),
}

/// The auto-wiring engine for one base capability `B`.
///
/// `B` is typically a trait object type (`dyn Handler`); candidates are the
/// concrete types registered against it in module manifests.
pub struct Facilitator<B: ?Sized + 'static> {
    candidates: Vec<CandidateSpec>,
    needs: NeedsGraph,
    needed: NeedsComputation,
    services: Option<ServiceCollection>,
    provider: Option<ServiceProvider>,
    _base: PhantomData<fn() -> Box<B>>,
}

impl<B: ?Sized + 'static> Facilitator<B> {
    /// Run the construction pipeline: discovery, needs analysis, and the
    /// container skeleton (built-ins, configuration, needed-capability set).
    pub fn try_new(
        registry: Arc<dyn TypeRegistry>,
        anchor: &str,
        ignore: Option<&[String]>,
        config_supplier: Option<&ConfigSupplier>,
    ) -> HarnessResult<Self> {
        let mut scanner = TypeScanner::new(registry);
        let candidates = scanner.scan(TypeId::of::<B>(), anchor, ignore)?;
        let needs = NeedsGraph::analyze(&candidates);

        let mut facilitator = Self {
            candidates,
            needs,
            needed: NeedsComputation::NotStarted,
            services: None,
            provider: None,
            _base: PhantomData,
        };
        facilitator.prepare_services(config_supplier)?;
        Ok(facilitator)
    }

    /// The discovered candidates, in discovery order.
    pub fn candidates(&self) -> &[CandidateSpec] {
        &self.candidates
    }

    /// The dependency-needs graph built at construction.
    pub fn needs(&self) -> &NeedsGraph {
        &self.needs
    }

    /// The frozen provider, once `initialize_services` has run.
    pub fn provider(&self) -> Option<&ServiceProvider> {
        self.provider.as_ref()
    }

    /// The needed-capability set: needs-graph keys with no registration
    /// targeting them at computation time.
    ///
    /// Computed at most once. A call made while computation is already in
    /// progress returns `None` without recomputing; the first caller's
    /// result is the set of record.
    pub fn needed_capabilities(&mut self) -> Option<BTreeSet<ServiceKey>> {
        match &self.needed {
            NeedsComputation::Done(set) => return Some(set.clone()),
            NeedsComputation::InProgress => return None,
            NeedsComputation::NotStarted => {}
        }

        self.needed = NeedsComputation::InProgress;
        let set = self.compute_needed();
        self.needed = NeedsComputation::Done(set.clone());
        Some(set)
    }

    /// Finalize: run the customization hook once, then freeze the provider.
    ///
    /// With no hook and a non-empty needed set, this is the fatal
    /// missing-customization configuration error.
    pub fn initialize_services(&mut self, hook: Option<&ServiceHook>) -> HarnessResult<()> {
        let needed = self.needed_capabilities().unwrap_or_default();
        let mut services = self.services.take().ok_or(HarnessError::AlreadyFinalized)?;

        match hook {
            Some(hook) => hook(&mut services, &needed),
            None if !needed.is_empty() => {
                return Err(HarnessError::MissingCustomization {
                    needed: needed.iter().map(|key| key.name.to_string()).collect(),
                });
            }
            None => {}
        }

        let provider = services.build();
        debug!(
            "initialize_services: provider frozen with {} registration(s)",
            provider.len()
        );
        self.provider = Some(provider);
        Ok(())
    }

    /// Resolve and construct an `S` from the discovered candidates.
    ///
    /// Returns `Ok(None)` when no candidate name matches `S` — absence is
    /// not an error. Unresolvable constructor parameters are.
    pub fn get<S: Send + Sync + 'static>(
        &self,
        overrides: &Overrides,
    ) -> HarnessResult<Option<Arc<S>>> {
        let provider = self.provider.as_ref().ok_or(HarnessError::NotReady)?;
        let requested = std::any::type_name::<S>();

        // Ordinal prefix match; smallest residual suffix wins, and the
        // stable sort keeps first-encountered order on ties.
        let selected = self
            .candidates
            .iter()
            .filter(|c| c.type_name.starts_with(requested))
            .sorted_by_key(|c| c.type_name.len())
            .next();
        let Some(selected) = selected else {
            return Ok(None);
        };
        debug!("get: {requested} -> {}", selected.type_name);

        let instance = self.instantiate(selected, overrides, provider)?;
        let instance = instance.downcast::<S>().map_err(|_| {
            HarnessError::from(DomainError::CandidateMismatch {
                requested,
                selected: selected.type_name,
            })
        })?;
        Ok(Some(instance))
    }

    fn instantiate(
        &self,
        candidate: &CandidateSpec,
        overrides: &Overrides,
        provider: &ServiceProvider,
    ) -> HarnessResult<ServiceInstance> {
        // Ascending by parameter count; only the smallest constructor is
        // attempted. An unresolvable parameter fails the call rather than
        // falling back to a wider constructor.
        let constructor = candidate
            .constructors
            .iter()
            .sorted_by_key(|c| c.param_count())
            .next()
            .ok_or(DomainError::Uninitializable {
                type_name: candidate.type_name,
            })?;

        let mut values = Vec::with_capacity(constructor.param_count());
        for param in constructor.params() {
            let value = match overrides.get(param) {
                Some(value) => value,
                None => match provider.get_raw(param) {
                    Some(result) => result?,
                    None => return Err(DomainError::MissingService(*param).into()),
                },
            };
            values.push(value);
        }

        let args = ResolvedArgs::new(values);
        Ok(constructor.invoke(&args)?)
    }

    fn prepare_services(&mut self, config_supplier: Option<&ConfigSupplier>) -> HarnessResult<()> {
        let mut services = ServiceCollection::new();

        // Built-ins go in before anything else, all process lifetime.
        services.register_singleton(|provider| RegisteredServices::new(provider.keys()));
        services.register_instance(HostEnvironment::default());
        services.register_singleton(|provider| ContainerHandle::new(provider.keys()));
        services.register_instance(LoggerFactory);

        self.setup_configuration(&mut services, config_supplier)?;

        self.services = Some(services);
        let needed = self.needed_capabilities().unwrap_or_default();
        debug!(
            "prepare_services: {} needed capability(ies): {}",
            needed.len(),
            needed.iter().map(|k| k.name).join(", ")
        );
        Ok(())
    }

    fn setup_configuration(
        &self,
        services: &mut ServiceCollection,
        supplier: Option<&ConfigSupplier>,
    ) -> HarnessResult<()> {
        let settings = match supplier.and_then(|supply| supply()) {
            Some(settings) => settings,
            None => Settings::load()?,
        };

        // The hosting environment reflects the effective settings; the
        // stub registered above stays in the list, this one wins lookup.
        services.register_instance(HostEnvironment::new(
            settings.environment.clone(),
            settings.application_name.clone(),
            settings.content_root.clone(),
        ));
        services.register_instance(settings);
        Ok(())
    }

    fn compute_needed(&self) -> BTreeSet<ServiceKey> {
        let Some(services) = &self.services else {
            return BTreeSet::new();
        };
        self.needs
            .required_keys()
            .filter(|key| !services.contains(key))
            .copied()
            .collect()
    }
}
