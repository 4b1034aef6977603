//! Test-harness lifecycle over the auto-wiring engine
//!
//! A [`TestHarness`] wraps a [`Facilitator`] for the fixture lifecycle:
//! construction never panics or errors out — failures are captured and
//! replayed as one aggregate at [`TestHarness::checkpoint`], so a broken
//! environment surfaces in every test method rather than killing the run.

use std::marker::PhantomData;
use std::sync::Arc;

use tracing::warn;

use crate::application::services::facilitator::{ConfigSupplier, Facilitator, ServiceHook};
use crate::application::{HarnessError, HarnessResult};
use crate::config::Settings;
use crate::domain::Overrides;
use crate::infrastructure::registry::TypeRegistry;

/// Where the harness ended up after construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HarnessState {
    /// The pipeline ran to completion; `get` is available.
    Ready,
    /// One or more setup steps failed; `checkpoint` replays them.
    Faulted,
}

/// Fixture-facing wrapper around the engine for base capability `B`.
pub struct TestHarness<B: ?Sized + 'static> {
    facilitator: Option<Facilitator<B>>,
    setup_errors: Vec<Arc<HarnessError>>,
}

impl<B: ?Sized + 'static> TestHarness<B> {
    /// Start configuring a harness anchored at module `anchor`.
    pub fn builder(registry: Arc<dyn TypeRegistry>, anchor: &str) -> TestHarnessBuilder<B> {
        TestHarnessBuilder {
            registry,
            anchor: anchor.to_string(),
            ignore: None,
            config_supplier: None,
            service_hook: None,
            _base: PhantomData,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> HarnessState {
        if self.setup_errors.is_empty() {
            HarnessState::Ready
        } else {
            HarnessState::Faulted
        }
    }

    /// The errors captured during construction, in occurrence order.
    pub fn setup_errors(&self) -> &[Arc<HarnessError>] {
        &self.setup_errors
    }

    /// Replay captured setup failures. Call this at the top of each test
    /// method; a healthy harness returns `Ok(())`.
    pub fn checkpoint(&self) -> HarnessResult<()> {
        if self.setup_errors.is_empty() {
            return Ok(());
        }
        Err(HarnessError::Setup {
            errors: self.setup_errors.clone(),
        })
    }

    /// Resolve and construct an `S`, with no per-call overrides.
    pub fn get<S: Send + Sync + 'static>(&self) -> HarnessResult<Option<Arc<S>>> {
        self.get_with(&Overrides::default())
    }

    /// Resolve and construct an `S`, preferring `overrides` for constructor
    /// parameters over container registrations.
    pub fn get_with<S: Send + Sync + 'static>(
        &self,
        overrides: &Overrides,
    ) -> HarnessResult<Option<Arc<S>>> {
        let facilitator = self.facilitator.as_ref().ok_or(HarnessError::NotReady)?;
        facilitator.get(overrides)
    }

    /// The underlying engine, when construction got that far.
    pub fn facilitator(&self) -> Option<&Facilitator<B>> {
        self.facilitator.as_ref()
    }
}

/// Builder collecting the optional knobs before the pipeline runs.
pub struct TestHarnessBuilder<B: ?Sized + 'static> {
    registry: Arc<dyn TypeRegistry>,
    anchor: String,
    ignore: Option<Vec<String>>,
    config_supplier: Option<Box<ConfigSupplier>>,
    service_hook: Option<Box<ServiceHook>>,
    _base: PhantomData<fn() -> Box<B>>,
}

impl<B: ?Sized + 'static> TestHarnessBuilder<B> {
    /// Replace the default ignore-prefix list entirely.
    pub fn ignore_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignore = Some(prefixes.into_iter().map(Into::into).collect());
        self
    }

    /// Supply settings directly instead of layered loading. Returning
    /// `None` from the closure falls back to layered loading anyway.
    pub fn supply_config<F>(mut self, supplier: F) -> Self
    where
        F: Fn() -> Option<Settings> + Send + Sync + 'static,
    {
        self.config_supplier = Some(Box::new(supplier));
        self
    }

    /// Install the customization hook that registers domain services.
    pub fn configure_services<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut crate::infrastructure::container::ServiceCollection, &std::collections::BTreeSet<crate::domain::ServiceKey>)
            + Send
            + Sync
            + 'static,
    {
        self.service_hook = Some(Box::new(hook));
        self
    }

    /// Run the pipeline. Never fails: errors are captured on the harness
    /// and replayed by `checkpoint`.
    pub fn build(self) -> TestHarness<B> {
        let mut setup_errors = Vec::new();

        let facilitator = match Facilitator::try_new(
            self.registry,
            &self.anchor,
            self.ignore.as_deref(),
            self.config_supplier.as_deref(),
        ) {
            Ok(mut facilitator) => {
                if let Err(err) = facilitator.initialize_services(self.service_hook.as_deref()) {
                    warn!("harness setup failed at finalize: {err}");
                    setup_errors.push(Arc::new(err));
                }
                Some(facilitator)
            }
            Err(err) => {
                warn!("harness setup failed at construction: {err}");
                setup_errors.push(Arc::new(err));
                None
            }
        };

        TestHarness {
            facilitator,
            setup_errors,
        }
    }
}
