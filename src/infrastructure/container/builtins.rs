//! Built-in services seeded into every container skeleton
//!
//! Four entries go in before anything else, all with process lifetime: the
//! self-reference snapshot, the hosting-environment stub, the container
//! query capability, and the logging factory.

use std::path::PathBuf;

use crate::domain::ServiceKey;

/// Hosting-environment placeholder. Starts with stub values; the
/// configuration step re-registers it with the effective settings.
#[derive(Debug, Clone)]
pub struct HostEnvironment {
    pub environment_name: String,
    pub application_name: String,
    pub content_root: PathBuf,
}

impl HostEnvironment {
    pub fn new(
        environment_name: impl Into<String>,
        application_name: impl Into<String>,
        content_root: PathBuf,
    ) -> Self {
        Self {
            environment_name: environment_name.into(),
            application_name: application_name.into(),
            content_root,
        }
    }

    pub fn is_development(&self) -> bool {
        self.environment_name.eq_ignore_ascii_case("development")
    }
}

impl Default for HostEnvironment {
    fn default() -> Self {
        Self::new(
            crate::config::DEFAULT_ENVIRONMENT,
            env!("CARGO_PKG_NAME"),
            PathBuf::from("."),
        )
    }
}

/// Self-reference to the registration collection: the keys that were
/// registered, in insertion order, as of the freeze.
#[derive(Debug, Clone)]
pub struct RegisteredServices {
    keys: Vec<ServiceKey>,
}

impl RegisteredServices {
    pub(crate) fn new(keys: Vec<ServiceKey>) -> Self {
        Self { keys }
    }

    pub fn keys(&self) -> &[ServiceKey] {
        &self.keys
    }
}

/// Container query capability exposed to resolved services.
#[derive(Debug, Clone)]
pub struct ContainerHandle {
    keys: Vec<ServiceKey>,
}

impl ContainerHandle {
    pub(crate) fn new(keys: Vec<ServiceKey>) -> Self {
        Self { keys }
    }

    pub fn contains(&self, key: &ServiceKey) -> bool {
        self.keys.contains(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Logging-factory capability, backed by `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggerFactory;

impl LoggerFactory {
    pub fn create(&self, component: impl Into<String>) -> Logger {
        Logger {
            component: component.into(),
        }
    }
}

/// Named logger emitting through the global `tracing` subscriber.
#[derive(Debug, Clone)]
pub struct Logger {
    component: String,
}

impl Logger {
    pub fn component(&self) -> &str {
        &self.component
    }

    pub fn debug(&self, message: &str) {
        tracing::debug!(component = %self.component, "{message}");
    }

    pub fn info(&self, message: &str) {
        tracing::info!(component = %self.component, "{message}");
    }

    pub fn warn(&self, message: &str) {
        tracing::warn!(component = %self.component, "{message}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_default_host_environment_then_development_stub() {
        let env = HostEnvironment::default();
        assert!(env.is_development());
        assert_eq!(env.application_name, "wireup");
    }

    #[test]
    fn given_logger_factory_when_creating_then_component_is_kept() {
        let logger = LoggerFactory.create("scanner");
        assert_eq!(logger.component(), "scanner");
        logger.debug("created");
    }
}
