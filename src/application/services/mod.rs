//! Application services
//!
//! The use-case pipeline in order: candidate discovery, dependency-needs
//! analysis, the wiring engine, and the fixture-facing harness.

mod analysis;
mod facilitator;
mod harness;
mod scanner;

pub use analysis::{ConstructorSite, NeedsGraph};
pub use facilitator::{ConfigSupplier, Facilitator, ServiceHook};
pub use harness::{HarnessState, TestHarness, TestHarnessBuilder};
pub use scanner::{TypeScanner, DEFAULT_IGNORE_PREFIXES};
