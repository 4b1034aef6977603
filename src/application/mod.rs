//! Application layer: the wiring pipeline and its error surface
//!
//! This layer orchestrates domain specs against the infrastructure registry
//! and container. Nothing here touches process-global state.

pub mod error;
pub mod services;

pub use error::{HarnessError, HarnessResult};
pub use services::{
    ConfigSupplier, Facilitator, HarnessState, NeedsGraph, ServiceHook, TestHarness,
    TestHarnessBuilder, TypeScanner, DEFAULT_IGNORE_PREFIXES,
};
