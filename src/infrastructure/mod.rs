//! Infrastructure layer: registry implementations and the service container
//!
//! This layer implements the module-manifest boundary and the registration
//! store the engine resolves against.

pub mod container;
pub mod registry;
