//! Domain layer: entities and resolution contracts
//!
//! This layer is independent of external concerns (no registry lookup, no
//! config loading, no container state).

pub mod entities;
pub mod error;

pub use entities::*;
pub use error::{DomainError, DomainResult};
