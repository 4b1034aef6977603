//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::entities::ServiceKey;

/// Domain errors represent resolution contract violations.
/// These are independent of registry and container concerns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("missing service: no override or registration for {0}")]
    MissingService(ServiceKey),

    #[error("type cannot be initialized, it has no constructor: {type_name}")]
    Uninitializable { type_name: &'static str },

    #[error("constructor argument {index} does not hold a {expected}")]
    ArgumentMismatch {
        expected: &'static str,
        index: usize,
    },

    #[error("closest candidate {selected} cannot be returned as {requested}")]
    CandidateMismatch {
        requested: &'static str,
        selected: &'static str,
    },
}

/// Result type for domain layer operations.
pub type DomainResult<T> = Result<T, DomainError>;
