//! Application-level errors (wraps domain errors)

use std::sync::Arc;

use thiserror::Error;

use crate::domain::DomainError;

/// Harness errors wrap domain errors and add pipeline-level failure modes.
#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("module not found in registry: {name} (referenced by {referenced_by})")]
    ModuleNotFound { name: String, referenced_by: String },

    #[error(
        "no service initializer was provided, but capabilities still need registration: {}",
        needed.join(", ")
    )]
    MissingCustomization { needed: Vec<String> },

    #[error("config error: {message}")]
    Config { message: String },

    #[error("service collection already finalized")]
    AlreadyFinalized,

    #[error("harness is not ready; run checkpoint() and fix the recorded setup errors first")]
    NotReady,

    #[error(
        "{} error(s) occurred preparing the harness: {}",
        errors.len(),
        errors.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; ")
    )]
    Setup { errors: Vec<Arc<HarnessError>> },
}

impl HarnessError {
    /// Create a config error with a message.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// The recorded errors behind a [`HarnessError::Setup`] aggregate.
    pub fn setup_errors(&self) -> Option<&[Arc<HarnessError>]> {
        match self {
            Self::Setup { errors } => Some(errors),
            _ => None,
        }
    }
}

/// Result type for harness operations.
pub type HarnessResult<T> = Result<T, HarnessError>;
