//! Observability for the token service.
//!
//! # Privacy by Default
//!
//! Instrumented functions use `#[instrument(skip_all)]` and add fields
//! explicitly. Fields fall into three groups:
//! - **SAFE**: plaintext (status, error category, endpoint)
//! - **HASHED**: room name and participant identity, via [`hash_for_correlation`]
//! - **NEVER**: tokens and the API secret

pub mod metrics;

use crate::errors::TokenServiceError;
use sha2::{Digest, Sha256};

/// Hash a field value for correlation in logs (SHA-256, first 8 hex chars).
///
/// This is a one-way correlation aid, not protection for secrets.
pub fn hash_for_correlation(value: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(value.as_bytes());
    let result = hasher.finalize();
    hex::encode(result.get(..4).unwrap_or_default())
}

/// Error categories for metric labels (bounded cardinality).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Caller input problems (missing or malformed parameters)
    Client,
    /// Operator misconfiguration (credentials not set)
    Configuration,
    /// Unexpected failures (signing)
    Internal,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Client => "client",
            ErrorCategory::Configuration => "configuration",
            ErrorCategory::Internal => "internal",
        }
    }
}

impl From<&TokenServiceError> for ErrorCategory {
    fn from(err: &TokenServiceError) -> Self {
        match err {
            TokenServiceError::MissingParameter(_) => ErrorCategory::Client,
            TokenServiceError::MissingCredentials => ErrorCategory::Configuration,
            TokenServiceError::SigningFailure(_) => ErrorCategory::Internal,
        }
    }
}
