//! Error types for BLISS key management.

use thiserror::Error;

/// Errors that can occur while generating, encoding or decoding BLISS keys.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BlissError {
    /// Parameter index does not name one of the five parameter sets.
    #[error("invalid parameter set index: {0}")]
    InvalidParameter(u8),

    /// The entropy source could not supply the requested randomness.
    #[error("entropy source failure: {0}")]
    Entropy(&'static str),

    /// Rejection sampling exhausted its attempt budget.
    #[error("key generation failed after {attempts} attempts")]
    GenerationFailed { attempts: usize },

    /// Verbose or compact key encoding is malformed.
    #[error("malformed key encoding: {0}")]
    MalformedEncoding(&'static str),
}

/// Result type for BLISS operations.
pub type Result<T> = core::result::Result<T, BlissError>;
