//! Error types for the hierarchy engine.

use thiserror::Error;

use starmap_names::DecomposeError;

/// Why a record was not applied to a system tree.
///
/// Rejections are ordinary values: the engine stays usable after any number
/// of them and a rejected record leaves no trace in the tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RejectReason {
    /// The body name could not be split into path segments.
    #[error("body name could not be decomposed: {0}")]
    DecompositionFailed(String),

    /// The body name decomposes into more segments than the tree allows.
    #[error("body path has {segments} segments (at most 5 allowed)")]
    PathTooDeep { segments: usize },

    /// The record refers to a body that is not in the tree yet.
    #[error("no body {body} in the system tree")]
    DanglingReference { body: String },

    /// Codex entry carrying an implausible system address.
    #[error("system address {0} is below the sanity threshold")]
    InvalidSystemAddress(u64),
}

impl From<DecomposeError> for RejectReason {
    fn from(e: DecomposeError) -> Self {
        match e {
            DecomposeError::TooDeep { segments } => RejectReason::PathTooDeep { segments },
            DecomposeError::Empty => RejectReason::DecompositionFailed(e.to_string()),
        }
    }
}

/// Errors raised while loading engine configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable held a value that does not parse.
    #[error("invalid value for {var}: {value:?}")]
    InvalidValue { var: &'static str, value: String },

    /// A tolerance was negative or not a number.
    #[error("{field} must be a finite, non-negative number of degrees")]
    InvalidTolerance { field: &'static str },
}
