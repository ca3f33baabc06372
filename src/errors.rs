//! # Error: Error Types for Composed Sigma Proofs.
//!
//! This module defines the [`Error`] enum, which enumerates the possible failure modes
//! encountered while building statements, proving them, or checking transcripts.
//!
//! Errors come in three tiers:
//! - construction errors, raised while a statement tree is assembled or validated,
//! - proving errors, raised when the prover lacks what the statement needs,
//! - verification outcomes. Most of them are turned into `Ok(false)` by the
//!   verifiers (see [`Error::is_rejection`]); a malformed transcript is reported as an error.

/// Represents an error encountered while building, proving or verifying a statement.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A secret needed by the computation has no value.
    #[error("Secret `{name}` has no value assigned.")]
    IncompleteValues {
        /// Name of the secret missing a value.
        name: String,
    },
    /// The expression cannot be used to build a statement.
    #[error("Invalid expression: {0}")]
    InvalidExpression(String),
    /// Bytes that should encode an element of the statement's group do not.
    #[error("Element does not belong to the statement group.")]
    GroupMismatch,
    /// The statement of the prover and of the verifier differ.
    #[error("Statement does not match the transcript.")]
    StatementMismatch,
    /// A secret of an Or subtree occurs outside of it (the OR-flaw).
    #[error("Secret `{name}` occurs both inside and outside of an Or statement.")]
    InvalidSecretReuse {
        /// Name of the offending secret.
        name: String,
    },
    /// Two occurrences of a secret received different responses under one challenge.
    #[error("Secret `{name}` received inconsistent responses.")]
    InconsistentResponse {
        /// Name of the offending secret.
        name: String,
    },
    /// A precommitment was refused by the validation hook of its statement.
    #[error("Precommitment validation failed: {0}")]
    ValidationFailure(String),
    /// The proof is invalid: verification failed.
    #[error("Verification failed.")]
    VerificationFailure,
    /// And/Or statements need at least two sub-statements.
    #[error("{kind} statement needs at least two sub-statements, got {got}.")]
    InvalidArity {
        /// `"And"` or `"Or"`.
        kind: &'static str,
        /// Number of sub-statements supplied.
        got: usize,
    },
    /// No branch of an Or statement can be proven with the given values.
    #[error("No sub-statement of the Or statement can be proven.")]
    NoLiveBranch,
    /// The secret values do not satisfy a precondition of the statement.
    #[error("Invalid witness: {0}")]
    InvalidWitness(String),
    /// Malformed byte encoding.
    #[error("Deserialization failed: {0}")]
    Deserialization(String),
    /// A protocol step was invoked out of order.
    #[error("Protocol step out of order: {0}")]
    OutOfOrder(&'static str),
}

impl Error {
    /// Whether this error is an ordinary cryptographic rejection, reported by
    /// verifiers as `Ok(false)` rather than as an error.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Error::VerificationFailure
                | Error::ValidationFailure(_)
                | Error::StatementMismatch
                | Error::GroupMismatch
        )
    }

    pub(crate) fn incomplete(name: &str) -> Self {
        Error::IncompleteValues {
            name: name.to_owned(),
        }
    }
}

/// Turns the outcome of a verification pass into the verdict returned by `verify`.
pub(crate) fn into_verdict(result: Result<(), Error>) -> Result<bool, Error> {
    match result {
        Ok(()) => Ok(true),
        Err(err) if err.is_rejection() => {
            tracing::debug!(error = %err, "proof rejected");
            Ok(false)
        }
        Err(err) => Err(err),
    }
}
