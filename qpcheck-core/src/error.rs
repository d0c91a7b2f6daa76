//! Error types for the cross-check harness.

use thiserror::Error;

/// Errors that can occur while building, loading, solving, or comparing.
#[derive(Error, Debug)]
pub enum HarnessError {
    /// Problem construction failed a shape or bound-ordering check
    #[error("invalid problem dimensions: {0}")]
    Dimension(String),

    /// Benchmark file is missing a field or carries incompatible shapes
    #[error("benchmark file error in field `{field}`: {message}")]
    Format {
        /// Name of the offending field
        field: String,
        /// What went wrong with it
        message: String,
    },

    /// A backend received a configuration key it does not accept
    #[error("backend `{backend}` rejected option `{key}`: {message}")]
    UnsupportedOption {
        /// Backend that rejected the option
        backend: String,
        /// The offending key
        key: String,
        /// Why it was rejected
        message: String,
    },

    /// A backend failed to run at all (setup rejection, internal failure)
    #[error("backend `{backend}` failed to run: {message}")]
    SolverInvocation {
        /// Backend that failed
        backend: String,
        /// Backend-reported cause
        message: String,
    },

    /// Two results do not describe solutions of the same problem
    #[error("results are not comparable: {0}")]
    IncomparableResults(String),
}

/// Result type for harness operations.
pub type HarnessResult<T> = Result<T, HarnessError>;
