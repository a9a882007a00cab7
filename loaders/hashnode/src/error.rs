//! Loader error types.

use quillfeed_graphql::ClientError;
use thiserror::Error;

/// Fatal errors for a whole load cycle.
///
/// A `Fetch` error means the top-level fetch failed; the cycle ends
/// with zero items processed but the host process survives.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The top-level fetch failed.
    #[error("fetch failed: {0}")]
    Fetch(#[from] ClientError),

    /// Invalid loader configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Per-item pipeline failures. Caught at the item boundary and counted
/// as a skip; they never propagate past a single item.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Transformed item failed schema validation.
    #[error("validation failed: {}", issues.join("; "))]
    Validation {
        /// Individual validation issues (field path + message).
        issues: Vec<String>,
    },

    /// Transform step failed.
    #[error("transform failed: {message}")]
    Process {
        /// Details.
        message: String,
    },
}
