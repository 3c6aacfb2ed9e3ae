//! Distribution error types.

use crate::standings::PlayerId;
use thiserror::Error;

/// Distribution errors.
///
/// Configuration problems never appear here: malformed prizes are dropped
/// with a warning and the run continues. Missing tournaments or empty
/// standings are informational outcomes, not errors, so batch jobs over
/// many tournaments keep going.
#[derive(Debug, Error)]
pub enum DistributionError {
    /// One player ended up with two cash records in one section. This is a
    /// pooling bug, not bad input; the run fails rather than persist an
    /// invalid distribution.
    #[error("duplicate cash award for player {player_id} in section '{section}'")]
    DuplicateCashAward { player_id: PlayerId, section: String },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for distribution operations
pub type DistributionResult<T> = Result<T, DistributionError>;
