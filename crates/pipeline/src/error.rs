//! Typed error enum for the pipeline layer.
//!
//! Failures here are scoped to a single (source instance, account) pair; the
//! caller records them and moves on to the next pair.

use fedi_backfill_remote::RemoteError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// The source instance does not know the account.
    #[error("account {handle} not found on {source_instance}")]
    AccountNotFound { handle: String, source_instance: String },

    /// Remote call failed after the rate limiter gave up or with a non-retryable error.
    #[error("remote: {0}")]
    Remote(#[from] RemoteError),
}
