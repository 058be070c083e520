use std::result::Result as StdResult;

use thiserror::Error;

/// Errors raised by core domain parsing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("unknown visibility: {0}")]
    UnknownVisibility(String),

    #[error("invalid account handle: {0}")]
    InvalidHandle(String),
}

pub type Result<T> = StdResult<T, CoreError>;
