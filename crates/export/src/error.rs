//! Typed error enum for the export crate.

use fedi_backfill_core::CoreError;
use thiserror::Error;

/// Errors from mapping posts to statements or writing the artifact.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("post {post_id}: {source}")]
    Visibility {
        post_id: String,
        #[source]
        source: CoreError,
    },
    #[error("post {post_id}: {field} is not a numeric id: {value:?}")]
    MalformedId { post_id: String, field: &'static str, value: String },
    #[error("post {post_id}: statement has {count} parameters")]
    ParameterCount { post_id: String, count: usize },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to move artifact into place: {0}")]
    Persist(#[from] tempfile::PersistError),
}
