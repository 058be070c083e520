//! Encoding a whole post set without losing the batch to one bad post.

use fedi_backfill_core::Post;

use crate::error::ExportError;
use crate::statement::encode_post;

#[derive(Debug, Clone)]
pub struct EncodedStatement {
    pub post_id: String,
    pub uri: String,
    pub sql: String,
}

#[derive(Debug)]
pub struct EncodeFailure {
    pub post_id: String,
    pub error: ExportError,
}

#[derive(Debug, Default)]
pub struct EncodedBatch {
    pub statements: Vec<EncodedStatement>,
    pub failures: Vec<EncodeFailure>,
}

impl EncodedBatch {
    pub fn failed_ids(&self) -> impl Iterator<Item = &str> {
        self.failures.iter().map(|f| f.post_id.as_str())
    }
}

/// Encodes every post in order. Posts that cannot be mapped are logged and
/// collected in [`EncodedBatch::failures`]; the rest still encode.
pub fn encode_batch<'a, I>(posts: I) -> EncodedBatch
where
    I: IntoIterator<Item = &'a Post>,
{
    let mut batch = EncodedBatch::default();
    for post in posts {
        match encode_post(post) {
            Ok(sql) => batch.statements.push(EncodedStatement {
                post_id: post.id.clone(),
                uri: post.uri.clone(),
                sql,
            }),
            Err(error) => {
                tracing::warn!(post_id = %post.id, uri = %post.uri, "Failed to encode post: {error}");
                batch.failures.push(EncodeFailure { post_id: post.id.clone(), error });
            },
        }
    }
    batch
}
