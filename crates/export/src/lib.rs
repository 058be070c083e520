//! Statement export for fedi-backfill
//!
//! Maps posts onto a fixed 23-parameter prepared insert against the target
//! `statuses` table and writes the resulting script atomically. Every insert
//! skips rows whose id already exists, so a script can be replayed safely.

mod batch;
mod error;
mod sink;
mod statement;

mod tests;

pub use batch::{encode_batch, EncodeFailure, EncodedBatch, EncodedStatement};
pub use error::ExportError;
pub use sink::{render_script, write_atomic, write_script};
pub use statement::{
    count_parameters, encode_post, encode_post_with_attachments, quote, template_declaration,
    COLUMNS, NULL, PARAMETER_COUNT, STATEMENT_NAME, TABLE_NAME,
};
