//! Pipeline layer for fedi-backfill
//!
//! Drives one source instance at a time: list an account's posts, fetch the
//! missing ancestors of every reply, drop replies that cannot be anchored and
//! encode what remains. All remote traffic goes through the source's
//! [`RateLimitedClient`](fedi_backfill_remote::RateLimitedClient).

#![allow(missing_docs, reason = "Internal crate with self-explanatory API")]
#![allow(clippy::missing_errors_doc, reason = "Errors are self-explanatory from Result types")]
#![allow(missing_debug_implementations, reason = "Internal types")]
#![allow(clippy::missing_docs_in_private_items, reason = "Internal crate")]
#![allow(clippy::implicit_return, reason = "Implicit return is idiomatic Rust")]
#![allow(clippy::question_mark_used, reason = "? operator is idiomatic Rust")]
#![allow(clippy::min_ident_chars, reason = "Short error vars are idiomatic")]

mod chain;
mod error;
mod paginator;
mod run;


pub use chain::{Chain, ChainEnd, ChainReconstructor};
pub use error::PipelineError;
pub use paginator::Paginator;
pub use run::{
    run_all, AccountReport, AccountRun, PairFailure, Pipeline, PipelineOptions, RunSummary,
};
