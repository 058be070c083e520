//! Remote instance API abstraction.
//!
//! The pipeline only ever needs three read operations. Keeping them behind a
//! trait lets the rate limiter wrap any implementation and lets tests
//! substitute an in-memory instance.

use async_trait::async_trait;
use fedi_backfill_core::Post;

use crate::{RemoteAccount, RemoteError};

/// One page of an account's statuses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusPage {
    pub posts: Vec<Post>,
    /// `max_id` for the next request; `None` when the remote has no further page.
    pub next_cursor: Option<String>,
}

#[async_trait]
pub trait RemoteApi: Send + Sync {
    /// Domain of the instance this API talks to.
    fn instance(&self) -> &str;

    /// Resolve an `acct` handle (`user@domain`) to the instance-local account.
    /// `Ok(None)` when the instance does not know the account.
    async fn lookup_account(&self, acct: &str) -> Result<Option<RemoteAccount>, RemoteError>;

    /// Fetch one page of an account's statuses, newest first, older than `cursor`.
    async fn account_statuses(
        &self,
        account_id: &str,
        cursor: Option<&str>,
        limit: u32,
    ) -> Result<StatusPage, RemoteError>;

    /// Fetch a single status. `Ok(None)` when it does not exist or is not visible.
    async fn status(&self, id: &str) -> Result<Option<Post>, RemoteError>;
}
