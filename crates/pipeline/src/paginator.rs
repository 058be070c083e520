//! Full-history listing of one account's posts.

use fedi_backfill_core::constants::MAX_PAGE_SIZE;
use fedi_backfill_core::{AccountHandle, Post};
use fedi_backfill_remote::{RateLimitedClient, RemoteAccount, RemoteApi};

use crate::error::PipelineError;

pub struct Paginator<'a, A: RemoteApi> {
    client: &'a RateLimitedClient<A>,
    page_size: u32,
}

impl<'a, A: RemoteApi> Paginator<'a, A> {
    /// `page_size` is clamped to `1..=40`.
    pub fn new(client: &'a RateLimitedClient<A>, page_size: u32) -> Self {
        Self { client, page_size: page_size.clamp(1, MAX_PAGE_SIZE) }
    }

    /// Resolves `handle` through the source instance's view of it.
    pub async fn resolve_account(
        &self,
        handle: &AccountHandle,
    ) -> Result<RemoteAccount, PipelineError> {
        let acct = handle.to_string();
        self.client.lookup_account(&acct).await?.ok_or_else(|| PipelineError::AccountNotFound {
            handle: acct,
            source_instance: self.client.instance().to_owned(),
        })
    }

    /// Every post the source exposes for `handle`, in the order returned.
    /// An account without posts yields an empty vector.
    pub async fn fetch_all_posts(&self, handle: &AccountHandle) -> Result<Vec<Post>, PipelineError> {
        let account = self.resolve_account(handle).await?;
        tracing::debug!(
            instance = %self.client.instance(),
            account = %handle,
            account_id = %account.id,
            "resolved account"
        );
        self.fetch_account_posts(&account.id).await
    }

    /// Follows `max_id` cursors until an empty page or a page without a next cursor.
    pub async fn fetch_account_posts(&self, account_id: &str) -> Result<Vec<Post>, PipelineError> {
        let mut posts = Vec::new();
        let mut cursor: Option<String> = None;
        let mut pages: usize = 0;

        loop {
            let page =
                self.client.account_statuses(account_id, cursor.as_deref(), self.page_size).await?;
            if page.posts.is_empty() {
                break;
            }
            pages = pages.saturating_add(1);
            posts.extend(page.posts);

            match page.next_cursor {
                None => break,
                Some(next) if cursor.as_deref() == Some(next.as_str()) => {
                    tracing::warn!(
                        instance = %self.client.instance(),
                        account_id,
                        cursor = %next,
                        "remote repeated its pagination cursor, stopping"
                    );
                    break;
                },
                Some(next) => cursor = Some(next),
            }
        }

        tracing::debug!(account_id, pages, posts = posts.len(), "pagination complete");
        Ok(posts)
    }
}
