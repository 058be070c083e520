//! One pass of the pipeline per (source instance, account) pair.

use std::collections::HashSet;

use fedi_backfill_core::constants::{DEFAULT_MAX_CHAIN_DEPTH, DEFAULT_PAGE_SIZE};
use fedi_backfill_core::{
    filter_consistent, filter_consistent_with_report, AccountHandle, WorkingSet,
};
use fedi_backfill_export::{encode_batch, EncodedStatement};
use fedi_backfill_remote::{RateLimitedClient, RemoteApi};
use serde::Serialize;

use crate::chain::ChainReconstructor;
use crate::error::PipelineError;
use crate::paginator::Paginator;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineOptions {
    pub page_size: u32,
    pub max_chain_depth: usize,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self { page_size: DEFAULT_PAGE_SIZE, max_chain_depth: DEFAULT_MAX_CHAIN_DEPTH }
    }
}

/// Counts for one pair, logged and printed as progress.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AccountReport {
    pub source: String,
    pub account: String,
    pub fetched: usize,
    pub ancestors: usize,
    pub retained: usize,
    pub dropped: usize,
    pub failed: Vec<String>,
}

/// Result of a successful pair: the retained posts and their statements, in
/// the same order.
#[derive(Debug, Clone)]
pub struct AccountRun {
    pub report: AccountReport,
    pub posts: WorkingSet,
    pub statements: Vec<EncodedStatement>,
}

/// Runs the fetch, reconstruct, filter and encode passes against one source.
pub struct Pipeline<'a, A: RemoteApi> {
    client: &'a RateLimitedClient<A>,
    options: PipelineOptions,
}

impl<'a, A: RemoteApi> Pipeline<'a, A> {
    pub fn new(client: &'a RateLimitedClient<A>, options: PipelineOptions) -> Self {
        Self { client, options }
    }

    pub async fn run_account(&self, handle: &AccountHandle) -> Result<AccountRun, PipelineError> {
        let source = self.client.instance().to_owned();
        let fetched = Paginator::new(self.client, self.options.page_size)
            .fetch_all_posts(handle)
            .await?;
        tracing::info!(%source, account = %handle, fetched = fetched.len(), "fetched posts");

        let reconstructor = ChainReconstructor::new(self.client, self.options.max_chain_depth);
        let mut known: HashSet<String> = fetched.iter().map(|p| p.id.clone()).collect();
        let mut working = WorkingSet::new();
        let mut ancestors = 0_usize;

        for post in &fetched {
            if post.is_reply() {
                let chain = reconstructor.reconstruct_ancestors(post, &known).await;
                ancestors = ancestors.saturating_add(chain.ancestors.len());
                for ancestor in chain.ancestors.into_iter().rev() {
                    known.insert(ancestor.id.clone());
                    working.insert(ancestor);
                }
            }
            working.insert(post.clone());
        }

        let (filtered, filter_report) = filter_consistent_with_report(&working);
        tracing::debug!(
            account = %handle,
            retained = filter_report.retained,
            dropped = filter_report.dropped,
            "consistency filter applied"
        );
        let batch = encode_batch(&filtered);
        let failed: Vec<String> = batch.failed_ids().map(str::to_owned).collect();

        let (posts, statements) = if failed.is_empty() {
            (filtered, batch.statements)
        } else {
            let failed_ids: HashSet<&str> = failed.iter().map(String::as_str).collect();
            let encodable = filtered.retain_cloned(|p| !failed_ids.contains(p.id.as_str()));
            let posts = filter_consistent(&encodable);
            let statements = batch
                .statements
                .into_iter()
                .filter(|s| posts.contains(&s.post_id))
                .collect();
            (posts, statements)
        };

        let report = AccountReport {
            source,
            account: handle.to_string(),
            fetched: fetched.len(),
            ancestors,
            retained: posts.len(),
            dropped: working.len().saturating_sub(posts.len()).saturating_sub(failed.len()),
            failed,
        };
        tracing::info!(
            source = %report.source,
            account = %report.account,
            fetched = report.fetched,
            ancestors = report.ancestors,
            retained = report.retained,
            dropped = report.dropped,
            failed = report.failed.len(),
            "account processed"
        );
        Ok(AccountRun { report, posts, statements })
    }
}

/// A pair that could not be processed. The rest of the run carries on.
#[derive(Debug)]
pub struct PairFailure {
    pub source: String,
    pub account: String,
    pub error: PipelineError,
}

#[derive(Debug, Default)]
pub struct RunSummary {
    pub runs: Vec<AccountRun>,
    pub failures: Vec<PairFailure>,
}

impl RunSummary {
    /// All statements in run order, without the template line. A post seen
    /// under the same `uri` from more than one source is emitted once, from
    /// the first source that returned it.
    #[must_use]
    pub fn statements(&self) -> Vec<String> {
        let mut seen: HashSet<&str> = HashSet::new();
        self.runs
            .iter()
            .flat_map(|r| r.statements.iter())
            .filter(|s| {
                let first = seen.insert(s.uri.as_str());
                if !first {
                    tracing::debug!(post_id = %s.post_id, uri = %s.uri, "skipping duplicate uri");
                }
                first
            })
            .map(|s| s.sql.clone())
            .collect()
    }

    #[must_use]
    pub fn total_statements(&self) -> usize {
        self.statements().len()
    }

    /// True when at least one pair was attempted and none succeeded.
    #[must_use]
    pub fn all_failed(&self) -> bool {
        self.runs.is_empty() && !self.failures.is_empty()
    }
}

/// Every source × account pair, sequentially. Each client carries its own
/// budget, so one source running dry does not slow the others.
pub async fn run_all<A: RemoteApi>(
    clients: &[RateLimitedClient<A>],
    accounts: &[AccountHandle],
    options: PipelineOptions,
) -> RunSummary {
    let mut summary = RunSummary::default();
    for client in clients {
        let pipeline = Pipeline::new(client, options);
        for handle in accounts {
            match pipeline.run_account(handle).await {
                Ok(run) => summary.runs.push(run),
                Err(error) => {
                    tracing::error!(
                        source = %client.instance(),
                        account = %handle,
                        error = %error,
                        "account failed"
                    );
                    summary.failures.push(PairFailure {
                        source: client.instance().to_owned(),
                        account: handle.to_string(),
                        error,
                    });
                },
            }
        }
    }
    summary
}
