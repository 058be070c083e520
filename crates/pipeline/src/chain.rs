//! Ascent traversal from a reply towards its thread root.

use std::collections::HashSet;

use fedi_backfill_core::Post;
use fedi_backfill_remote::{RateLimitedClient, RemoteApi};

/// Why an ascent stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainEnd {
    /// The last ancestor (or the post itself) has no parent.
    Root,
    /// The parent id was unknown to the source instance.
    Unresolved { parent_id: String },
    /// Fetching the parent failed; the walk keeps what it had.
    Failed { parent_id: String, error: String },
    /// The parent is already in the working set.
    Known { parent_id: String },
    /// The parent id was already visited during this walk.
    Cycle { parent_id: String },
    /// `max_depth` ancestors were fetched.
    DepthLimit,
}

/// Ancestors of one post, nearest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chain {
    pub ancestors: Vec<Post>,
    pub end: ChainEnd,
}

pub struct ChainReconstructor<'a, A: RemoteApi> {
    client: &'a RateLimitedClient<A>,
    max_depth: usize,
}

impl<'a, A: RemoteApi> ChainReconstructor<'a, A> {
    pub fn new(client: &'a RateLimitedClient<A>, max_depth: usize) -> Self {
        Self { client, max_depth }
    }

    /// Fetches the missing ancestors of `post`, nearest first.
    ///
    /// Parents whose id is in `known` are not fetched again. Fetch errors end
    /// the walk instead of failing the caller.
    pub async fn reconstruct_ancestors(&self, post: &Post, known: &HashSet<String>) -> Chain {
        let mut ancestors: Vec<Post> = Vec::new();
        let mut visited: HashSet<String> = HashSet::from([post.id.clone()]);
        let mut next = post.parent_id.clone();

        let end = loop {
            let Some(parent_id) = next.take() else {
                break ChainEnd::Root;
            };
            if known.contains(&parent_id) {
                break ChainEnd::Known { parent_id };
            }
            if !visited.insert(parent_id.clone()) {
                tracing::warn!(post_id = %post.id, %parent_id, "reply chain loops back on itself");
                break ChainEnd::Cycle { parent_id };
            }
            if ancestors.len() >= self.max_depth {
                tracing::warn!(
                    post_id = %post.id,
                    max_depth = self.max_depth,
                    "reply chain exceeds depth limit"
                );
                break ChainEnd::DepthLimit;
            }

            match self.client.status(&parent_id).await {
                Ok(Some(parent)) => {
                    next = parent.parent_id.clone();
                    ancestors.push(parent);
                },
                Ok(None) => {
                    tracing::debug!(post_id = %post.id, %parent_id, "ancestor not found on source");
                    break ChainEnd::Unresolved { parent_id };
                },
                Err(e) => {
                    tracing::warn!(
                        source = %self.client.instance(),
                        post_id = %post.id,
                        %parent_id,
                        error = %e,
                        "failed to fetch ancestor"
                    );
                    break ChainEnd::Failed { parent_id, error: e.to_string() };
                },
            }
        };

        Chain { ancestors, end }
    }
}
