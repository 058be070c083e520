pub(crate) mod dump;
pub(crate) mod run;
pub(crate) mod template;

use anyhow::{Context, Result};
use fedi_backfill_remote::{base_url_for, host_of, MastodonClient, RateLimitedClient};

use crate::config::BackfillConfig;
use crate::credentials::read_access_token;

/// One rate-limited client per source instance, each with its own budget.
pub(crate) fn build_clients(
    config: &BackfillConfig,
) -> Result<Vec<RateLimitedClient<MastodonClient>>> {
    let rate_limit = config.rate_limit.to_config();
    config
        .source_instances
        .iter()
        .map(|source| {
            let base_url = base_url_for(source);
            let token = read_access_token(&config.credentials_dir, host_of(&base_url))?;
            let client = MastodonClient::new(base_url, Some(token))
                .with_context(|| format!("failed to build client for {source}"))?;
            RateLimitedClient::new(client, rate_limit)
                .with_context(|| format!("invalid rate limit for {source}"))
        })
        .collect()
}
