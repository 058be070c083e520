use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use fedi_backfill_core::constants::DEFAULT_HTTP_TIMEOUT_SECS;
use fedi_backfill_core::{env_parse_with_default, Post};
use regex::Regex;
use reqwest::header::HeaderMap;
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::api::{RemoteApi, StatusPage};
use crate::error::RemoteError;
use crate::wire::{RemoteAccount, StatusJson};

/// Maximum body length quoted in parse errors.
pub const MAX_ERROR_BODY_LEN: usize = 200;

const USER_AGENT: &str = concat!("fedi-backfill/", env!("CARGO_PKG_VERSION"));

static NEXT_LINK_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<([^>]+)>\s*;\s*rel="?next"?"#).unwrap());
static MAX_ID_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[?&]max_id=([^&#]+)").unwrap());

/// Client for a Mastodon-compatible REST API.
pub struct MastodonClient {
    pub(crate) client: reqwest::Client,
    pub(crate) base_url: String,
    pub(crate) instance: String,
    pub(crate) access_token: Option<String>,
}

impl std::fmt::Debug for MastodonClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MastodonClient")
            .field("client", &self.client)
            .field("base_url", &self.base_url)
            .field("instance", &self.instance)
            .field("access_token", &self.access_token.as_ref().map(|_| "***"))
            .finish()
    }
}

impl MastodonClient {
    /// Creates a client for the API rooted at `base_url`.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built (TLS backend failure).
    pub fn new(base_url: String, access_token: Option<String>) -> Result<Self, RemoteError> {
        let timeout_secs =
            env_parse_with_default("FEDI_BACKFILL_HTTP_TIMEOUT_SECS", DEFAULT_HTTP_TIMEOUT_SECS);
        let base_url = base_url.trim_end_matches('/').to_owned();
        let instance = host_of(&base_url).to_owned();
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| RemoteError::ClientInit(e.to_string()))?;
        Ok(Self { client, base_url, instance, access_token })
    }

    async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Response, RemoteError> {
        let mut request = self.client.get(format!("{}{path}", self.base_url)).query(query);
        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await?;

        if response.status() == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = retry_after_from_headers(response.headers(), Utc::now());
            tracing::debug!(instance = %self.instance, path, ?retry_after, "remote rate limit hit");
            return Err(RemoteError::RateLimited {
                source_name: self.instance.clone(),
                retry_after,
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl RemoteApi for MastodonClient {
    fn instance(&self) -> &str {
        &self.instance
    }

    async fn lookup_account(&self, acct: &str) -> Result<Option<RemoteAccount>, RemoteError> {
        let response =
            self.get("/api/v1/accounts/lookup", &[("acct", acct.to_owned())]).await?;
        found(read_json(response, "account lookup").await)
    }

    async fn account_statuses(
        &self,
        account_id: &str,
        cursor: Option<&str>,
        limit: u32,
    ) -> Result<StatusPage, RemoteError> {
        let mut query = vec![("limit", limit.to_string())];
        if let Some(max_id) = cursor {
            query.push(("max_id", max_id.to_owned()));
        }
        let response =
            self.get(&format!("/api/v1/accounts/{account_id}/statuses"), &query).await?;
        let next_cursor = response
            .headers()
            .get(reqwest::header::LINK)
            .and_then(|v| v.to_str().ok())
            .and_then(next_cursor_from_link);
        let statuses: Vec<StatusJson> = read_json(response, "account statuses").await?;
        Ok(StatusPage { posts: statuses.into_iter().map(Post::from).collect(), next_cursor })
    }

    async fn status(&self, id: &str) -> Result<Option<Post>, RemoteError> {
        let response = self.get(&format!("/api/v1/statuses/{id}"), &[]).await?;
        let status: Option<StatusJson> = found(read_json(response, "status").await)?;
        Ok(status.map(Post::from))
    }
}

/// Turns 404/410 into `None`.
fn found<T>(result: Result<T, RemoteError>) -> Result<Option<T>, RemoteError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_not_found() => Ok(None),
        Err(e) => Err(e),
    }
}

async fn read_json<T: DeserializeOwned>(
    response: Response,
    context: &str,
) -> Result<T, RemoteError> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(RemoteError::HttpStatus { code: status.as_u16(), body });
    }
    serde_json::from_str(&body).map_err(|e| RemoteError::JsonParse {
        context: format!("{context} response (body: {})", truncate(&body, MAX_ERROR_BODY_LEN)),
        source: e,
    })
}

/// `https://{source}` for a bare domain; a source with a scheme is kept as is.
#[must_use]
pub fn base_url_for(source: &str) -> String {
    let source = source.trim().trim_end_matches('/');
    if source.contains("://") { source.to_owned() } else { format!("https://{source}") }
}

/// Authority part (`host[:port]`) of a base URL.
#[must_use]
pub fn host_of(base_url: &str) -> &str {
    base_url
        .split_once("://")
        .map_or(base_url, |(_, rest)| rest)
        .split('/')
        .next()
        .unwrap_or_default()
}

/// Extracts the `max_id` of the `rel="next"` entry of a `Link` header.
#[must_use]
pub fn next_cursor_from_link(link: &str) -> Option<String> {
    let next_url = NEXT_LINK_REGEX.captures(link)?.get(1)?.as_str();
    MAX_ID_REGEX.captures(next_url)?.get(1).map(|m| m.as_str().to_owned())
}

/// Wait hint from `Retry-After` (seconds) or `X-RateLimit-Reset` (RFC 3339).
pub(crate) fn retry_after_from_headers(headers: &HeaderMap, now: DateTime<Utc>) -> Option<Duration> {
    if let Some(secs) = headers
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
    {
        return Some(Duration::from_secs(secs));
    }
    let reset = headers.get("x-ratelimit-reset").and_then(|v| v.to_str().ok())?;
    let reset = DateTime::parse_from_rfc3339(reset.trim()).ok()?.with_timezone(&Utc);
    Some((reset - now).to_std().unwrap_or(Duration::ZERO))
}

/// Truncates a string to the given maximum length at a char boundary.
#[must_use]
pub fn truncate(s: &str, max_len: usize) -> &str {
    if s.len() <= max_len {
        s
    } else {
        let mut end = max_len;
        while end > 0 && !s.is_char_boundary(end) {
            end = end.saturating_sub(1);
        }
        s.get(..end).unwrap_or("")
    }
}
