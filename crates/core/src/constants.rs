//! Shared constants for fedi-backfill.

/// Remote call budget: calls allowed per window (Mastodon's default API limit).
pub const DEFAULT_RATE_LIMIT_CALLS: u32 = 300;

/// Remote call budget: window length in seconds.
pub const DEFAULT_RATE_LIMIT_PERIOD_SECS: u64 = 300;

/// First backoff delay in milliseconds; doubles on every retry.
pub const DEFAULT_BACKOFF_BASE_DELAY_MS: u64 = 1000;

/// Total attempts (first call included) before a rate-limit error is terminal.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Mastodon caps `limit` on account status listings at 40.
pub const MAX_PAGE_SIZE: u32 = 40;

/// Default number of posts requested per page.
pub const DEFAULT_PAGE_SIZE: u32 = MAX_PAGE_SIZE;

/// Upper bound on ancestors fetched for a single post.
pub const DEFAULT_MAX_CHAIN_DEPTH: usize = 256;

/// HTTP client timeout in seconds when `FEDI_BACKFILL_HTTP_TIMEOUT_SECS` is unset.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
