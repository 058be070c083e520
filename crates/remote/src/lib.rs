//! Remote instance access for fedi-backfill
//!
//! A Mastodon REST client behind the [`RemoteApi`] seam, and the
//! [`RateLimitedClient`] through which every remote call is made.

mod api;
mod client;
mod error;
mod rate_limit;
mod wire;


pub use api::{RemoteApi, StatusPage};
pub use client::{
    base_url_for, host_of, next_cursor_from_link, truncate, MastodonClient, MAX_ERROR_BODY_LEN,
};
pub use error::RemoteError;
pub use rate_limit::{backoff_delay, RateLimitConfig, RateLimitMode, RateLimitedClient};
pub use wire::RemoteAccount;
