//! Call-budget enforcement for a single remote instance.
//!
//! Every remote call goes through [`RateLimitedClient`]. The budget is a GCRA
//! limiter (governor) sized to allow at most `calls` per `period`, the same
//! shape as Mastodon's 300 requests / 5 minutes. One client owns one limiter,
//! so each source instance must get its own client.

use std::future::Future;
use std::num::NonZeroU32;
use std::time::Duration;

use async_trait::async_trait;
use fedi_backfill_core::Post;
use governor::{Quota, RateLimiter};

use crate::api::{RemoteApi, StatusPage};
use crate::error::RemoteError;
use crate::wire::RemoteAccount;

type DefaultRateLimiter = RateLimiter<
    governor::state::NotKeyed,
    governor::state::InMemoryState,
    governor::clock::DefaultClock,
>;

const LOCAL_BUDGET: &str = "local budget";

/// What happens when the budget is exhausted. Fixed per client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitMode {
    /// Block until budget is available; a remote 429 is waited out up to
    /// `max_waits` times before it becomes terminal.
    Pace { max_waits: u32 },
    /// Retry with exponential backoff starting at `base_delay`; the call is
    /// attempted `max_attempts` times in total.
    Backoff { base_delay: Duration, max_attempts: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub calls: u32,
    pub period: Duration,
    pub mode: RateLimitMode,
}

/// Wraps a [`RemoteApi`] with a call budget and retry policy.
pub struct RateLimitedClient<A: RemoteApi> {
    pub(crate) inner: A,
    limiter: DefaultRateLimiter,
    config: RateLimitConfig,
}

impl<A: RemoteApi> std::fmt::Debug for RateLimitedClient<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimitedClient")
            .field("instance", &self.inner.instance())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<A: RemoteApi> RateLimitedClient<A> {
    /// # Errors
    /// Returns [`RemoteError::InvalidRateLimit`] for a zero budget, zero period or
    /// zero attempt ceiling.
    pub fn new(inner: A, config: RateLimitConfig) -> Result<Self, RemoteError> {
        let calls = NonZeroU32::new(config.calls)
            .ok_or_else(|| RemoteError::InvalidRateLimit("calls must be > 0".to_owned()))?;
        if let RateLimitMode::Backoff { max_attempts: 0, .. } = config.mode {
            return Err(RemoteError::InvalidRateLimit("max_attempts must be > 0".to_owned()));
        }
        let quota = Quota::with_period(config.period / calls.get())
            .ok_or_else(|| RemoteError::InvalidRateLimit("period must be > 0".to_owned()))?
            .allow_burst(calls);
        Ok(Self { inner, limiter: RateLimiter::direct(quota), config })
    }

    /// Runs one remote operation under the budget, retrying rate-limit
    /// failures per the configured mode. Other errors are returned untouched.
    ///
    /// # Errors
    /// The operation's own error, or [`RemoteError::RateLimitExhausted`] once the
    /// retry ceiling is reached.
    pub async fn call<T, F, Fut>(&self, operation: &str, mut op: F) -> Result<T, RemoteError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, RemoteError>>,
    {
        match self.config.mode {
            RateLimitMode::Pace { max_waits } => self.call_paced(operation, max_waits, &mut op).await,
            RateLimitMode::Backoff { base_delay, max_attempts } => {
                self.call_with_backoff(operation, base_delay, max_attempts, &mut op).await
            },
        }
    }

    async fn call_paced<T, F, Fut>(
        &self,
        operation: &str,
        max_waits: u32,
        op: &mut F,
    ) -> Result<T, RemoteError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, RemoteError>>,
    {
        let mut waits: u32 = 0;
        loop {
            self.limiter.until_ready().await;
            match op().await {
                Err(err) if err.is_rate_limited() => {
                    if waits >= max_waits {
                        return Err(RemoteError::RateLimitExhausted {
                            attempts: waits.saturating_add(1),
                            last: Box::new(err),
                        });
                    }
                    waits = waits.saturating_add(1);
                    let delay = err.retry_after().unwrap_or(self.config.period).min(self.config.period);
                    tracing::warn!(
                        instance = %self.inner.instance(),
                        operation,
                        wait = waits,
                        max_waits,
                        ?delay,
                        "remote budget exhausted, pausing"
                    );
                    tokio::time::sleep(delay).await;
                },
                other => return other,
            }
        }
    }

    async fn call_with_backoff<T, F, Fut>(
        &self,
        operation: &str,
        base_delay: Duration,
        max_attempts: u32,
        op: &mut F,
    ) -> Result<T, RemoteError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, RemoteError>>,
    {
        let mut last_error: Option<RemoteError> = None;

        for attempt in 1..=max_attempts {
            let outcome = if self.limiter.check().is_ok() {
                op().await
            } else {
                Err(RemoteError::RateLimited {
                    source_name: LOCAL_BUDGET.to_owned(),
                    retry_after: None,
                })
            };

            match outcome {
                Err(err) if err.is_rate_limited() => {
                    last_error = Some(err);
                    if attempt < max_attempts {
                        let delay = backoff_delay(base_delay, attempt);
                        tracing::warn!(
                            instance = %self.inner.instance(),
                            operation,
                            "rate limited, retry attempt {attempt}/{max_attempts} after {delay:?}"
                        );
                        tokio::time::sleep(delay).await;
                    }
                },
                other => return other,
            }
        }

        Err(RemoteError::RateLimitExhausted {
            attempts: max_attempts,
            last: Box::new(last_error.unwrap_or(RemoteError::RateLimited {
                source_name: LOCAL_BUDGET.to_owned(),
                retry_after: None,
            })),
        })
    }
}

/// `base_delay * 2^(attempt - 1)`, saturating.
#[must_use]
pub fn backoff_delay(base_delay: Duration, attempt: u32) -> Duration {
    let factor = 2_u32.saturating_pow(attempt.saturating_sub(1));
    base_delay.saturating_mul(factor)
}

#[async_trait]
impl<A: RemoteApi> RemoteApi for RateLimitedClient<A> {
    fn instance(&self) -> &str {
        self.inner.instance()
    }

    async fn lookup_account(&self, acct: &str) -> Result<Option<RemoteAccount>, RemoteError> {
        self.call("lookup_account", || self.inner.lookup_account(acct)).await
    }

    async fn account_statuses(
        &self,
        account_id: &str,
        cursor: Option<&str>,
        limit: u32,
    ) -> Result<StatusPage, RemoteError> {
        self.call("account_statuses", || self.inner.account_statuses(account_id, cursor, limit))
            .await
    }

    async fn status(&self, id: &str) -> Result<Option<Post>, RemoteError> {
        self.call("status", || self.inner.status(id)).await
    }
}
