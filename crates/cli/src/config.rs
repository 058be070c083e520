//! JSON configuration file for a backfill run.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use fedi_backfill_core::constants::{
    DEFAULT_BACKOFF_BASE_DELAY_MS, DEFAULT_MAX_ATTEMPTS, DEFAULT_MAX_CHAIN_DEPTH,
    DEFAULT_PAGE_SIZE, DEFAULT_RATE_LIMIT_CALLS, DEFAULT_RATE_LIMIT_PERIOD_SECS, MAX_PAGE_SIZE,
};
use fedi_backfill_core::AccountHandle;
use fedi_backfill_pipeline::PipelineOptions;
use fedi_backfill_remote::{RateLimitConfig, RateLimitMode};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum ModeName {
    #[default]
    Pace,
    Backoff,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct RateLimitSettings {
    pub mode: ModeName,
    pub calls: u32,
    pub period_secs: u64,
    pub base_delay_ms: u64,
    pub max_attempts: u32,
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            mode: ModeName::Pace,
            calls: DEFAULT_RATE_LIMIT_CALLS,
            period_secs: DEFAULT_RATE_LIMIT_PERIOD_SECS,
            base_delay_ms: DEFAULT_BACKOFF_BASE_DELAY_MS,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl RateLimitSettings {
    /// In pace mode `max_attempts` bounds the calls made for one operation,
    /// so the remote 429 is waited out `max_attempts - 1` times.
    pub(crate) fn to_config(&self) -> RateLimitConfig {
        let mode = match self.mode {
            ModeName::Pace => RateLimitMode::Pace { max_waits: self.max_attempts.saturating_sub(1) },
            ModeName::Backoff => RateLimitMode::Backoff {
                base_delay: Duration::from_millis(self.base_delay_ms),
                max_attempts: self.max_attempts,
            },
        };
        RateLimitConfig { calls: self.calls, period: Duration::from_secs(self.period_secs), mode }
    }
}

fn default_credentials_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_output() -> PathBuf {
    PathBuf::from("commands.sql")
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn default_max_chain_depth() -> usize {
    DEFAULT_MAX_CHAIN_DEPTH
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct BackfillConfig {
    pub accounts: Vec<String>,
    pub target_instance: String,
    pub source_instances: Vec<String>,
    #[serde(default = "default_credentials_dir")]
    pub credentials_dir: PathBuf,
    #[serde(default = "default_output")]
    pub output: PathBuf,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default = "default_max_chain_depth")]
    pub max_chain_depth: usize,
    #[serde(default)]
    pub rate_limit: RateLimitSettings,
}

pub(crate) fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("fedi-backfill")
        .join("config.json")
}

impl BackfillConfig {
    /// Reads and validates the config at `path`, or at the default location.
    pub(crate) fn load(path: Option<&Path>) -> Result<Self> {
        let path = path.map_or_else(default_config_path, Path::to_path_buf);
        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config = Self::from_json(&raw)
            .with_context(|| format!("invalid config {}", path.display()))?;
        Ok(config)
    }

    pub(crate) fn from_json(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.accounts.is_empty() {
            bail!("accounts must not be empty");
        }
        if self.source_instances.is_empty() {
            bail!("source_instances must not be empty");
        }
        if self.target_instance.trim().is_empty() {
            bail!("target_instance must not be empty");
        }
        if self.source_instances.iter().any(|s| s.trim().is_empty()) {
            bail!("source_instances must not contain empty entries");
        }
        if self.rate_limit.calls == 0 {
            bail!("rate_limit.calls must be > 0");
        }
        if self.rate_limit.period_secs == 0 {
            bail!("rate_limit.period_secs must be > 0");
        }
        if self.rate_limit.max_attempts == 0 {
            bail!("rate_limit.max_attempts must be > 0");
        }
        if !(1..=MAX_PAGE_SIZE).contains(&self.page_size) {
            bail!("page_size must be between 1 and {MAX_PAGE_SIZE}, got {}", self.page_size);
        }
        self.handles()?;
        Ok(())
    }

    /// Account handles on the target instance. A bare name takes the target
    /// domain; an explicit domain must be the target's.
    pub(crate) fn handles(&self) -> Result<Vec<AccountHandle>> {
        let target = self.target_instance.trim().trim_end_matches('/').to_lowercase();
        self.accounts
            .iter()
            .map(|raw| {
                let handle = AccountHandle::parse_with_default(raw, &target)
                    .with_context(|| format!("invalid account {raw:?}"))?;
                if handle.domain != target {
                    bail!("account {raw:?} is not on target_instance {target}");
                }
                Ok(handle)
            })
            .collect()
    }

    pub(crate) fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions { page_size: self.page_size, max_chain_depth: self.max_chain_depth }
    }
}
