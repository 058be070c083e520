//! Per-instance access tokens written by the OAuth login step.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

pub(crate) fn credential_path(dir: &Path, instance: &str) -> PathBuf {
    dir.join(format!("{instance}_clientcred.secret"))
}

/// First non-empty line of `{dir}/{instance}_clientcred.secret`.
pub(crate) fn read_access_token(dir: &Path, instance: &str) -> Result<String> {
    let path = credential_path(dir, instance);
    let raw = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read credentials {}", path.display()))?;
    raw.lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_owned)
        .with_context(|| format!("no access token in {}", path.display()))
}
