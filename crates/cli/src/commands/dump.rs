use std::path::PathBuf;

use anyhow::{bail, Result};
use fedi_backfill_core::Post;
use fedi_backfill_pipeline::run_all;

use crate::commands::build_clients;
use crate::config::BackfillConfig;

pub(crate) async fn run(config_path: Option<PathBuf>) -> Result<()> {
    let config = BackfillConfig::load(config_path.as_deref())?;
    let handles = config.handles()?;
    let clients = build_clients(&config)?;

    let summary = run_all(&clients, &handles, config.pipeline_options()).await;
    for failure in &summary.failures {
        eprintln!("{} on {}: {}", failure.account, failure.source, failure.error);
    }
    if summary.all_failed() {
        bail!("every source/account pair failed");
    }

    let posts: Vec<&Post> = summary.runs.iter().flat_map(|r| r.posts.iter()).collect();
    println!("{}", serde_json::to_string_pretty(&posts)?);
    Ok(())
}
