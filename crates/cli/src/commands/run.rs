//! Full backfill: every source × account, then one script on disk.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use fedi_backfill_export::write_script;
use fedi_backfill_pipeline::{run_all, RunSummary};

use crate::commands::build_clients;
use crate::config::BackfillConfig;

pub(crate) async fn run(config_path: Option<PathBuf>, output: Option<PathBuf>) -> Result<()> {
    let config = BackfillConfig::load(config_path.as_deref())?;
    let handles = config.handles()?;
    let clients = build_clients(&config)?;
    let output = output.unwrap_or_else(|| config.output.clone());

    println!(
        "Backfilling {} account(s) from {} source instance(s)...",
        handles.len(),
        clients.len()
    );
    let summary = run_all(&clients, &handles, config.pipeline_options()).await;
    print_summary(&summary);

    if summary.all_failed() {
        bail!("every source/account pair failed, nothing written");
    }

    let statements = summary.statements();
    write_script(&output, &statements)
        .with_context(|| format!("failed to write {}", output.display()))?;
    println!("\nWrote {} statement(s) to {}", statements.len(), output.display());
    Ok(())
}

fn print_summary(summary: &RunSummary) {
    for run in &summary.runs {
        let r = &run.report;
        println!("{} on {}:", r.account, r.source);
        println!("  fetched: {}", r.fetched);
        println!("  ancestors fetched: {}", r.ancestors);
        println!("  retained: {}, dropped: {}", r.retained, r.dropped);
        if !r.failed.is_empty() {
            println!("  encode failures: {} ({})", r.failed.len(), r.failed.join(", "));
        }
    }
    for failure in &summary.failures {
        println!("{} on {}: FAILED ({})", failure.account, failure.source, failure.error);
    }
    println!(
        "Total: {} statement(s), {} pair(s) ok, {} failed",
        summary.total_statements(),
        summary.runs.len(),
        summary.failures.len()
    );
}
