use std::path::Path;

use masterloc::config::SyncPaths;
use masterloc::state::{JsonStateFile, RunContext};
use masterloc::sync::SyncRunner;

pub fn execute(
    root: &Path,
    config: Option<&Path>,
    translator: &str,
    premium: Option<&str>,
) -> anyhow::Result<()> {
    let config = super::load_config(config)?;
    let paths = SyncPaths::rooted(root);
    let resolver = super::build_resolver(&config, &paths, translator, premium)?;
    let state = JsonStateFile::new(&paths.state_file);

    let runner = SyncRunner::new(&resolver, &config, paths, &state, RunContext::begin());
    let reports = runner.update_watched()?;

    if reports.is_empty() {
        println!("No watched tables have pending snapshots");
        return Ok(());
    }
    for report in &reports {
        println!(
            "{}: {} fields updated, {} failed ({:.2?})",
            report.table, report.updated_fields, report.failed_fields, report.elapsed
        );
    }
    println!("✓ Updated {} watched tables", reports.len());
    Ok(())
}
