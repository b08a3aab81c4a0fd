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
    let reports = runner.sync_all()?;

    for report in &reports {
        println!(
            "{}: {} records, {} newly translated, {} unresolved ({:.2?})",
            report.table,
            report.total,
            report.newly_translated,
            report.unresolved_fields,
            report.elapsed
        );
    }
    println!("✓ Synchronized {} tables", reports.len());
    Ok(())
}
