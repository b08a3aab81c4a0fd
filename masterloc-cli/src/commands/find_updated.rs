use std::path::Path;

use masterloc::config::SyncPaths;
use masterloc::state::JsonStateFile;
use masterloc::sync::find_updated;

pub fn execute(root: &Path, masters: &Path) -> anyhow::Result<()> {
    let paths = SyncPaths::rooted(root);
    let state = JsonStateFile::new(&paths.state_file);

    let changed = find_updated(&state, masters)?;
    if changed.is_empty() {
        println!("No upstream files changed since the last run");
        return Ok(());
    }
    for name in &changed {
        println!("{name}");
    }
    println!("✓ {} files changed", changed.len());
    Ok(())
}
