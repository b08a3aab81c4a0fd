use std::path::Path;

use masterloc::atlas::{load_atlas, patch_atlas, save_atlas};

pub fn execute(reference: &Path, target: &Path, output: Option<&Path>) -> anyhow::Result<()> {
    println!("Patching {target:?} from {reference:?}");
    let reference = load_atlas(reference)?;
    let mut atlas = load_atlas(target)?;

    let report = patch_atlas(&reference, &mut atlas);
    save_atlas(&atlas, output.unwrap_or(target))?;

    for name in &report.skipped {
        println!("  skipped (not in reference): {name}");
    }
    for name in &report.mismatched {
        println!("  mismatched layout, left untouched: {name}");
    }
    println!(
        "✓ Patched {} sprite regions ({:.2?})",
        report.patched, report.elapsed
    );
    Ok(())
}
