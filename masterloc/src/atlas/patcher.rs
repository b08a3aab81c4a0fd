//! Sprite region transplantation between atlas releases

use std::time::{Duration, Instant};

use image::{imageops, DynamicImage};

use super::SpriteAtlas;

/// Outcome of one atlas patch operation.
#[derive(Debug, Clone, Default)]
pub struct PatchReport {
    /// Regions transplanted pixel-for-pixel.
    pub patched: usize,
    /// Target sprites with no counterpart in the reference atlas.
    pub skipped: Vec<String>,
    /// Sprites whose region layout changed upstream (or no longer fits the
    /// texture); transplanting them blind would corrupt the image.
    pub mismatched: Vec<String>,
    pub elapsed: Duration,
}

/// Transplant every localized sprite region from `reference` into `target`,
/// matching regions by name and remapping rectangles between the two
/// textures.
///
/// Both textures are converted to 4-channel top-left-origin buffers once per
/// call, not per sprite. Sprites missing from the reference are recorded as
/// skipped; sprites whose truncated width or height differ are recorded as
/// mismatched and leave the target pixels untouched. The mutated texture is
/// written back into `target`'s in-memory representation; serializing the
/// container files is the caller's job because one atlas may span several
/// physical files referencing the same texture.
pub fn patch_atlas(reference: &SpriteAtlas, target: &mut SpriteAtlas) -> PatchReport {
    let start = Instant::now();
    let mut report = PatchReport::default();

    let reference_rgba = reference.texture.to_rgba8();
    let mut target_rgba = target.texture.to_rgba8();
    let (reference_w, reference_h) = reference_rgba.dimensions();
    let (target_w, target_h) = target_rgba.dimensions();

    let reference_index = reference.sprite_index();

    let target_sprites: Vec<_> = target.sprites().cloned().collect();
    for sprite in &target_sprites {
        let Some(source) = reference_index.get(sprite.name.as_str()) else {
            tracing::debug!("sprite '{}' absent from reference, skipped", sprite.name);
            report.skipped.push(sprite.name.clone());
            continue;
        };

        let source_size = source.rect.size_px();
        let target_size = sprite.rect.size_px();
        if source_size != target_size {
            tracing::debug!(
                "sprite '{}' changed layout: {source_size:?} vs {target_size:?}",
                sprite.name
            );
            report.mismatched.push(sprite.name.clone());
            continue;
        }

        let positions = (
            source.rect.top_left_in(reference_w, reference_h),
            sprite.rect.top_left_in(target_w, target_h),
        );
        let ((src_x, src_y), (dst_x, dst_y)) = match positions {
            (Some(src), Some(dst)) => (src, dst),
            _ => {
                tracing::debug!("sprite '{}' rect falls outside its texture", sprite.name);
                report.mismatched.push(sprite.name.clone());
                continue;
            }
        };

        let (w, h) = source_size;
        let region = imageops::crop_imm(&reference_rgba, src_x, src_y, w, h).to_image();
        imageops::replace(&mut target_rgba, &region, i64::from(dst_x), i64::from(dst_y));
        report.patched += 1;
    }

    target.texture = DynamicImage::ImageRgba8(target_rgba);
    report.elapsed = start.elapsed();
    tracing::info!(
        "atlas patch: {} regions transplanted, {} skipped, {} mismatched in {:.2?}",
        report.patched,
        report.skipped.len(),
        report.mismatched.len(),
        report.elapsed
    );
    report
}
