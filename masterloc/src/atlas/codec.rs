//! Directory codec for atlas containers
//!
//! Materializes an atlas as a directory holding the texture as PNG plus one
//! `{file_name}.sprites.json` metadata file per physical container file.
//! Stands in for the proprietary container collaborator in tooling and
//! tests; the patch engine itself only sees [`SpriteAtlas`].

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{AtlasFile, Sprite, SpriteAtlas};
use crate::error::{Error, Result};
use crate::masters::store::write_json_atomic;

const META_SUFFIX: &str = ".sprites.json";

#[derive(Debug, Serialize, Deserialize)]
struct SpriteSheet {
    texture: String,
    sprites: Vec<Sprite>,
}

/// Load an atlas container from a directory.
///
/// Every metadata file must reference the same texture; a directory with no
/// metadata files is not an atlas.
pub fn load_atlas(dir: impl AsRef<Path>) -> Result<SpriteAtlas> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(Error::AtlasNotFound(dir.to_path_buf()));
    }

    let mut meta_paths: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(std::result::Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.ends_with(META_SUFFIX))
        })
        .collect();
    meta_paths.sort();
    if meta_paths.is_empty() {
        return Err(Error::AtlasNotFound(dir.to_path_buf()));
    }

    let mut texture_name: Option<String> = None;
    let mut files = Vec::with_capacity(meta_paths.len());
    for path in meta_paths {
        let sheet: SpriteSheet = serde_json::from_str(&fs::read_to_string(&path)?)?;
        match &texture_name {
            None => texture_name = Some(sheet.texture.clone()),
            Some(existing) if *existing != sheet.texture => {
                return Err(Error::AtlasFormat(format!(
                    "container files disagree on texture: '{existing}' vs '{}'",
                    sheet.texture
                )));
            }
            Some(_) => {}
        }
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(|n| n.trim_end_matches(META_SUFFIX).to_string())
            .unwrap_or_default();
        files.push(AtlasFile {
            file_name,
            sprites: sheet.sprites,
        });
    }

    let texture_name =
        texture_name.ok_or_else(|| Error::AtlasNotFound(dir.to_path_buf()))?;
    let texture_path = dir.join(&texture_name);
    if !texture_path.is_file() {
        return Err(Error::MissingTexture(texture_name));
    }
    let texture = image::open(&texture_path)?;

    tracing::debug!(
        "loaded atlas from {dir:?}: {} files, texture '{texture_name}'",
        files.len()
    );
    Ok(SpriteAtlas {
        texture_name,
        texture,
        files,
    })
}

/// Serialize every file of an atlas container to `dir`.
pub fn save_atlas(atlas: &SpriteAtlas, dir: impl AsRef<Path>) -> Result<()> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;
    atlas.texture.save(dir.join(&atlas.texture_name))?;
    for file in &atlas.files {
        let sheet = SpriteSheet {
            texture: atlas.texture_name.clone(),
            sprites: file.sprites.clone(),
        };
        write_json_atomic(&dir.join(format!("{}{META_SUFFIX}", file.file_name)), &sheet)?;
    }
    tracing::debug!("serialized atlas to {dir:?} ({} files)", atlas.files.len());
    Ok(())
}
