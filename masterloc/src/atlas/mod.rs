//! Sprite atlas model and patch engine
//!
//! A sprite atlas container holds one texture plus named rectangular regions
//! described in the texture's own pixel space with a **bottom-left** origin
//! (row 0 is the bottom of the image). One container may span several
//! physical files that all reference the same texture. Once loaded for
//! editing, the texture lives in the usual top-left-origin representation.

mod codec;
mod patcher;

pub use codec::{load_atlas, save_atlas};
pub use patcher::{patch_atlas, PatchReport};

use std::collections::HashMap;

use image::DynamicImage;
use serde::{Deserialize, Serialize};

/// Sprite rectangle in bottom-left-origin texture space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpriteRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl SpriteRect {
    /// Integer-truncated size; the unit of layout comparison between
    /// releases.
    pub fn size_px(&self) -> (u32, u32) {
        (self.width as u32, self.height as u32)
    }

    /// Top-left-origin position of this rect inside an image of the given
    /// dimensions, or `None` when the rect does not fit.
    pub fn top_left_in(&self, image_width: u32, image_height: u32) -> Option<(u32, u32)> {
        let (w, h) = self.size_px();
        let x = self.x as u32;
        let y = self.y as u32;
        if u64::from(x) + u64::from(w) > u64::from(image_width)
            || u64::from(y) + u64::from(h) > u64::from(image_height)
        {
            return None;
        }
        Some((x, image_height - (y + h)))
    }
}

/// A named rectangular region of the atlas texture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sprite {
    pub name: String,
    pub rect: SpriteRect,
}

/// One physical file of the atlas container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtlasFile {
    pub file_name: String,
    pub sprites: Vec<Sprite>,
}

/// In-memory atlas container: one texture shared by every physical file.
#[derive(Debug, Clone)]
pub struct SpriteAtlas {
    pub texture_name: String,
    pub texture: DynamicImage,
    pub files: Vec<AtlasFile>,
}

impl SpriteAtlas {
    /// Every sprite across every physical file, in file order.
    pub fn sprites(&self) -> impl Iterator<Item = &Sprite> {
        self.files.iter().flat_map(|file| file.sprites.iter())
    }

    /// Name-keyed sprite index; on duplicate names across files the first
    /// occurrence wins.
    pub fn sprite_index(&self) -> HashMap<&str, &Sprite> {
        let mut index = HashMap::new();
        for sprite in self.sprites() {
            index.entry(sprite.name.as_str()).or_insert(sprite);
        }
        index
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_origin_flip() {
        // A 4px-tall sprite whose bottom edge sits 2px above the image
        // bottom, in a 16px-tall image: its top edge is 10px from the top.
        let rect = SpriteRect {
            x: 3.0,
            y: 2.0,
            width: 5.0,
            height: 4.0,
        };
        assert_eq!(rect.top_left_in(16, 16), Some((3, 10)));
    }

    #[test]
    fn test_rect_outside_image_does_not_fit() {
        let rect = SpriteRect {
            x: 14.0,
            y: 0.0,
            width: 5.0,
            height: 4.0,
        };
        assert_eq!(rect.top_left_in(16, 16), None);
    }

    #[test]
    fn test_sprite_index_first_occurrence_wins() {
        let atlas = SpriteAtlas {
            texture_name: "tex.png".into(),
            texture: DynamicImage::new_rgba8(4, 4),
            files: vec![
                AtlasFile {
                    file_name: "a".into(),
                    sprites: vec![Sprite {
                        name: "icon".into(),
                        rect: SpriteRect { x: 0.0, y: 0.0, width: 1.0, height: 1.0 },
                    }],
                },
                AtlasFile {
                    file_name: "b".into(),
                    sprites: vec![Sprite {
                        name: "icon".into(),
                        rect: SpriteRect { x: 2.0, y: 2.0, width: 1.0, height: 1.0 },
                    }],
                },
            ],
        };
        let index = atlas.sprite_index();
        assert_eq!(index.len(), 1);
        assert_eq!(index["icon"].rect.x, 0.0);
    }
}
