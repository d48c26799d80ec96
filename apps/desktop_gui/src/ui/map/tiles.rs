//! Basemap tiles: addressing, provider URLs, decoding and the per-engine cache.

use std::collections::{HashMap, HashSet};

use eframe::egui;

use super::projection::{world_size, MapView, TILE_SIZE};

const MAX_CACHED_TILES: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileKey {
    pub zoom: u8,
    pub x: u32,
    pub y: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileProvider {
    url_template: String,
    attribution: String,
}

impl TileProvider {
    pub fn new(url_template: impl Into<String>, attribution: impl Into<String>) -> Self {
        Self {
            url_template: url_template.into(),
            attribution: attribution.into(),
        }
    }

    pub fn attribution(&self) -> &str {
        &self.attribution
    }

    pub fn tile_url(&self, key: TileKey) -> String {
        self.url_template
            .replace("{s}", "a")
            .replace("{z}", &key.zoom.to_string())
            .replace("{x}", &key.x.to_string())
            .replace("{y}", &key.y.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct TileRequest {
    pub key: TileKey,
    pub url: String,
}

#[derive(Clone)]
pub struct TileImage {
    width: usize,
    height: usize,
    rgba: Vec<u8>,
}

impl TileImage {
    fn color_image(&self) -> egui::ColorImage {
        egui::ColorImage::from_rgba_unmultiplied([self.width, self.height], &self.rgba)
    }
}

pub fn decode_tile_image(bytes: &[u8]) -> Result<TileImage, String> {
    let decoded = image::load_from_memory(bytes).map_err(|err| err.to_string())?;
    let rgba = decoded.to_rgba8();
    let width = rgba.width() as usize;
    let height = rgba.height() as usize;
    Ok(TileImage {
        width,
        height,
        rgba: rgba.into_raw(),
    })
}

/// A tile placement within the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibleTile {
    pub key: TileKey,
    pub screen_x: f64,
    pub screen_y: f64,
}

/// Tiles covering a viewport. Columns wrap around the antimeridian; rows
/// outside the world are skipped.
pub fn visible_tiles(view: &MapView, width: f64, height: f64) -> Vec<VisibleTile> {
    let origin = view.origin(width, height);
    let tiles_per_axis = (world_size(view.zoom) / TILE_SIZE) as i64;

    let first_col = (origin.x / TILE_SIZE).floor() as i64;
    let last_col = ((origin.x + width) / TILE_SIZE).floor() as i64;
    let first_row = (origin.y / TILE_SIZE).floor() as i64;
    let last_row = ((origin.y + height) / TILE_SIZE).floor() as i64;

    let mut tiles = Vec::new();
    for row in first_row..=last_row {
        if row < 0 || row >= tiles_per_axis {
            continue;
        }
        for col in first_col..=last_col {
            tiles.push(VisibleTile {
                key: TileKey {
                    zoom: view.zoom,
                    x: col.rem_euclid(tiles_per_axis) as u32,
                    y: row as u32,
                },
                screen_x: col as f64 * TILE_SIZE - origin.x,
                screen_y: row as f64 * TILE_SIZE - origin.y,
            });
        }
    }
    tiles
}

enum TileSlot {
    Pending,
    Ready {
        image: TileImage,
        texture: Option<egui::TextureHandle>,
    },
    Failed,
}

#[derive(Default)]
pub(crate) struct TileCache {
    slots: HashMap<TileKey, TileSlot>,
}

impl TileCache {
    /// Marks unseen keys as pending and returns them for fetching.
    pub fn request_missing(&mut self, keys: impl IntoIterator<Item = TileKey>) -> Vec<TileKey> {
        let mut missing = Vec::new();
        for key in keys {
            if !self.slots.contains_key(&key) {
                self.slots.insert(key, TileSlot::Pending);
                missing.push(key);
            }
        }
        missing
    }

    /// Stores a fetched tile. Tiles nobody asked for are dropped.
    pub fn accept(&mut self, key: TileKey, image: TileImage) -> bool {
        match self.slots.get_mut(&key) {
            Some(slot) if matches!(slot, TileSlot::Pending) => {
                *slot = TileSlot::Ready {
                    image,
                    texture: None,
                };
                true
            }
            _ => false,
        }
    }

    pub fn fail(&mut self, key: TileKey) {
        if let Some(slot) = self.slots.get_mut(&key) {
            if matches!(slot, TileSlot::Pending) {
                *slot = TileSlot::Failed;
            }
        }
    }

    #[cfg(test)]
    pub fn is_pending(&self, key: TileKey) -> bool {
        matches!(self.slots.get(&key), Some(TileSlot::Pending))
    }

    #[cfg(test)]
    pub fn is_ready(&self, key: TileKey) -> bool {
        matches!(self.slots.get(&key), Some(TileSlot::Ready { .. }))
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Texture for a ready tile, uploaded on first use.
    pub fn texture(&mut self, ctx: &egui::Context, key: TileKey) -> Option<egui::TextureHandle> {
        let TileSlot::Ready { image, texture } = self.slots.get_mut(&key)? else {
            return None;
        };
        if texture.is_none() {
            *texture = Some(ctx.load_texture(
                format!("map_tile_{}_{}_{}", key.zoom, key.x, key.y),
                image.color_image(),
                egui::TextureOptions::LINEAR,
            ));
        }
        texture.clone()
    }

    /// Drops settled tiles outside `keep` once the cache grows past its cap.
    pub fn evict_outside(&mut self, keep: &HashSet<TileKey>) {
        if self.slots.len() <= MAX_CACHED_TILES {
            return;
        }
        self.slots
            .retain(|key, slot| keep.contains(key) || matches!(slot, TileSlot::Pending));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::map::projection::LatLon;

    fn tiny_png() -> Vec<u8> {
        let mut bytes = Vec::new();
        image::RgbaImage::from_pixel(2, 2, image::Rgba([10, 20, 30, 255]))
            .write_to(
                &mut std::io::Cursor::new(&mut bytes),
                image::ImageFormat::Png,
            )
            .expect("encode png");
        bytes
    }

    #[test]
    fn provider_fills_url_template() {
        let provider = TileProvider::new(
            "https://{s}.tile.example.org/{z}/{x}/{y}.png",
            "© Example",
        );
        let url = provider.tile_url(TileKey {
            zoom: 11,
            x: 328,
            y: 715,
        });
        assert_eq!(url, "https://a.tile.example.org/11/328/715.png");
    }

    #[test]
    fn decodes_png_tiles_to_rgba() {
        let tile = decode_tile_image(&tiny_png()).expect("decode");
        assert_eq!((tile.width, tile.height), (2, 2));
        assert_eq!(&tile.rgba[..4], &[10, 20, 30, 255]);
        assert!(decode_tile_image(b"not an image").is_err());
    }

    #[test]
    fn visible_tiles_cover_the_viewport() {
        let view = MapView::new(
            LatLon {
                lat: 47.6062,
                lon: -122.3321,
            },
            11,
        );
        let tiles = visible_tiles(&view, 640.0, 320.0);
        assert!(!tiles.is_empty());
        assert!(tiles.iter().all(|tile| tile.key.zoom == 11));
        assert!(tiles.iter().any(|tile| tile.screen_x <= 0.0 && tile.screen_y <= 0.0));
        assert!(tiles
            .iter()
            .any(|tile| tile.screen_x + TILE_SIZE >= 640.0 && tile.screen_y + TILE_SIZE >= 320.0));
    }

    #[test]
    fn world_view_wraps_columns_and_skips_rows_outside_the_world() {
        let view = MapView::new(LatLon { lat: 0.0, lon: 0.0 }, 0);
        let tiles = visible_tiles(&view, 1024.0, 1024.0);
        assert!(tiles.iter().all(|tile| tile.key.x == 0 && tile.key.y == 0));
        assert!(tiles.len() >= 3);
    }

    #[test]
    fn cache_requests_each_tile_once_and_ignores_unrequested_tiles() {
        let mut cache = TileCache::default();
        let key = TileKey { zoom: 3, x: 1, y: 2 };
        let other = TileKey { zoom: 3, x: 2, y: 2 };

        assert_eq!(cache.request_missing([key]), vec![key]);
        assert!(cache.request_missing([key]).is_empty());
        assert!(cache.is_pending(key));

        let image = decode_tile_image(&tiny_png()).expect("decode");
        assert!(!cache.accept(other, image.clone()));
        assert!(cache.accept(key, image));
        assert!(cache.is_ready(key));
        assert_eq!(cache.len(), 1);
    }
}
