//! Boundary map: an interactive slippy map showing one district overlay.
//!
//! `BoundaryMap` owns the map engine. The engine is built lazily on the first
//! geometry, replaced overlays never accumulate, and releasing the map drops
//! the engine together with its tile textures.

pub mod overlay;
pub mod projection;
pub mod tiles;

use std::collections::HashSet;

use eframe::egui;
use shared::geometry::Geometry;

use overlay::{BoundaryOverlay, OverlayStyle};
use projection::{fit_bounds, LatLon, MapView};
use tiles::{visible_tiles, TileCache, TileImage, TileKey, TileProvider, TileRequest};

pub const DEFAULT_CENTER: LatLon = LatLon {
    lat: 47.6062,
    lon: -122.3321,
};
pub const DEFAULT_ZOOM: u8 = 11;
pub const FIT_PADDING: f64 = 20.0;
pub const MAP_HEIGHT: f32 = 320.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapOptions {
    pub scroll_wheel_zoom: bool,
    pub zoom_controls: bool,
    pub dragging: bool,
}

impl Default for MapOptions {
    fn default() -> Self {
        // Scroll-wheel zoom stays off so the page keeps scrolling over the map.
        Self {
            scroll_wheel_zoom: false,
            zoom_controls: true,
            dragging: true,
        }
    }
}

pub struct MapEngine {
    view: MapView,
    options: MapOptions,
    overlay: Option<BoundaryOverlay>,
    needs_fit: bool,
    tiles: TileCache,
}

impl MapEngine {
    fn new(options: MapOptions) -> Self {
        Self {
            view: MapView::new(DEFAULT_CENTER, DEFAULT_ZOOM),
            options,
            overlay: None,
            needs_fit: false,
            tiles: TileCache::default(),
        }
    }

    #[cfg(test)]
    pub fn view(&self) -> MapView {
        self.view
    }

    #[cfg(test)]
    pub fn options(&self) -> MapOptions {
        self.options
    }

    #[cfg(test)]
    pub fn overlay(&self) -> Option<&BoundaryOverlay> {
        self.overlay.as_ref()
    }

    #[cfg(test)]
    pub fn overlay_count(&self) -> usize {
        usize::from(self.overlay.is_some())
    }

    #[cfg(test)]
    pub fn needs_fit(&self) -> bool {
        self.needs_fit
    }

    fn replace_overlay(&mut self, geometry: &Geometry) {
        self.overlay.take();
        let overlay = BoundaryOverlay::new(geometry.clone(), OverlayStyle::default());
        self.needs_fit = overlay.bounds().is_some();
        self.overlay = Some(overlay);
    }

    fn fit_to_overlay(&mut self, width: f64, height: f64) {
        if !self.needs_fit || width <= 0.0 || height <= 0.0 {
            return;
        }
        if let Some(bounds) = self.overlay.as_ref().and_then(BoundaryOverlay::bounds) {
            self.view = fit_bounds(bounds, width, height, FIT_PADDING);
        }
        self.needs_fit = false;
    }
}

pub struct BoundaryMap {
    provider: TileProvider,
    options: MapOptions,
    engine: Option<MapEngine>,
}

impl BoundaryMap {
    pub fn new(provider: TileProvider) -> Self {
        Self {
            provider,
            options: MapOptions::default(),
            engine: None,
        }
    }

    #[cfg(test)]
    pub fn engine(&self) -> Option<&MapEngine> {
        self.engine.as_ref()
    }

    pub fn is_mounted(&self) -> bool {
        self.engine.is_some()
    }

    /// Applies a new geometry. `None` releases the engine; anything else
    /// builds it on first use, swaps the overlay and schedules a refit.
    pub fn set_geometry(&mut self, geometry: Option<&Geometry>) {
        let Some(geometry) = geometry else {
            self.release();
            return;
        };

        let options = self.options;
        let engine = self.engine.get_or_insert_with(|| {
            tracing::debug!("creating boundary map engine");
            MapEngine::new(options)
        });
        engine.replace_overlay(geometry);
    }

    pub fn release(&mut self) {
        if self.engine.take().is_some() {
            tracing::debug!("released boundary map engine");
        }
    }

    pub fn accept_tile(&mut self, key: TileKey, image: TileImage) {
        if let Some(engine) = self.engine.as_mut() {
            engine.tiles.accept(key, image);
        }
    }

    pub fn reject_tile(&mut self, key: TileKey) {
        if let Some(engine) = self.engine.as_mut() {
            engine.tiles.fail(key);
        }
    }

    /// Draws the map and returns tiles that still need fetching.
    pub fn show(&mut self, ui: &mut egui::Ui) -> Vec<TileRequest> {
        let Some(engine) = self.engine.as_mut() else {
            return Vec::new();
        };

        let size = egui::vec2(ui.available_width(), MAP_HEIGHT);
        let (rect, response) = ui.allocate_exact_size(size, egui::Sense::drag());
        let width = f64::from(rect.width());
        let height = f64::from(rect.height());

        engine.fit_to_overlay(width, height);

        if engine.options.dragging && response.dragged() {
            let delta = response.drag_delta();
            engine.view.pan_by(f64::from(delta.x), f64::from(delta.y));
        }
        if engine.options.scroll_wheel_zoom && response.hovered() {
            let scroll = ui.input(|input| input.smooth_scroll_delta.y);
            if scroll > 0.0 {
                engine.view.zoom_in();
            } else if scroll < 0.0 {
                engine.view.zoom_out();
            }
        }

        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 6.0, egui::Color32::from_rgb(229, 227, 223));

        let visible = visible_tiles(&engine.view, width, height);
        let keys: HashSet<TileKey> = visible.iter().map(|tile| tile.key).collect();
        let tile_size = projection::TILE_SIZE as f32;
        for tile in &visible {
            let tile_rect = egui::Rect::from_min_size(
                rect.min + egui::vec2(tile.screen_x as f32, tile.screen_y as f32),
                egui::vec2(tile_size, tile_size),
            );
            match engine.tiles.texture(ui.ctx(), tile.key) {
                Some(texture) => {
                    painter.image(
                        texture.id(),
                        tile_rect,
                        egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                        egui::Color32::WHITE,
                    );
                }
                None => {
                    painter.rect_stroke(
                        tile_rect,
                        0.0,
                        egui::Stroke::new(1.0, egui::Color32::from_rgb(214, 211, 205)),
                        egui::StrokeKind::Inside,
                    );
                }
            }
        }

        if let Some(overlay) = engine.overlay.as_ref() {
            overlay.paint(&painter, &engine.view, rect);
        }

        painter.text(
            rect.right_bottom() - egui::vec2(6.0, 4.0),
            egui::Align2::RIGHT_BOTTOM,
            self.provider.attribution(),
            egui::FontId::proportional(11.0),
            egui::Color32::from_rgb(60, 60, 60),
        );

        if engine.options.zoom_controls {
            let zoom_in_rect =
                egui::Rect::from_min_size(rect.min + egui::vec2(8.0, 8.0), egui::vec2(28.0, 28.0));
            let zoom_out_rect = zoom_in_rect.translate(egui::vec2(0.0, 32.0));
            if ui.put(zoom_in_rect, egui::Button::new("+")).clicked() {
                engine.view.zoom_in();
            }
            if ui.put(zoom_out_rect, egui::Button::new("-")).clicked() {
                engine.view.zoom_out();
            }
        }

        engine.tiles.evict_outside(&keys);
        engine
            .tiles
            .request_missing(visible.iter().map(|tile| tile.key))
            .into_iter()
            .map(|key| TileRequest {
                key,
                url: self.provider.tile_url(key),
            })
            .collect()
    }
}
