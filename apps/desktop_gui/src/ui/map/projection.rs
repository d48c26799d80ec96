//! Spherical Web-Mercator math for 256 px slippy-map tiles.

use std::f64::consts::PI;

use shared::geometry::GeoBounds;

pub const TILE_SIZE: f64 = 256.0;
pub const MIN_ZOOM: u8 = 0;
pub const MAX_ZOOM: u8 = 18;
const MAX_LATITUDE: f64 = 85.051_128_78;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

/// Pixel position in the world image at a given zoom.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldPoint {
    pub x: f64,
    pub y: f64,
}

pub fn world_size(zoom: u8) -> f64 {
    TILE_SIZE * f64::from(1u32 << zoom.min(MAX_ZOOM))
}

pub fn project(point: LatLon, zoom: u8) -> WorldPoint {
    let size = world_size(zoom);
    let lat = point.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
    WorldPoint {
        x: (point.lon + 180.0) / 360.0 * size,
        y: (1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / PI) / 2.0 * size,
    }
}

pub fn unproject(point: WorldPoint, zoom: u8) -> LatLon {
    let size = world_size(zoom);
    let n = PI - 2.0 * PI * point.y / size;
    LatLon {
        lat: n.sinh().atan().to_degrees(),
        lon: point.x / size * 360.0 - 180.0,
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapView {
    pub center: LatLon,
    pub zoom: u8,
}

impl MapView {
    pub fn new(center: LatLon, zoom: u8) -> Self {
        Self {
            center,
            zoom: zoom.clamp(MIN_ZOOM, MAX_ZOOM),
        }
    }

    /// World pixel shown at the top-left corner of a viewport.
    pub fn origin(&self, width: f64, height: f64) -> WorldPoint {
        let center = project(self.center, self.zoom);
        WorldPoint {
            x: center.x - width / 2.0,
            y: center.y - height / 2.0,
        }
    }

    /// Viewport-relative pixel position of a coordinate.
    pub fn to_screen(&self, point: LatLon, width: f64, height: f64) -> (f64, f64) {
        let origin = self.origin(width, height);
        let world = project(point, self.zoom);
        (world.x - origin.x, world.y - origin.y)
    }

    /// Moves the view so content follows a drag of `(dx, dy)` pixels.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        let center = project(self.center, self.zoom);
        let size = world_size(self.zoom);
        let y = (center.y - dy).clamp(0.0, size);
        let x = (center.x - dx).rem_euclid(size);
        self.center = unproject(WorldPoint { x, y }, self.zoom);
    }

    pub fn zoom_in(&mut self) {
        self.zoom = (self.zoom + 1).min(MAX_ZOOM);
    }

    pub fn zoom_out(&mut self) {
        self.zoom = self.zoom.saturating_sub(1).max(MIN_ZOOM);
    }
}

/// Largest integer zoom at which `bounds` plus `padding` on every side fits
/// the viewport, centred on the bounds.
pub fn fit_bounds(bounds: GeoBounds, width: f64, height: f64, padding: f64) -> MapView {
    let north_west = LatLon {
        lat: bounds.max_lat,
        lon: bounds.min_lon,
    };
    let south_east = LatLon {
        lat: bounds.min_lat,
        lon: bounds.max_lon,
    };

    let nw = project(north_west, MAX_ZOOM);
    let se = project(south_east, MAX_ZOOM);
    let center = unproject(
        WorldPoint {
            x: (nw.x + se.x) / 2.0,
            y: (nw.y + se.y) / 2.0,
        },
        MAX_ZOOM,
    );

    let available_w = width - 2.0 * padding;
    let available_h = height - 2.0 * padding;
    if available_w <= 0.0 || available_h <= 0.0 {
        return MapView::new(center, MIN_ZOOM);
    }

    let span_w = (se.x - nw.x).abs();
    let span_h = (se.y - nw.y).abs();
    let zoom = (MIN_ZOOM..=MAX_ZOOM)
        .rev()
        .find(|&zoom| {
            let scale = world_size(zoom) / world_size(MAX_ZOOM);
            span_w * scale <= available_w && span_h * scale <= available_h
        })
        .unwrap_or(MIN_ZOOM);

    MapView::new(center, zoom)
}
