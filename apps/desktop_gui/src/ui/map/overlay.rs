use eframe::egui;
use shared::geometry::{lon_lat, GeoBounds, Geometry};

use super::projection::{LatLon, MapView};

const FILL_ROW_HEIGHT: f32 = 2.0;

#[derive(Debug, Clone, Copy)]
pub struct OverlayStyle {
    pub fill: egui::Color32,
    pub stroke: egui::Stroke,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            fill: egui::Color32::from_rgba_unmultiplied(51, 136, 255, 51),
            stroke: egui::Stroke::new(2.0, egui::Color32::from_rgb(51, 136, 255)),
        }
    }
}

/// A district boundary drawn on the map.
pub struct BoundaryOverlay {
    geometry: Geometry,
    bounds: Option<GeoBounds>,
    style: OverlayStyle,
}

impl BoundaryOverlay {
    pub fn new(geometry: Geometry, style: OverlayStyle) -> Self {
        let bounds = geometry.bounds();
        Self {
            geometry,
            bounds,
            style,
        }
    }

    #[cfg(test)]
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn bounds(&self) -> Option<GeoBounds> {
        self.bounds
    }

    /// Every ring projected into painter coordinates for `rect`.
    pub fn screen_rings(&self, view: &MapView, rect: egui::Rect) -> Vec<Vec<egui::Pos2>> {
        let width = f64::from(rect.width());
        let height = f64::from(rect.height());
        self.geometry
            .rings()
            .into_iter()
            .map(|ring| {
                ring.iter()
                    .filter_map(|position| lon_lat(position))
                    .map(|(lon, lat)| {
                        let (x, y) = view.to_screen(LatLon { lat, lon }, width, height);
                        rect.min + egui::vec2(x as f32, y as f32)
                    })
                    .collect::<Vec<_>>()
            })
            .filter(|ring| ring.len() >= 3)
            .collect()
    }

    pub fn paint(&self, painter: &egui::Painter, view: &MapView, rect: egui::Rect) {
        let rings = self.screen_rings(view, rect);
        if rings.is_empty() {
            return;
        }

        // egui only fills convex shapes, so districts are filled row by row.
        let mut y = rect.top();
        while y < rect.bottom() {
            let sample_y = y + FILL_ROW_HEIGHT / 2.0;
            for (start, end) in scanline_spans(&rings, sample_y) {
                let left = start.max(rect.left());
                let right = end.min(rect.right());
                if right > left {
                    painter.rect_filled(
                        egui::Rect::from_min_max(
                            egui::pos2(left, y),
                            egui::pos2(right, (y + FILL_ROW_HEIGHT).min(rect.bottom())),
                        ),
                        0.0,
                        self.style.fill,
                    );
                }
            }
            y += FILL_ROW_HEIGHT;
        }

        for ring in rings {
            painter.add(egui::Shape::closed_line(ring, self.style.stroke));
        }
    }
}

/// Horizontal spans inside the rings at height `y`, using the even-odd rule
/// so holes and multipolygon members both come out right.
pub fn scanline_spans(rings: &[Vec<egui::Pos2>], y: f32) -> Vec<(f32, f32)> {
    let mut crossings = Vec::new();
    for ring in rings {
        let count = ring.len();
        for index in 0..count {
            let a = ring[index];
            let b = ring[(index + 1) % count];
            if (a.y <= y && b.y > y) || (b.y <= y && a.y > y) {
                let t = (y - a.y) / (b.y - a.y);
                crossings.push(a.x + t * (b.x - a.x));
            }
        }
    }

    crossings.sort_by(|a, b| a.total_cmp(b));
    crossings
        .chunks_exact(2)
        .map(|pair| (pair[0], pair[1]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use eframe::egui::pos2;

    fn square(min: f32, max: f32) -> Vec<egui::Pos2> {
        vec![pos2(min, min), pos2(max, min), pos2(max, max), pos2(min, max)]
    }

    #[test]
    fn scanline_covers_a_simple_square() {
        let spans = scanline_spans(&[square(10.0, 20.0)], 15.0);
        assert_eq!(spans, vec![(10.0, 20.0)]);
        assert!(scanline_spans(&[square(10.0, 20.0)], 25.0).is_empty());
    }

    #[test]
    fn scanline_leaves_holes_unfilled() {
        let spans = scanline_spans(&[square(0.0, 30.0), square(10.0, 20.0)], 15.0);
        assert_eq!(spans, vec![(0.0, 10.0), (20.0, 30.0)]);
    }

    #[test]
    fn scanline_handles_concave_rings() {
        // U shape opening upwards.
        let ring = vec![
            pos2(0.0, 0.0),
            pos2(10.0, 0.0),
            pos2(10.0, 20.0),
            pos2(20.0, 20.0),
            pos2(20.0, 0.0),
            pos2(30.0, 0.0),
            pos2(30.0, 30.0),
            pos2(0.0, 30.0),
        ];
        assert_eq!(
            scanline_spans(&[ring.clone()], 10.0),
            vec![(0.0, 10.0), (20.0, 30.0)]
        );
        assert_eq!(scanline_spans(&[ring], 25.0), vec![(0.0, 30.0)]);
    }

    #[test]
    fn degenerate_rings_are_not_projected() {
        let overlay = BoundaryOverlay::new(
            Geometry::Polygon {
                coordinates: vec![vec![vec![-122.3, 47.6], vec![-122.2, 47.6]]],
            },
            OverlayStyle::default(),
        );
        let view = MapView::new(
            LatLon {
                lat: 47.6,
                lon: -122.3,
            },
            11,
        );
        let rect = egui::Rect::from_min_size(pos2(0.0, 0.0), egui::vec2(640.0, 320.0));
        assert!(overlay.screen_rings(&view, rect).is_empty());
        assert!(overlay.bounds().is_some());
    }
}
