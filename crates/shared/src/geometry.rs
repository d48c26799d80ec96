use serde::{Deserialize, Serialize};

/// GeoJSON position: `[longitude, latitude, ...]`.
pub type Position = Vec<f64>;

/// Closed ring of positions; the first ring of a polygon is its exterior,
/// any further rings are holes.
pub type Ring = Vec<Position>;

/// District boundary geometry. Only areal GeoJSON types are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Polygon { coordinates: Vec<Ring> },
    MultiPolygon { coordinates: Vec<Vec<Ring>> },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoBounds {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl GeoBounds {
    pub fn center(&self) -> (f64, f64) {
        (
            (self.min_lon + self.max_lon) / 2.0,
            (self.min_lat + self.max_lat) / 2.0,
        )
    }

    fn extend(&mut self, lon: f64, lat: f64) {
        self.min_lon = self.min_lon.min(lon);
        self.min_lat = self.min_lat.min(lat);
        self.max_lon = self.max_lon.max(lon);
        self.max_lat = self.max_lat.max(lat);
    }
}

impl Geometry {
    /// All rings of every polygon, exterior and holes alike.
    pub fn rings(&self) -> Vec<&[Position]> {
        match self {
            Self::Polygon { coordinates } => coordinates.iter().map(Vec::as_slice).collect(),
            Self::MultiPolygon { coordinates } => coordinates
                .iter()
                .flat_map(|polygon| polygon.iter().map(Vec::as_slice))
                .collect(),
        }
    }

    /// Bounding box over every valid position, `None` when the geometry has
    /// no usable coordinates.
    pub fn bounds(&self) -> Option<GeoBounds> {
        let mut bounds: Option<GeoBounds> = None;
        for ring in self.rings() {
            for (lon, lat) in ring.iter().filter_map(|position| lon_lat(position)) {
                match bounds.as_mut() {
                    Some(bounds) => bounds.extend(lon, lat),
                    None => {
                        bounds = Some(GeoBounds {
                            min_lon: lon,
                            min_lat: lat,
                            max_lon: lon,
                            max_lat: lat,
                        })
                    }
                }
            }
        }
        bounds
    }
}

/// Longitude/latitude of a position, skipping short or non-finite entries.
pub fn lon_lat(position: &[f64]) -> Option<(f64, f64)> {
    match position {
        [lon, lat, ..] if lon.is_finite() && lat.is_finite() => Some((*lon, *lat)),
        _ => None,
    }
}
