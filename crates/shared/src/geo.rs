//! Geographic constants and bounds math for the search map.
//!
//! Coordinates follow Leaflet's `(lat, lng)` order; GeoJSON positions are
//! `[lng, lat]` and are swapped on the way in.

use serde::{Deserialize, Serialize};

use crate::models::Geometry;

/// Initial map view, centered on the Netherlands.
pub const MAP_CENTER_LAT: f64 = 52.3;
pub const MAP_CENTER_LNG: f64 = 5.5;
pub const MAP_ZOOM: u8 = 7;

pub const TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
pub const TILE_MAX_ZOOM: u8 = 18;
pub const TILE_ATTRIBUTION: &str =
    "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors";

/// Fraction of the result extent added on each side when fitting the view.
pub const FIT_PADDING: f64 = 0.1;

/// Stroke and fill of result footprints.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayStyle {
    pub color: &'static str,
    pub weight: f64,
    pub opacity: f64,
    pub fill_opacity: f64,
}

pub const RESULT_STYLE: OverlayStyle = OverlayStyle {
    color: "#3388ff",
    weight: 2.0,
    opacity: 0.7,
    fill_opacity: 0.1,
};

/// Stroke of the user-drawn AOI.
pub const AOI_COLOR: &str = "#008f39";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLngBounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl LatLngBounds {
    pub fn from_point(p: LatLng) -> Self {
        LatLngBounds {
            south: p.lat,
            west: p.lng,
            north: p.lat,
            east: p.lng,
        }
    }

    pub fn extend(&mut self, p: LatLng) {
        self.south = self.south.min(p.lat);
        self.west = self.west.min(p.lng);
        self.north = self.north.max(p.lat);
        self.east = self.east.max(p.lng);
    }

    pub fn union(&mut self, other: &LatLngBounds) {
        self.extend(LatLng { lat: other.south, lng: other.west });
        self.extend(LatLng { lat: other.north, lng: other.east });
    }

    /// Grow the box by `ratio` of its height/width on every side.
    pub fn pad(&self, ratio: f64) -> Self {
        let h = (self.north - self.south).abs() * ratio;
        let w = (self.east - self.west).abs() * ratio;
        LatLngBounds {
            south: self.south - h,
            west: self.west - w,
            north: self.north + h,
            east: self.east + w,
        }
    }
}

/// Convert a GeoJSON `[lng, lat, ...]` position. Positions with fewer than
/// two finite ordinates are skipped.
pub fn position_to_latlng(position: &[f64]) -> Option<LatLng> {
    match position {
        [lng, lat, ..] if lng.is_finite() && lat.is_finite() => Some(LatLng {
            lat: *lat,
            lng: *lng,
        }),
        _ => None,
    }
}

/// Bounding box of a geometry, `None` when it has no usable position.
pub fn geometry_bounds(geometry: &Geometry) -> Option<LatLngBounds> {
    let mut points = geometry.positions().filter_map(|p| position_to_latlng(p));
    let mut bounds = LatLngBounds::from_point(points.next()?);
    for p in points {
        bounds.extend(p);
    }
    Some(bounds)
}

/// Combined bounding box of several geometries.
pub fn combined_bounds<'a>(geometries: impl IntoIterator<Item = &'a Geometry>) -> Option<LatLngBounds> {
    geometries
        .into_iter()
        .filter_map(geometry_bounds)
        .reduce(|mut acc, b| {
            acc.union(&b);
            acc
        })
}
