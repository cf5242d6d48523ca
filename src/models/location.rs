//! Flat-plane geometry used by the area filter.
//!
//! Latitude is the vertical axis and longitude the horizontal one. This is a
//! UI-scale approximation, not a geodesic model.

use geo::{BoundingRect, Coord, LineString};

use crate::pip::is_inside;

/// Geographic point (lat/lng)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }
}

/// An implicitly closed polygon boundary.
///
/// The last vertex connects back to the first. Rings with fewer than three
/// vertices are valid values but enclose nothing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ring {
    vertices: Vec<LatLng>,
}

impl Ring {
    pub fn from_lat_lng(vertices: Vec<LatLng>) -> Self {
        Self { vertices }
    }

    /// Build a ring from `[lng, lat]` pairs, the GeoJSON axis order.
    pub fn from_lng_lat_pairs(pairs: &[[f64; 2]]) -> Self {
        Self {
            vertices: pairs.iter().map(|[lng, lat]| LatLng::new(*lat, *lng)).collect(),
        }
    }

    pub fn vertices(&self) -> &[LatLng] {
        &self.vertices
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// True when the ring has enough vertices to enclose an area.
    pub fn encloses_area(&self) -> bool {
        self.vertices.len() >= 3
    }

    /// Ray-casting containment test. See [`is_inside`].
    pub fn contains(&self, point: LatLng) -> bool {
        is_inside(point, &self.vertices)
    }

    /// Same ring walked in the opposite direction.
    pub fn reversed(&self) -> Self {
        let mut vertices = self.vertices.clone();
        vertices.reverse();
        Self { vertices }
    }

    /// Drop a trailing vertex that repeats the first one.
    pub(crate) fn strip_closing_vertex(&mut self) {
        if self.vertices.len() > 1 && self.vertices.first() == self.vertices.last() {
            self.vertices.pop();
        }
    }

    pub fn bounding_box(&self) -> Option<BoundingBox> {
        let line: LineString<f64> = self
            .vertices
            .iter()
            .map(|v| Coord { x: v.lng, y: v.lat })
            .collect();

        line.bounding_rect().map(|rect| BoundingBox {
            min_lat: rect.min().y,
            min_lng: rect.min().x,
            max_lat: rect.max().y,
            max_lng: rect.max().x,
        })
    }
}

/// Axis-aligned bounding box, inclusive on every side
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub min_lng: f64,
    pub max_lat: f64,
    pub max_lng: f64,
}

impl BoundingBox {
    pub fn contains(&self, point: LatLng) -> bool {
        point.lat >= self.min_lat
            && point.lat <= self.max_lat
            && point.lng >= self.min_lng
            && point.lng <= self.max_lng
    }

    /// Corners in `[lng, lat]` order, as stored in the spatial index
    pub fn corners(&self) -> ([f64; 2], [f64; 2]) {
        ([self.min_lng, self.min_lat], [self.max_lng, self.max_lat])
    }
}
