//! Decoding of the `area` search parameter.
//!
//! The map widget sends the drawn shape as a GeoJSON `Feature` with a
//! `Polygon` geometry. Positions are `[lng, lat]` and get swapped into
//! [`LatLng`] here, before anything reaches the containment test.

use serde::Deserialize;
use thiserror::Error;

use crate::models::{LatLng, Ring};

#[derive(Debug, Error)]
pub enum AreaError {
    #[error("area is not valid GeoJSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("unsupported geometry type '{0}', expected Polygon")]
    UnsupportedGeometry(String),

    #[error("position {index} has {len} values, expected at least 2")]
    ShortPosition { index: usize, len: usize },

    #[error("position {index} has a non-finite coordinate")]
    NonFiniteCoordinate { index: usize },

    #[error("polygon has {count} vertices, limit is {limit}")]
    TooManyVertices { count: usize, limit: usize },
}

/// Either a `Feature` wrapping a geometry or a bare geometry.
#[derive(Debug, Deserialize)]
struct AreaDocument {
    #[serde(rename = "type")]
    doc_type: String,
    #[serde(default)]
    geometry: Option<Box<AreaDocument>>,
    #[serde(default)]
    coordinates: serde_json::Value,
}

/// Parse a GeoJSON polygon into a lat/lng ring.
///
/// Only the outer ring is used. A feature without geometry, or a polygon
/// without an outer ring, yields an empty ring that encloses nothing.
pub fn parse_area(raw: &str, max_vertices: usize) -> Result<Ring, AreaError> {
    let mut doc: AreaDocument = serde_json::from_str(raw)?;

    if doc.doc_type == "Feature" {
        doc = match doc.geometry {
            Some(geometry) => *geometry,
            None => return Ok(Ring::default()),
        };
    }

    if doc.doc_type != "Polygon" {
        return Err(AreaError::UnsupportedGeometry(doc.doc_type));
    }

    let rings: Vec<Vec<Vec<f64>>> = if doc.coordinates.is_null() {
        Vec::new()
    } else {
        serde_json::from_value(doc.coordinates)?
    };

    let outer = match rings.into_iter().next() {
        Some(outer) => outer,
        None => return Ok(Ring::default()),
    };

    let mut vertices = Vec::with_capacity(outer.len());
    for (index, position) in outer.iter().enumerate() {
        if position.len() < 2 {
            return Err(AreaError::ShortPosition {
                index,
                len: position.len(),
            });
        }
        let point = LatLng::new(position[1], position[0]);
        if !point.is_finite() {
            return Err(AreaError::NonFiniteCoordinate { index });
        }
        vertices.push(point);
    }

    let mut ring = Ring::from_lat_lng(vertices);
    ring.strip_closing_vertex();

    if ring.len() > max_vertices {
        return Err(AreaError::TooManyVertices {
            count: ring.len(),
            limit: max_vertices,
        });
    }

    Ok(ring)
}
