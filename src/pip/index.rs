//! Spatial index for fast area lookups over located records.

use rstar::{RTree, RTreeObject, AABB};
use tracing::{debug, info};

use super::{is_inside, Located};
use crate::models::{LatLng, Ring};

/// A located record, remembered by its position in the source slice
#[derive(Debug, Clone, Copy)]
struct IndexedPoint {
    position: usize,
    point: LatLng,
}

impl RTreeObject for IndexedPoint {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.point.lng, self.point.lat])
    }
}

/// R-tree over record locations.
///
/// The ring's bounding box narrows the candidates and exact ray casting
/// decides the rest, so results match [`super::filter_inside`].
pub struct LocationIndex {
    tree: RTree<IndexedPoint>,
    /// Records that had no usable location
    unlocated: usize,
}

impl LocationIndex {
    /// Build an index over `records`. Positions refer to this slice.
    pub fn build<R: Located>(records: &[R]) -> Self {
        let indexed: Vec<IndexedPoint> = records
            .iter()
            .enumerate()
            .filter_map(|(position, r)| r.location().map(|point| IndexedPoint { position, point }))
            .collect();

        let unlocated = records.len() - indexed.len();
        let tree = RTree::bulk_load(indexed);

        info!(
            "Location index built with {} entries ({} records without coordinates)",
            tree.size(),
            unlocated
        );

        Self { tree, unlocated }
    }

    /// Positions of the records inside `ring`, ascending.
    pub fn within(&self, ring: &Ring) -> Vec<usize> {
        if !ring.encloses_area() {
            return Vec::new();
        }
        let Some(bbox) = ring.bounding_box() else {
            return Vec::new();
        };

        let (min, max) = bbox.corners();
        let envelope = AABB::from_corners(min, max);

        let mut candidates = 0usize;
        let mut positions: Vec<usize> = self
            .tree
            .locate_in_envelope(&envelope)
            .inspect(|_| candidates += 1)
            .filter(|ip| is_inside(ip.point, ring.vertices()))
            .map(|ip| ip.position)
            .collect();

        positions.sort_unstable();

        debug!(
            "Area lookup: {} of {} indexed points in bbox, {} inside",
            candidates,
            self.tree.size(),
            positions.len()
        );

        positions
    }

    /// Get total number of indexed records
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    pub fn unlocated(&self) -> usize {
        self.unlocated
    }
}
