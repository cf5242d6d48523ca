//! Even-odd ray casting.
//!
//! A horizontal ray is cast from the point toward increasing longitude and
//! the edges it crosses are counted. An odd count means the point is inside.
//! The test does not depend on ring orientation. A point exactly on an edge
//! may be reported either way, but the answer is the same on every call.

use rayon::prelude::*;

use crate::models::LatLng;

/// Anything that may carry a location.
pub trait Located {
    fn location(&self) -> Option<LatLng>;
}

impl Located for LatLng {
    fn location(&self) -> Option<LatLng> {
        Some(*self)
    }
}

impl<T: Located> Located for &T {
    fn location(&self) -> Option<LatLng> {
        (**self).location()
    }
}

/// Test whether `point` lies inside the implicitly closed `ring`.
///
/// Rings with fewer than three vertices enclose nothing and always yield
/// `false`. Non-finite coordinates give an unspecified answer.
pub fn is_inside(point: LatLng, ring: &[LatLng]) -> bool {
    if ring.len() < 3 {
        return false;
    }

    let mut inside = false;
    let mut prev = ring[ring.len() - 1];

    for &curr in ring {
        // Exactly one endpoint strictly above the ray. Horizontal edges never
        // pass this test, so the division below always has a non-zero divisor.
        if (curr.lat > point.lat) != (prev.lat > point.lat) {
            let crossing_lng =
                (prev.lng - curr.lng) * (point.lat - curr.lat) / (prev.lat - curr.lat) + curr.lng;
            if point.lng < crossing_lng {
                inside = !inside;
            }
        }
        prev = curr;
    }

    inside
}

/// Keep the records whose location lies inside `ring`, in input order.
///
/// Records without a location are dropped.
pub fn filter_inside<'a, R: Located>(records: &'a [R], ring: &[LatLng]) -> Vec<&'a R> {
    if ring.len() < 3 {
        return Vec::new();
    }

    records
        .iter()
        .filter(|r| r.location().is_some_and(|p| is_inside(p, ring)))
        .collect()
}

/// Parallel [`filter_inside`]. Output order matches input order.
pub fn filter_inside_par<'a, R: Located + Sync>(
    records: &'a [R],
    ring: &[LatLng],
) -> Vec<&'a R> {
    if ring.len() < 3 {
        return Vec::new();
    }

    records
        .par_iter()
        .filter(|r| r.location().is_some_and(|p| is_inside(p, ring)))
        .collect()
}
