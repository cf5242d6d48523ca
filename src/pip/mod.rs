//! Point-in-Polygon (PIP) area filtering.
//!
//! Decides which located records fall inside a user-drawn map area, with an
//! optional R-tree pre-filter for large record sets.

mod area;
mod index;
mod ray;

pub use area::{parse_area, AreaError};
pub use index::LocationIndex;
pub use ray::{filter_inside, filter_inside_par, is_inside, Located};
