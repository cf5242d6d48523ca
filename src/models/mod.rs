//! Core data models for listing search.

pub mod location;
pub mod listing;

pub use location::{BoundingBox, LatLng, Ring};
pub use listing::Listing;
