//! Habitat - listing search with map-area filtering
//!
//! This library provides shared types and modules for the query and filter binaries.

pub mod models;
pub mod pip;
pub mod store;

pub use models::{BoundingBox, LatLng, Listing, Ring};
pub use pip::{filter_inside, is_inside, Located};
