//! In-memory listing store.
//!
//! Listings are loaded once from a JSON array and are read-only afterwards,
//! so the store can be shared across request handlers without locking.

pub mod filters;

use std::fs;
use std::path::Path;

use thiserror::Error;
use tracing::{debug, info};

use crate::models::{Listing, Ring};
use crate::pip::LocationIndex;

pub use filters::{FilterError, FilterField, ListingFilters, ListingQuery, Op, SqlParam, SqlQuery};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read listings file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse listings file: {0}")]
    Parse(#[from] serde_json::Error),
}

pub struct ListingStore {
    listings: Vec<Listing>,
    index: LocationIndex,
}

impl ListingStore {
    pub fn new(listings: Vec<Listing>) -> Self {
        let index = LocationIndex::build(&listings);
        Self { listings, index }
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let content = fs::read_to_string(path.as_ref())?;
        let listings: Vec<Listing> = serde_json::from_str(&content)?;
        info!(
            "Loaded {} listings from {}",
            listings.len(),
            path.as_ref().display()
        );
        Ok(Self::new(listings))
    }

    pub fn get(&self, id: &str) -> Option<&Listing> {
        self.listings.iter().find(|l| l.id == id)
    }

    /// Listings matching `filters`, and inside `area` when one is given.
    ///
    /// Newest first. Listings created at the same instant keep load order.
    pub fn search(&self, filters: &ListingFilters, area: Option<&Ring>) -> Vec<Listing> {
        let mut results: Vec<&Listing> = match area {
            Some(ring) => {
                let inside = self.index.within(ring);
                debug!(
                    "Area filter: {} vertices, {} of {} located listings inside",
                    ring.len(),
                    inside.len(),
                    self.index.len()
                );
                inside
                    .into_iter()
                    .map(|i| &self.listings[i])
                    .filter(|l| filters.matches(l))
                    .collect()
            }
            None => self.listings.iter().filter(|l| filters.matches(l)).collect(),
        };

        results.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        debug!("Search matched {} listings", results.len());

        results.into_iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.listings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }
}
