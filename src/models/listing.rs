//! Listing record served by the query API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::LatLng;
use crate::pip::Located;

/// A real-estate listing.
///
/// Serialized in camelCase, which is the shape the frontend consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: String,
    pub title: String,
    pub address: String,
    pub price: f64,
    pub beds: u32,
    pub baths: u32,
    pub sqft: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,

    /// e.g. "apartment", "house"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_type: Option<String>,

    /// e.g. "sale", "rent"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub municipality: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parish: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Listing {
    /// Create a listing with the required fields set and everything else empty
    pub fn new(id: &str, title: &str, price: f64, created_at: DateTime<Utc>) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            address: String::new(),
            price,
            beds: 0,
            baths: 0,
            sqft: 0,
            image_url: None,
            property_type: None,
            transaction_type: None,
            district: None,
            municipality: None,
            parish: None,
            latitude: None,
            longitude: None,
            user_id: None,
            created_at,
            updated_at: None,
        }
    }

    pub fn with_location(mut self, lat: f64, lng: f64) -> Self {
        self.latitude = Some(lat);
        self.longitude = Some(lng);
        self
    }
}

impl Located for Listing {
    /// Both coordinates must be present and finite. Zero is a valid coordinate.
    fn location(&self) -> Option<LatLng> {
        let point = LatLng::new(self.latitude?, self.longitude?);
        point.is_finite().then_some(point)
    }
}
