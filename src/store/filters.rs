//! Listing attribute filters.
//!
//! Only the fields in [`FilterField`] can be filtered on. Generated SQL takes
//! column names from that enum and passes every value as a positional
//! parameter.

use serde::Deserialize;
use thiserror::Error;

use crate::models::{BoundingBox, Listing};

#[derive(Debug, Error, PartialEq)]
pub enum FilterError {
    #[error("invalid number for '{field}': '{value}'")]
    InvalidNumber { field: &'static str, value: String },
}

/// Filterable listing columns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    Price,
    Beds,
    Baths,
    PropertyType,
    TransactionType,
    District,
    Municipality,
    Parish,
}

impl FilterField {
    pub fn column(&self) -> &'static str {
        match self {
            FilterField::Price => "price",
            FilterField::Beds => "beds",
            FilterField::Baths => "baths",
            FilterField::PropertyType => "property_type",
            FilterField::TransactionType => "transaction_type",
            FilterField::District => "district",
            FilterField::Municipality => "municipality",
            FilterField::Parish => "parish",
        }
    }

    fn text_of<'a>(&self, listing: &'a Listing) -> Option<&'a str> {
        match self {
            FilterField::PropertyType => listing.property_type.as_deref(),
            FilterField::TransactionType => listing.transaction_type.as_deref(),
            FilterField::District => listing.district.as_deref(),
            FilterField::Municipality => listing.municipality.as_deref(),
            FilterField::Parish => listing.parish.as_deref(),
            _ => None,
        }
    }

    fn number_of(&self, listing: &Listing) -> Option<f64> {
        match self {
            FilterField::Price => Some(listing.price),
            FilterField::Beds => Some(listing.beds as f64),
            FilterField::Baths => Some(listing.baths as f64),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    AtLeast,
    AtMost,
    Equals,
}

impl Op {
    fn sql(&self) -> &'static str {
        match self {
            Op::AtLeast => ">=",
            Op::AtMost => "<=",
            Op::Equals => "=",
        }
    }
}

/// Typed SQL parameter
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Float(f64),
    Int(i64),
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub field: FilterField,
    pub op: Op,
    pub value: SqlParam,
}

impl Condition {
    fn matches(&self, listing: &Listing) -> bool {
        match &self.value {
            SqlParam::Text(want) => self.field.text_of(listing) == Some(want.as_str()),
            SqlParam::Float(want) => self.compare(listing, *want),
            SqlParam::Int(want) => self.compare(listing, *want as f64),
        }
    }

    fn compare(&self, listing: &Listing, want: f64) -> bool {
        let Some(have) = self.field.number_of(listing) else {
            return false;
        };
        match self.op {
            Op::AtLeast => have >= want,
            Op::AtMost => have <= want,
            Op::Equals => have == want,
        }
    }
}

/// Query string parameters as the frontend sends them
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingQuery {
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub bedrooms: Option<String>,
    pub bathrooms: Option<String>,
    pub property_type: Option<String>,
    pub transaction_type: Option<String>,
    pub district: Option<String>,
    pub municipality: Option<String>,
    pub parish: Option<String>,
    /// GeoJSON polygon, decoded separately
    pub area: Option<String>,
}

/// Validated attribute filters
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ListingFilters {
    conditions: Vec<Condition>,
}

/// Parameterized query for a relational backend
#[derive(Debug, Clone, PartialEq)]
pub struct SqlQuery {
    pub text: String,
    pub params: Vec<SqlParam>,
}

/// Empty and "any" values impose no constraint
fn provided(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty() && *v != "any")
}

impl TryFrom<&ListingQuery> for ListingFilters {
    type Error = FilterError;

    fn try_from(q: &ListingQuery) -> Result<Self, Self::Error> {
        let mut filters = ListingFilters::default();

        if let Some(v) = provided(&q.min_price) {
            let price = parse_float("minPrice", v)?;
            filters.push(FilterField::Price, Op::AtLeast, SqlParam::Float(price));
        }
        if let Some(v) = provided(&q.max_price) {
            let price = parse_float("maxPrice", v)?;
            filters.push(FilterField::Price, Op::AtMost, SqlParam::Float(price));
        }
        if let Some(v) = provided(&q.bedrooms) {
            let beds = parse_int("bedrooms", v)?;
            filters.push(FilterField::Beds, Op::AtLeast, SqlParam::Int(beds));
        }
        if let Some(v) = provided(&q.bathrooms) {
            let baths = parse_int("bathrooms", v)?;
            filters.push(FilterField::Baths, Op::AtLeast, SqlParam::Int(baths));
        }

        let text_fields = [
            (FilterField::PropertyType, &q.property_type),
            (FilterField::TransactionType, &q.transaction_type),
            (FilterField::District, &q.district),
            (FilterField::Municipality, &q.municipality),
            (FilterField::Parish, &q.parish),
        ];
        for (field, value) in text_fields {
            if let Some(v) = provided(value) {
                filters.push(field, Op::Equals, SqlParam::Text(v.to_string()));
            }
        }

        Ok(filters)
    }
}

fn parse_float(field: &'static str, value: &str) -> Result<f64, FilterError> {
    value
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| FilterError::InvalidNumber {
            field,
            value: value.to_string(),
        })
}

fn parse_int(field: &'static str, value: &str) -> Result<i64, FilterError> {
    // "3+" is how the bedroom picker labels its last bucket
    value
        .strip_suffix('+')
        .unwrap_or(value)
        .parse::<i64>()
        .map_err(|_| FilterError::InvalidNumber {
            field,
            value: value.to_string(),
        })
}

impl ListingFilters {
    pub fn push(&mut self, field: FilterField, op: Op, value: SqlParam) {
        self.conditions.push(Condition { field, op, value });
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn matches(&self, listing: &Listing) -> bool {
        self.conditions.iter().all(|c| c.matches(listing))
    }

    /// Render the filters as a parameterized `SELECT`.
    ///
    /// With an area box, coordinates must be present and inside the box.
    /// Exact polygon containment still has to run on the returned rows.
    pub fn to_sql(&self, area: Option<&BoundingBox>) -> SqlQuery {
        let mut text = String::from("SELECT * FROM listings WHERE 1=1");
        let mut params = Vec::with_capacity(self.conditions.len() + 4);

        for c in &self.conditions {
            params.push(c.value.clone());
            text.push_str(&format!(
                " AND {} {} ${}",
                c.field.column(),
                c.op.sql(),
                params.len()
            ));
        }

        if let Some(bbox) = area {
            text.push_str(" AND latitude IS NOT NULL AND longitude IS NOT NULL");
            for (column, min, max) in [
                ("latitude", bbox.min_lat, bbox.max_lat),
                ("longitude", bbox.min_lng, bbox.max_lng),
            ] {
                params.push(SqlParam::Float(min));
                params.push(SqlParam::Float(max));
                text.push_str(&format!(
                    " AND {} BETWEEN ${} AND ${}",
                    column,
                    params.len() - 1,
                    params.len()
                ));
            }
        }

        text.push_str(" ORDER BY created_at DESC");
        SqlQuery { text, params }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn query() -> ListingQuery {
        ListingQuery {
            min_price: Some("100000".to_string()),
            bedrooms: Some("2".to_string()),
            property_type: Some("apartment".to_string()),
            district: Some("any".to_string()),
            parish: Some(String::new()),
            ..Default::default()
        }
    }

    fn listing() -> Listing {
        let mut l = Listing::new("7", "T3 Campo de Ourique", 420_000.0, Utc::now());
        l.beds = 3;
        l.baths = 2;
        l.property_type = Some("apartment".to_string());
        l.district = Some("Lisboa".to_string());
        l
    }

    #[test]
    fn test_any_and_empty_are_ignored() {
        let filters = ListingFilters::try_from(&query()).unwrap();
        let fields: Vec<_> = filters.conditions().iter().map(|c| c.field).collect();
        assert_eq!(fields, vec![FilterField::Price, FilterField::Beds, FilterField::PropertyType]);

        let none = ListingFilters::try_from(&ListingQuery::default()).unwrap();
        assert!(none.is_empty());
        assert!(none.matches(&listing()));
    }

    #[test]
    fn test_matches() {
        let filters = ListingFilters::try_from(&query()).unwrap();
        assert!(filters.matches(&listing()));

        let mut cheap = listing();
        cheap.price = 90_000.0;
        assert!(!filters.matches(&cheap));

        let mut house = listing();
        house.property_type = Some("house".to_string());
        assert!(!filters.matches(&house));

        let mut untyped = listing();
        untyped.property_type = None;
        assert!(!filters.matches(&untyped));
    }

    #[test]
    fn test_bedroom_bucket_suffix() {
        let q = ListingQuery {
            bedrooms: Some("4+".to_string()),
            ..Default::default()
        };
        let filters = ListingFilters::try_from(&q).unwrap();
        assert_eq!(filters.conditions()[0].value, SqlParam::Int(4));
        assert!(!filters.matches(&listing()));
    }

    #[test]
    fn test_bucket_suffix_is_single_and_integral() {
        for bad in ["3++", "2.5", "+"] {
            let q = ListingQuery {
                bathrooms: Some(bad.to_string()),
                ..Default::default()
            };
            assert_eq!(
                ListingFilters::try_from(&q),
                Err(FilterError::InvalidNumber {
                    field: "bathrooms",
                    value: bad.to_string()
                })
            );
        }
    }

    #[test]
    fn test_invalid_number() {
        let q = ListingQuery {
            max_price: Some("cheap".to_string()),
            ..Default::default()
        };
        assert_eq!(
            ListingFilters::try_from(&q),
            Err(FilterError::InvalidNumber {
                field: "maxPrice",
                value: "cheap".to_string()
            })
        );

        let q = ListingQuery {
            min_price: Some("NaN".to_string()),
            ..Default::default()
        };
        assert!(ListingFilters::try_from(&q).is_err());
    }

    #[test]
    fn test_to_sql_is_parameterized() {
        let q = ListingQuery {
            district: Some("Lisboa'; DROP TABLE listings; --".to_string()),
            ..query()
        };
        let sql = ListingFilters::try_from(&q).unwrap().to_sql(None);

        assert_eq!(
            sql.text,
            "SELECT * FROM listings WHERE 1=1 AND price >= $1 AND beds >= $2 \
             AND property_type = $3 AND district = $4 ORDER BY created_at DESC"
        );
        assert_eq!(sql.params.len(), 4);
        assert!(!sql.text.contains("DROP"));
        assert_eq!(
            sql.params[3],
            SqlParam::Text("Lisboa'; DROP TABLE listings; --".to_string())
        );
    }

    #[test]
    fn test_to_sql_area_pushdown() {
        let bbox = BoundingBox {
            min_lat: 38.70,
            min_lng: -9.20,
            max_lat: 38.76,
            max_lng: -9.10,
        };
        let sql = ListingFilters::default().to_sql(Some(&bbox));

        assert_eq!(
            sql.text,
            "SELECT * FROM listings WHERE 1=1 AND latitude IS NOT NULL AND longitude IS NOT NULL \
             AND latitude BETWEEN $1 AND $2 AND longitude BETWEEN $3 AND $4 \
             ORDER BY created_at DESC"
        );
        assert_eq!(
            sql.params,
            vec![
                SqlParam::Float(38.70),
                SqlParam::Float(38.76),
                SqlParam::Float(-9.20),
                SqlParam::Float(-9.10),
            ]
        );
    }
}
