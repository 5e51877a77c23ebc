//! Domain types shared by the matching engine, the store adapters and the
//! HTTP facades.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A WGS84 coordinate pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    #[must_use]
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// True when both components are finite and inside their geographic range.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeddlerStatus {
    Active,
    Inactive,
}

impl PeddlerStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            PeddlerStatus::Active => "active",
            PeddlerStatus::Inactive => "inactive",
        }
    }
}

impl std::fmt::Display for PeddlerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PeddlerStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(PeddlerStatus::Active),
            "inactive" => Ok(PeddlerStatus::Inactive),
            other => Err(format!("unknown peddler status '{other}'")),
        }
    }
}

/// Field accessors the matching engine needs from a searchable record.
///
/// The engine is generic over this trait so that "peddler" and "vendor"
/// vocabularies share one implementation.
pub trait Listing {
    fn id(&self) -> &str;
    fn name(&self) -> &str;
    fn category(&self) -> &str;
    fn description(&self) -> Option<&str>;
    fn location(&self) -> Coordinate;
}

/// A seller as returned by a candidate store.
///
/// Loaders never emit records without a location, so `location` is always
/// present here; it may still be out of range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeddlerRecord {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub peddler_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub location: Coordinate,
    pub status: PeddlerStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_active_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subdistrict: Option<String>,
}

impl Listing for PeddlerRecord {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn category(&self) -> &str {
        &self.peddler_type
    }

    fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    fn location(&self) -> Coordinate {
        self.location
    }
}

/// A peddler as written by the location-reporting side ("go active").
///
/// Unlike [`PeddlerRecord`] the location is optional: a peddler that has
/// never reported a position is stored but can never be returned by search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPeddler {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub peddler_type: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<Coordinate>,
    #[serde(default = "default_status")]
    pub status: PeddlerStatus,
    #[serde(default)]
    pub last_active_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub district: Option<String>,
    #[serde(default)]
    pub subdistrict: Option<String>,
}

fn default_status() -> PeddlerStatus {
    PeddlerStatus::Active
}

impl NewPeddler {
    /// Convert into a searchable record, or `None` when no location was ever reported.
    #[must_use]
    pub fn to_record(&self) -> Option<PeddlerRecord> {
        let location = self.location?;
        Some(PeddlerRecord {
            id: self.id.clone(),
            name: self.name.clone(),
            peddler_type: self.peddler_type.clone(),
            description: self.description.clone(),
            location,
            status: self.status,
            last_active_at: self.last_active_at,
            rating: self.rating,
            city: self.city.clone(),
            district: self.district.clone(),
            subdistrict: self.subdistrict.clone(),
        })
    }
}

/// Administrative-area hard filters. Each populated field is an equality
/// predicate; all populated fields must match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdminArea {
    pub city: Option<String>,
    pub district: Option<String>,
    pub subdistrict: Option<String>,
}

impl AdminArea {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.city.is_none() && self.district.is_none() && self.subdistrict.is_none()
    }
}

/// One search request against the matching engine.
#[derive(Debug, Clone, Default)]
pub struct SearchQuery {
    pub origin: Option<Coordinate>,
    pub type_filter: Option<String>,
    pub keywords: Vec<String>,
    pub admin_area: AdminArea,
    /// `None` falls back to the engine's configured default radius.
    pub radius_meters: Option<f64>,
    pub page_size: usize,
    /// Opaque continuation token taken from a previous page.
    pub cursor: Option<String>,
}

impl SearchQuery {
    #[must_use]
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size,
            ..Self::default()
        }
    }
}

/// A record on a result page, with its rendered distance when an origin was given.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedItem<R> {
    pub record: R,
    pub distance_label: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResultPage<R> {
    pub items: Vec<RankedItem<R>>,
    pub has_more: bool,
    /// Opaque token that resumes strictly after the last item; set only when
    /// `has_more`.
    pub next_cursor: Option<String>,
}

impl<R> ResultPage<R> {
    #[must_use]
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            has_more: false,
            next_cursor: None,
        }
    }
}
