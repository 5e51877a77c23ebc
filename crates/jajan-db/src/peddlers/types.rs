//! Row types for the `peddlers` table.

use chrono::{DateTime, Utc};
use jajan_core::{Coordinate, PeddlerRecord, PeddlerStatus};

/// A row from the `peddlers` table.
///
/// `created_at`/`updated_at` are omitted; search never reads them.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PeddlerRow {
    pub id: String,
    pub name: String,
    pub peddler_type: String,
    pub description: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub status: String,
    pub last_active_at: Option<DateTime<Utc>>,
    pub rating: Option<f64>,
    pub city: Option<String>,
    pub district: Option<String>,
    pub subdistrict: Option<String>,
}

impl PeddlerRow {
    /// Convert into a [`PeddlerRecord`].
    ///
    /// Returns `None` when either coordinate is missing or the status is not
    /// one this build understands; such rows are skipped, not errors.
    #[must_use]
    pub fn into_record(self) -> Option<PeddlerRecord> {
        let location = Coordinate::new(self.latitude?, self.longitude?);
        let status = self.status.parse::<PeddlerStatus>().ok()?;
        Some(PeddlerRecord {
            id: self.id,
            name: self.name,
            peddler_type: self.peddler_type,
            description: self.description,
            location,
            status,
            last_active_at: self.last_active_at,
            rating: self.rating,
            city: self.city,
            district: self.district,
            subdistrict: self.subdistrict,
        })
    }
}
