//! Read operations for the `peddlers` table.

use jajan_core::{CandidateFilter, PeddlerRecord};
use sqlx::PgPool;

use super::types::PeddlerRow;

/// Load active peddlers matching the hard filters, in `id` order.
///
/// Type and administrative-area filters are exact equality and are combined
/// with AND; unset filters match everything. Rows without both coordinates
/// are excluded in SQL. `after_id` resumes strictly after that id.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn load_active_candidates(
    pool: &PgPool,
    filter: &CandidateFilter,
) -> Result<Vec<PeddlerRecord>, sqlx::Error> {
    let limit = i64::try_from(filter.fetch_limit).unwrap_or(i64::MAX);

    let rows = sqlx::query_as::<_, PeddlerRow>(
        "SELECT id, name, peddler_type, description, latitude, longitude, \
                status, last_active_at, rating, city, district, subdistrict \
         FROM peddlers \
         WHERE status = 'active' \
           AND latitude IS NOT NULL \
           AND longitude IS NOT NULL \
           AND ($1::TEXT IS NULL OR peddler_type = $1) \
           AND ($2::TEXT IS NULL OR city = $2) \
           AND ($3::TEXT IS NULL OR district = $3) \
           AND ($4::TEXT IS NULL OR subdistrict = $4) \
           AND ($5::TEXT IS NULL OR id > $5) \
         ORDER BY id ASC \
         LIMIT $6",
    )
    .bind(filter.peddler_type.as_deref())
    .bind(filter.admin_area.city.as_deref())
    .bind(filter.admin_area.district.as_deref())
    .bind(filter.admin_area.subdistrict.as_deref())
    .bind(filter.after_id.as_deref())
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().filter_map(PeddlerRow::into_record).collect())
}
