//! Write operations for the `peddlers` table.

use jajan_core::NewPeddler;
use sqlx::PgPool;

use crate::DbError;

/// Insert or update peddlers by `id`.
///
/// Returns the number of peddlers processed. All upserts run inside a single
/// transaction; if any fails the whole batch is rolled back.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any database operation fails.
pub async fn upsert_peddlers(pool: &PgPool, peddlers: &[NewPeddler]) -> Result<usize, DbError> {
    let mut tx = pool.begin().await?;

    for peddler in peddlers {
        sqlx::query(
            "INSERT INTO peddlers \
                 (id, name, peddler_type, description, latitude, longitude, status, \
                  last_active_at, rating, city, district, subdistrict) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) \
             ON CONFLICT (id) DO UPDATE SET \
                 name           = EXCLUDED.name, \
                 peddler_type   = EXCLUDED.peddler_type, \
                 description    = EXCLUDED.description, \
                 latitude       = EXCLUDED.latitude, \
                 longitude      = EXCLUDED.longitude, \
                 status         = EXCLUDED.status, \
                 last_active_at = EXCLUDED.last_active_at, \
                 rating         = EXCLUDED.rating, \
                 city           = EXCLUDED.city, \
                 district       = EXCLUDED.district, \
                 subdistrict    = EXCLUDED.subdistrict, \
                 updated_at     = NOW()",
        )
        .bind(&peddler.id)
        .bind(&peddler.name)
        .bind(&peddler.peddler_type)
        .bind(&peddler.description)
        .bind(peddler.location.map(|l| l.lat))
        .bind(peddler.location.map(|l| l.lon))
        .bind(peddler.status.as_str())
        .bind(peddler.last_active_at)
        .bind(peddler.rating)
        .bind(&peddler.city)
        .bind(&peddler.district)
        .bind(&peddler.subdistrict)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(peddlers.len())
}
