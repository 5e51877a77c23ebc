//! Postgres adapter for the engine's [`CandidateStore`] port.

use async_trait::async_trait;
use jajan_core::{CandidateFilter, CandidateStore, PeddlerRecord, StoreError};
use sqlx::PgPool;

use crate::peddlers::load_active_candidates;

#[derive(Debug, Clone)]
pub struct PgCandidateStore {
    pool: PgPool,
}

impl PgCandidateStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CandidateStore for PgCandidateStore {
    type Record = PeddlerRecord;

    async fn load_candidates(
        &self,
        filter: &CandidateFilter,
    ) -> Result<Vec<PeddlerRecord>, StoreError> {
        let records = load_active_candidates(&self.pool, filter)
            .await
            .map_err(|e| StoreError::new("loading peddler candidates", e))?;
        tracing::trace!(count = records.len(), "loaded candidates from postgres");
        Ok(records)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        crate::ping(&self.pool)
            .await
            .map_err(|e| StoreError::new("pinging postgres", e))
    }
}
