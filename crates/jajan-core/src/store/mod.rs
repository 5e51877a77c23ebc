//! The candidate-loading port and its in-process adapter.
//!
//! Backing stores implement [`CandidateStore`]; the engine only ever sees
//! the trait object, so the Postgres adapter in `jajan-db` and the
//! in-memory adapter here are interchangeable.

mod memory;

use async_trait::async_trait;

use crate::error::StoreError;
use crate::types::{AdminArea, Listing};

pub use memory::InMemoryCandidateStore;

/// Hard filters and paging for one candidate load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateFilter {
    /// Exact match on the record's type. Broader matching happens in memory.
    pub peddler_type: Option<String>,
    pub admin_area: AdminArea,
    /// Resume strictly after this record id in the store's natural order.
    pub after_id: Option<String>,
    pub fetch_limit: usize,
}

#[async_trait]
pub trait CandidateStore: Send + Sync {
    type Record: Listing + Send;

    /// Load up to `filter.fetch_limit` active records matching the hard filters.
    ///
    /// Records that have no location at all are never returned. A failed
    /// store call is an error, never an empty result.
    async fn load_candidates(
        &self,
        filter: &CandidateFilter,
    ) -> Result<Vec<Self::Record>, StoreError>;

    /// Verify the backing store is reachable.
    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
