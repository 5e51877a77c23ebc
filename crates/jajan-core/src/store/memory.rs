use std::sync::Arc;

use async_trait::async_trait;

use super::{CandidateFilter, CandidateStore};
use crate::error::StoreError;
use crate::types::{AdminArea, NewPeddler, PeddlerRecord, PeddlerStatus};

/// Candidate store over a fixed set of peddlers held in memory.
///
/// Natural order is `id` ascending (byte-wise), matching the Postgres adapter.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCandidateStore {
    peddlers: Arc<Vec<NewPeddler>>,
}

impl InMemoryCandidateStore {
    #[must_use]
    pub fn new(mut peddlers: Vec<NewPeddler>) -> Self {
        peddlers.sort_by(|a, b| a.id.cmp(&b.id));
        Self {
            peddlers: Arc::new(peddlers),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.peddlers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.peddlers.is_empty()
    }
}

fn matches_area(peddler: &NewPeddler, area: &AdminArea) -> bool {
    let eq = |wanted: &Option<String>, actual: &Option<String>| {
        wanted.is_none() || wanted.as_deref() == actual.as_deref()
    };
    eq(&area.city, &peddler.city)
        && eq(&area.district, &peddler.district)
        && eq(&area.subdistrict, &peddler.subdistrict)
}

#[async_trait]
impl CandidateStore for InMemoryCandidateStore {
    type Record = PeddlerRecord;

    async fn load_candidates(
        &self,
        filter: &CandidateFilter,
    ) -> Result<Vec<PeddlerRecord>, StoreError> {
        let records = self
            .peddlers
            .iter()
            .filter(|p| p.status == PeddlerStatus::Active)
            .filter(|p| {
                filter
                    .peddler_type
                    .as_deref()
                    .is_none_or(|kind| p.peddler_type == kind)
            })
            .filter(|p| matches_area(p, &filter.admin_area))
            .filter(|p| {
                filter
                    .after_id
                    .as_deref()
                    .is_none_or(|after| p.id.as_str() > after)
            })
            .filter_map(NewPeddler::to_record)
            .take(filter.fetch_limit)
            .collect();

        Ok(records)
    }
}
