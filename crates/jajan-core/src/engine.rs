//! The query facade: validates a [`SearchQuery`], loads candidates through
//! the injected [`CandidateStore`], filters by keyword, ranks by proximity.

use std::cmp::Ordering;
use std::sync::Arc;

use crate::app_config::AppConfig;
use crate::error::{SearchError, StoreError};
use crate::keyword::filter_by_keywords;
use crate::rank::{labelled_page, unranked_page, within_radius};
use crate::store::{CandidateFilter, CandidateStore};
use crate::types::{Coordinate, Listing, ResultPage, SearchQuery};

pub const DEFAULT_RADIUS_METERS: f64 = 5000.0;
pub const DEFAULT_OVER_FETCH_FACTOR: usize = 3;

/// Tunables applied to every search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchSettings {
    /// Radius used when a query does not set one.
    pub default_radius_meters: f64,
    /// Loader fetch limit as a multiple of the page size. Keyword and radius
    /// filtering run in memory after loading, so the loader over-fetches.
    pub over_fetch_factor: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            default_radius_meters: DEFAULT_RADIUS_METERS,
            over_fetch_factor: DEFAULT_OVER_FETCH_FACTOR,
        }
    }
}

impl SearchSettings {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            default_radius_meters: config.default_radius_meters,
            over_fetch_factor: config.over_fetch_factor,
        }
    }
}

/// Proximity search over any [`Listing`] type, backed by an injected store.
pub struct SearchEngine<R> {
    store: Arc<dyn CandidateStore<Record = R>>,
    settings: SearchSettings,
}

impl<R> Clone for SearchEngine<R> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            settings: self.settings,
        }
    }
}

impl<R> std::fmt::Debug for SearchEngine<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchEngine")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl<R: Listing + Send + 'static> SearchEngine<R> {
    pub fn new(store: Arc<dyn CandidateStore<Record = R>>, settings: SearchSettings) -> Self {
        Self { store, settings }
    }

    #[must_use]
    pub fn settings(&self) -> SearchSettings {
        self.settings
    }

    /// Run one search.
    ///
    /// Candidates are loaded in store windows of `page_size × over_fetch_factor`.
    /// Without an origin, windows are loaded until the page plus one more match
    /// is filled or the store runs out. With an origin, every window after the
    /// cursor is scanned so the page holds the globally nearest matches.
    ///
    /// Dropping the returned future cancels the store call; no partial page
    /// is ever produced.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::InvalidQuery`] before any I/O when the radius or
    /// page size is not positive, the origin is out of range, or the cursor
    /// does not belong to this kind of query, and
    /// [`SearchError::StoreUnavailable`] when a candidate load fails.
    pub async fn search(&self, query: SearchQuery) -> Result<ResultPage<R>, SearchError> {
        let radius_meters = self.validate(&query)?;
        let cursor = Cursor::decode(query.cursor.as_deref(), query.origin.is_some())?;

        let filter = CandidateFilter {
            peddler_type: query
                .type_filter
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty()),
            admin_area: query.admin_area,
            after_id: cursor.after_id(),
            fetch_limit: query
                .page_size
                .saturating_mul(self.settings.over_fetch_factor.max(1)),
        };

        let page = match query.origin {
            None => self.browse(filter, &query.keywords, query.page_size).await?,
            Some(origin) => {
                let nearest = Nearest {
                    origin,
                    radius_meters,
                    page_size: query.page_size,
                    after: cursor.into_rank(),
                };
                self.nearest(filter, &query.keywords, &nearest).await?
            }
        };

        tracing::debug!(
            returned = page.items.len(),
            has_more = page.has_more,
            ranked = query.origin.is_some(),
            "search page assembled"
        );
        Ok(page)
    }

    /// Store-order paging: stop as soon as one match beyond the page is seen.
    async fn browse(
        &self,
        mut filter: CandidateFilter,
        keywords: &[String],
        page_size: usize,
    ) -> Result<ResultPage<R>, SearchError> {
        let mut matched = Vec::new();
        let mut windows = 0_usize;

        loop {
            let window = self.store.load_candidates(&filter).await?;
            windows += 1;
            let exhausted = window.len() < filter.fetch_limit;
            if let Some(last) = window.last() {
                filter.after_id = Some(last.id().to_string());
            }

            matched.extend(filter_by_keywords(window, keywords));
            if exhausted || matched.len() > page_size {
                break;
            }
        }
        tracing::debug!(windows, matched = matched.len(), "store-order windows loaded");

        let mut page = unranked_page(matched, page_size);
        if page.has_more {
            page.next_cursor = page
                .items
                .last()
                .map(|item| Cursor::encode_after_id(item.record.id()));
        }
        Ok(page)
    }

    /// Distance paging: scan every remaining window, keeping only the best
    /// `page_size + 1` matches ordered by `(distance, id)`.
    async fn nearest(
        &self,
        mut filter: CandidateFilter,
        keywords: &[String],
        nearest: &Nearest,
    ) -> Result<ResultPage<R>, SearchError> {
        let keep = nearest.page_size.saturating_add(1);
        let mut best: Vec<(f64, R)> = Vec::new();
        let mut windows = 0_usize;
        let mut loaded = 0_usize;

        loop {
            let window = self.store.load_candidates(&filter).await?;
            windows += 1;
            loaded += window.len();
            let exhausted = window.len() < filter.fetch_limit;
            if let Some(last) = window.last() {
                filter.after_id = Some(last.id().to_string());
            }

            let matched = filter_by_keywords(window, keywords);
            best.extend(
                within_radius(matched, nearest.origin, nearest.radius_meters)
                    .into_iter()
                    .filter(|(distance, record)| nearest.is_beyond_cursor(*distance, record.id())),
            );
            best.sort_by(by_rank);
            best.truncate(keep);

            if exhausted {
                break;
            }
        }
        tracing::debug!(windows, loaded, kept = best.len(), "distance windows scanned");

        let next_cursor = if best.len() > nearest.page_size {
            best.get(nearest.page_size.saturating_sub(1))
                .map(|(distance, record)| Cursor::encode_after_rank(*distance, record.id()))
        } else {
            None
        };
        let mut page = labelled_page(best, nearest.page_size);
        page.next_cursor = next_cursor;
        Ok(page)
    }

    /// # Errors
    ///
    /// Returns [`StoreError`] if the backing store cannot be reached.
    pub async fn health_check(&self) -> Result<(), StoreError> {
        self.store.health_check().await
    }

    fn validate(&self, query: &SearchQuery) -> Result<f64, SearchError> {
        let radius = query
            .radius_meters
            .unwrap_or(self.settings.default_radius_meters);
        if !radius.is_finite() || radius <= 0.0 {
            return Err(SearchError::invalid(
                "maxDistanceMeters must be a positive number",
            ));
        }
        if query.page_size == 0 {
            return Err(SearchError::invalid("limit must be a positive integer"));
        }
        if let Some(origin) = query.origin {
            if !origin.is_valid() {
                return Err(SearchError::invalid(
                    "location must have lat in [-90, 90] and lon in [-180, 180]",
                ));
            }
        }
        Ok(radius)
    }
}

/// Ties on distance fall back to id, which is the stores' natural order.
fn by_rank<R: Listing>(a: &(f64, R), b: &(f64, R)) -> Ordering {
    a.0.total_cmp(&b.0).then_with(|| a.1.id().cmp(b.1.id()))
}

struct Nearest {
    origin: Coordinate,
    radius_meters: f64,
    page_size: usize,
    after: Option<(f64, String)>,
}

impl Nearest {
    fn is_beyond_cursor(&self, distance: f64, id: &str) -> bool {
        self.after.as_ref().is_none_or(|(after_distance, after_id)| {
            distance
                .total_cmp(after_distance)
                .then_with(|| id.cmp(after_id.as_str()))
                == Ordering::Greater
        })
    }
}

/// Decoded continuation token.
///
/// Store-order pages resume after a record id. Distance-ranked pages resume
/// after a `(distance, id)` position, encoded as `<f64 bits in hex>:<id>`.
#[derive(Debug, Clone, PartialEq)]
enum Cursor {
    Start,
    AfterId(String),
    AfterRank { distance: f64, id: String },
}

impl Cursor {
    fn decode(raw: Option<&str>, ranked: bool) -> Result<Self, SearchError> {
        let Some(raw) = raw.map(str::trim).filter(|c| !c.is_empty()) else {
            return Ok(Cursor::Start);
        };
        if !ranked {
            return Ok(Cursor::AfterId(raw.to_string()));
        }

        raw.split_once(':')
            .and_then(|(bits, id)| {
                let distance = f64::from_bits(u64::from_str_radix(bits, 16).ok()?);
                (distance.is_finite() && !id.is_empty()).then(|| Cursor::AfterRank {
                    distance,
                    id: id.to_string(),
                })
            })
            .ok_or_else(|| SearchError::invalid("cursor is not valid for this query"))
    }

    fn encode_after_id(id: &str) -> String {
        id.to_string()
    }

    fn encode_after_rank(distance: f64, id: &str) -> String {
        format!("{:016x}:{id}", distance.to_bits())
    }

    /// Where the store should resume. Ranked scans always start from the
    /// beginning of the store; the rank position filters in memory.
    fn after_id(&self) -> Option<String> {
        match self {
            Cursor::AfterId(id) => Some(id.clone()),
            Cursor::Start | Cursor::AfterRank { .. } => None,
        }
    }

    fn into_rank(self) -> Option<(f64, String)> {
        match self {
            Cursor::AfterRank { distance, id } => Some((distance, id)),
            Cursor::Start | Cursor::AfterId(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::types::{AdminArea, Coordinate, PeddlerRecord, PeddlerStatus};

    /// Records every filter it receives and returns nothing.
    #[derive(Default)]
    struct RecordingStore {
        seen: Mutex<Vec<CandidateFilter>>,
    }

    #[async_trait]
    impl CandidateStore for RecordingStore {
        type Record = PeddlerRecord;

        async fn load_candidates(
            &self,
            filter: &CandidateFilter,
        ) -> Result<Vec<PeddlerRecord>, StoreError> {
            self.seen.lock().expect("lock").push(filter.clone());
            Ok(Vec::new())
        }
    }

    fn engine(store: Arc<RecordingStore>) -> SearchEngine<PeddlerRecord> {
        SearchEngine::new(store, SearchSettings::default())
    }

    #[tokio::test]
    async fn rejects_non_positive_radius_before_loading() {
        let store = Arc::new(RecordingStore::default());
        let engine = engine(Arc::clone(&store));
        for radius in [0.0, -5.0, f64::NAN] {
            let query = SearchQuery {
                radius_meters: Some(radius),
                ..SearchQuery::new(10)
            };
            let err = engine.search(query).await.unwrap_err();
            assert!(matches!(err, SearchError::InvalidQuery { .. }), "{radius}");
        }
        assert!(store.seen.lock().expect("lock").is_empty());
    }

    #[tokio::test]
    async fn rejects_zero_page_size() {
        let store = Arc::new(RecordingStore::default());
        let err = engine(store).search(SearchQuery::new(0)).await.unwrap_err();
        assert!(matches!(err, SearchError::InvalidQuery { .. }));
    }

    #[tokio::test]
    async fn rejects_malformed_origin() {
        let store = Arc::new(RecordingStore::default());
        let query = SearchQuery {
            origin: Some(Coordinate::new(-91.0, 0.0)),
            ..SearchQuery::new(10)
        };
        let err = engine(store).search(query).await.unwrap_err();
        assert!(matches!(err, SearchError::InvalidQuery { .. }));
    }

    #[tokio::test]
    async fn translates_query_into_over_fetching_filter() {
        let store = Arc::new(RecordingStore::default());
        let query = SearchQuery {
            type_filter: Some(" bakso ".to_string()),
            admin_area: AdminArea {
                district: Some("Menteng".to_string()),
                ..AdminArea::default()
            },
            cursor: Some("p10".to_string()),
            ..SearchQuery::new(10)
        };
        let page = engine(Arc::clone(&store)).search(query).await.expect("search");
        assert!(page.items.is_empty());

        let seen = store.seen.lock().expect("lock");
        assert_eq!(
            seen.as_slice(),
            &[CandidateFilter {
                peddler_type: Some("bakso".to_string()),
                admin_area: AdminArea {
                    district: Some("Menteng".to_string()),
                    ..AdminArea::default()
                },
                after_id: Some("p10".to_string()),
                fetch_limit: 30,
            }]
        );
    }

    #[tokio::test]
    async fn blank_cursor_and_type_mean_start_unfiltered() {
        let store = Arc::new(RecordingStore::default());
        let query = SearchQuery {
            type_filter: Some("   ".to_string()),
            cursor: Some(String::new()),
            ..SearchQuery::new(5)
        };
        engine(Arc::clone(&store)).search(query).await.expect("search");
        let seen = store.seen.lock().expect("lock");
        assert_eq!(seen[0].peddler_type, None);
        assert_eq!(seen[0].after_id, None);
    }

    /// Serves id-ordered windows from a fixed list and records each filter.
    struct WindowedStore {
        records: Vec<PeddlerRecord>,
        seen: Mutex<Vec<CandidateFilter>>,
    }

    impl WindowedStore {
        fn new(records: Vec<PeddlerRecord>) -> Self {
            Self {
                records,
                seen: Mutex::new(Vec::new()),
            }
        }

        fn resumed_after(&self) -> Vec<Option<String>> {
            let seen = self.seen.lock().expect("lock");
            seen.iter().map(|f| f.after_id.clone()).collect()
        }
    }

    #[async_trait]
    impl CandidateStore for WindowedStore {
        type Record = PeddlerRecord;

        async fn load_candidates(
            &self,
            filter: &CandidateFilter,
        ) -> Result<Vec<PeddlerRecord>, StoreError> {
            self.seen.lock().expect("lock").push(filter.clone());
            Ok(self
                .records
                .iter()
                .filter(|r| filter.after_id.as_deref().is_none_or(|after| r.id.as_str() > after))
                .take(filter.fetch_limit)
                .cloned()
                .collect())
        }
    }

    fn record(id: &str, kind: &str, lat: f64) -> PeddlerRecord {
        PeddlerRecord {
            id: id.to_string(),
            name: format!("Pak {id}"),
            peddler_type: kind.to_string(),
            description: None,
            location: Coordinate::new(lat, 106.8),
            status: PeddlerStatus::Active,
            last_active_at: None,
            rating: None,
            city: None,
            district: None,
            subdistrict: None,
        }
    }

    #[tokio::test]
    async fn rejects_unreadable_cursor_on_ranked_query() {
        let store = Arc::new(RecordingStore::default());
        let engine = engine(Arc::clone(&store));
        for cursor in ["p10", "zz:p10", "0000000000000000:", "7ff8000000000000:p1"] {
            let query = SearchQuery {
                origin: Some(Coordinate::new(-6.2, 106.8)),
                cursor: Some(cursor.to_string()),
                ..SearchQuery::new(10)
            };
            let err = engine.search(query).await.unwrap_err();
            assert!(matches!(err, SearchError::InvalidQuery { .. }), "{cursor}");
        }
        assert!(store.seen.lock().expect("lock").is_empty());
    }

    #[test]
    fn ranked_cursor_keeps_exact_distance_and_id() {
        let token = Cursor::encode_after_rank(412.377_5, "p:3");
        assert_eq!(
            Cursor::decode(Some(&token), true).expect("decodes"),
            Cursor::AfterRank {
                distance: 412.377_5,
                id: "p:3".to_string(),
            }
        );
        assert_eq!(
            Cursor::decode(Some(" p3 "), false).expect("decodes"),
            Cursor::AfterId("p3".to_string())
        );
        assert_eq!(Cursor::decode(None, true).expect("decodes"), Cursor::Start);
    }

    #[tokio::test]
    async fn store_order_search_loads_windows_until_page_fills() {
        // 7 candidates, fetch window of 3; only the last two match.
        let records = (1..=7_i32)
            .map(|i| {
                let kind = if i >= 6 { "siomay" } else { "bakso" };
                record(&format!("p{i:02}"), kind, -6.2)
            })
            .collect();
        let store = Arc::new(WindowedStore::new(records));
        let query = SearchQuery {
            keywords: vec!["siomay".to_string()],
            ..SearchQuery::new(1)
        };

        let page = engine_over(Arc::clone(&store)).search(query).await.expect("search");

        let ids: Vec<&str> = page.items.iter().map(|i| i.record.id.as_str()).collect();
        assert_eq!(ids, ["p06"]);
        assert!(page.has_more);
        assert_eq!(page.next_cursor.as_deref(), Some("p06"));
        assert_eq!(
            store.resumed_after(),
            [None, Some("p03".to_string()), Some("p06".to_string())]
        );
    }

    #[tokio::test]
    async fn ranked_search_scans_every_window_and_resumes_from_the_top() {
        // Ids run opposite to distance: p05 is nearest.
        let records = (1..=5_i32)
            .map(|i| record(&format!("p{i:02}"), "bakso", -6.2 + 0.001 * f64::from(6 - i)))
            .collect();
        let store = Arc::new(WindowedStore::new(records));
        let engine = engine_over(Arc::clone(&store));
        let origin = Coordinate::new(-6.2, 106.8);

        let first = engine
            .search(SearchQuery {
                origin: Some(origin),
                ..SearchQuery::new(2)
            })
            .await
            .expect("first page");
        let ids: Vec<&str> = first.items.iter().map(|i| i.record.id.as_str()).collect();
        assert_eq!(ids, ["p05", "p04"]);
        assert!(first.has_more);

        let second = engine
            .search(SearchQuery {
                origin: Some(origin),
                cursor: first.next_cursor.clone(),
                ..SearchQuery::new(2)
            })
            .await
            .expect("second page");
        let ids: Vec<&str> = second.items.iter().map(|i| i.record.id.as_str()).collect();
        assert_eq!(ids, ["p03", "p02"]);

        // Windows of 6 cover the store once per page; both scans start at the top.
        assert_eq!(store.resumed_after(), [None, None]);
    }

    fn engine_over(store: Arc<WindowedStore>) -> SearchEngine<PeddlerRecord> {
        SearchEngine::new(
            store,
            SearchSettings {
                over_fetch_factor: 3,
                ..SearchSettings::default()
            },
        )
    }
}
