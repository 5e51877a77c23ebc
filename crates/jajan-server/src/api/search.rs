//! Request handling shared by the peddler and vendor nearby-search routes.
//!
//! Both routes drive the same [`SearchEngine`](jajan_core::SearchEngine);
//! they differ only in vocabulary, default page size, and whether a
//! location is mandatory.

use axum::{extract::rejection::JsonRejection, Json};
use jajan_core::{AdminArea, Coordinate, PeddlerRecord, ResultPage, SearchError, SearchQuery};
use serde::{Deserialize, Serialize};

use super::{ApiError, AppState};

/// When a request must carry a `location`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum LocationPolicy {
    Always,
    /// Administrative-area filters alone are enough.
    UnlessAdminArea,
}

/// Per-route behavior for one nearby-search facade.
#[derive(Debug, Clone, Copy)]
pub(super) struct Facade {
    pub default_page_size: usize,
    pub location: LocationPolicy,
    pub failure_message: &'static str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct NearbyRequest {
    #[serde(default)]
    pub query_details: QueryDetails,
    pub location: Option<Coordinate>,
    pub cursor: Option<String>,
    pub limit: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct QueryDetails {
    #[serde(alias = "vendorType")]
    pub peddler_type: Option<String>,
    pub keywords: Option<Vec<String>>,
    pub max_distance_meters: Option<f64>,
    pub city: Option<String>,
    pub district: Option<String>,
    pub subdistrict: Option<String>,
}

/// A record on the wire, with its rendered distance when an origin was given.
#[derive(Debug, Serialize)]
pub(super) struct ListingItem {
    #[serde(flatten)]
    pub record: PeddlerRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<String>,
}

/// A page ready to be wrapped in a route-specific response body.
#[derive(Debug)]
pub(super) struct NearbyPage {
    pub items: Vec<ListingItem>,
    pub has_more: bool,
    pub next_cursor: Option<String>,
}

impl From<ResultPage<PeddlerRecord>> for NearbyPage {
    fn from(page: ResultPage<PeddlerRecord>) -> Self {
        Self {
            items: page
                .items
                .into_iter()
                .map(|item| ListingItem {
                    record: item.record,
                    distance: item.distance_label,
                })
                .collect(),
            has_more: page.has_more,
            next_cursor: page.next_cursor,
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Resolve a request `limit` to a page size.
///
/// Absent means the facade default; anything at or below zero maps to zero
/// so the engine rejects it as an invalid query.
pub(super) fn normalize_page_size(limit: Option<i64>, default: usize, max: usize) -> usize {
    match limit {
        None => default.min(max),
        Some(n) if n <= 0 => 0,
        Some(n) => usize::try_from(n).unwrap_or(usize::MAX).min(max),
    }
}

impl NearbyRequest {
    fn into_query(self, page_size: usize) -> SearchQuery {
        let details = self.query_details;
        SearchQuery {
            origin: self.location,
            type_filter: non_blank(details.peddler_type),
            keywords: details.keywords.unwrap_or_default(),
            admin_area: AdminArea {
                city: non_blank(details.city),
                district: non_blank(details.district),
                subdistrict: non_blank(details.subdistrict),
            },
            radius_meters: details.max_distance_meters,
            page_size,
            cursor: self.cursor,
        }
    }
}

/// Validate, search under the configured timeout, and map failures to
/// the route's error bodies.
pub(super) async fn run_search(
    state: &AppState,
    facade: Facade,
    request_id: &str,
    payload: Result<Json<NearbyRequest>, JsonRejection>,
) -> Result<NearbyPage, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        tracing::debug!(request_id, error = %rejection, "rejected request body");
        ApiError::bad_request(rejection.body_text())
    })?;

    let page_size = normalize_page_size(
        request.limit,
        facade.default_page_size,
        state.max_page_size,
    );
    let query = request.into_query(page_size);

    if query.origin.is_none()
        && (facade.location == LocationPolicy::Always || query.admin_area.is_empty())
    {
        return Err(ApiError::bad_request("Location is required"));
    }

    let outcome = tokio::time::timeout(state.search_timeout, state.engine.search(query)).await;

    match outcome {
        Ok(Ok(page)) => Ok(NearbyPage::from(page)),
        Ok(Err(SearchError::InvalidQuery { reason })) => Err(ApiError::bad_request(reason)),
        Ok(Err(SearchError::StoreUnavailable(e))) => {
            tracing::error!(request_id, error = %e, "nearby search failed");
            Err(ApiError::internal(facade.failure_message))
        }
        Err(_) => {
            tracing::warn!(
                request_id,
                timeout_ms = u64::try_from(state.search_timeout.as_millis()).unwrap_or(u64::MAX),
                "nearby search timed out"
            );
            Err(ApiError::internal(facade.failure_message))
        }
    }
}
