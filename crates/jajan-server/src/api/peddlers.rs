use axum::{extract::rejection::JsonRejection, extract::State, Extension, Json};
use serde::Serialize;

use crate::middleware::RequestId;

use super::search::{run_search, Facade, ListingItem, LocationPolicy, NearbyPage, NearbyRequest};
use super::{ApiError, AppState};

const PEDDLERS: Facade = Facade {
    default_page_size: 10,
    location: LocationPolicy::Always,
    failure_message: "Failed to find nearby peddlers",
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct PeddlersResponse {
    pub peddlers: Vec<ListingItem>,
    pub has_more: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}

impl From<NearbyPage> for PeddlersResponse {
    fn from(page: NearbyPage) -> Self {
        Self {
            peddlers: page.items,
            has_more: page.has_more,
            next_cursor: page.next_cursor,
        }
    }
}

/// `POST /api/peddlers/nearby`: peddlers closest to the caller's location.
pub(super) async fn nearby_peddlers(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    payload: Result<Json<NearbyRequest>, JsonRejection>,
) -> Result<Json<PeddlersResponse>, ApiError> {
    let page = run_search(&state, PEDDLERS, &req_id.0, payload).await?;
    Ok(Json(page.into()))
}
