use axum::{extract::rejection::JsonRejection, extract::State, Extension, Json};
use serde::Serialize;

use crate::middleware::RequestId;

use super::search::{run_search, Facade, ListingItem, LocationPolicy, NearbyPage, NearbyRequest};
use super::{ApiError, AppState};

// Vendors may be browsed by city/district/subdistrict without a location.
const VENDORS: Facade = Facade {
    default_page_size: 20,
    location: LocationPolicy::UnlessAdminArea,
    failure_message: "Failed to find nearby vendors",
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct VendorsResponse {
    pub vendors: Vec<ListingItem>,
    pub has_more: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}

impl From<NearbyPage> for VendorsResponse {
    fn from(page: NearbyPage) -> Self {
        Self {
            vendors: page.items,
            has_more: page.has_more,
            next_cursor: page.next_cursor,
        }
    }
}

pub(super) async fn nearby_vendors(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    payload: Result<Json<NearbyRequest>, JsonRejection>,
) -> Result<Json<VendorsResponse>, ApiError> {
    let page = run_search(&state, VENDORS, &req_id.0, payload).await?;
    Ok(Json(page.into()))
}
