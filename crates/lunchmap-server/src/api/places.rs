use axum::{
    extract::{Query, State},
    Extension, Json,
};
use lunchmap_core::{mark_registered, CandidatePlace, Restaurant};
use lunchmap_places::PlacesError;
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct SearchParams {
    pub keyword: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct SearchResult {
    pub places: Vec<CandidatePlace>,
    pub warning: Option<String>,
}

/// Runs the keyword search and flags hits already in `table`.
///
/// Never fails: a missing client or a failed request yields no places and a
/// warning.
pub(super) async fn search_candidates(
    state: &AppState,
    keyword: &str,
    table: &[Restaurant],
) -> SearchResult {
    if keyword.trim().is_empty() {
        return SearchResult {
            places: Vec::new(),
            warning: None,
        };
    }
    let Some(client) = state.places.as_ref() else {
        return SearchResult {
            places: Vec::new(),
            warning: Some(PlacesError::NotConfigured.to_string()),
        };
    };

    let mut outcome = client.search(keyword).await;
    mark_registered(&mut outcome.places, table);
    SearchResult {
        places: outcome.places,
        warning: outcome.warning,
    }
}

/// GET /api/v1/places/search?keyword=: external places near the office.
pub(super) async fn search_places(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(params): Query<SearchParams>,
) -> Result<Json<ApiResponse<SearchResult>>, ApiError> {
    let keyword = params.keyword.unwrap_or_default();
    if keyword.trim().is_empty() {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            "keyword must not be empty",
        ));
    }

    let table = state.cache.get_or_load(&state.store).await;
    let result = search_candidates(&state, &keyword, &table).await;
    Ok(Json(ApiResponse::new(req_id.0, result)))
}
