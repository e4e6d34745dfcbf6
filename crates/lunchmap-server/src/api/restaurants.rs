use axum::{extract::State, Extension, Json};
use lunchmap_core::Restaurant;

use crate::middleware::RequestId;

use super::{ApiResponse, AppState};

/// GET /api/v1/restaurants: the full table in insertion order.
///
/// Served from the table cache; an unreachable store yields an empty list.
pub(super) async fn list_restaurants(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<Vec<Restaurant>>> {
    let table = state.cache.get_or_load(&state.store).await;
    Json(ApiResponse::new(req_id.0, table.as_ref().clone()))
}
