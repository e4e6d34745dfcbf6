//! Session handlers. Every handler loads the caller's [`SelectionState`],
//! applies one transition, stores the result and answers with the fresh
//! render model.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use lunchmap_core::{
    render, ActiveFilter, CandidatePlace, Cuisine, Registration, RenderModel, Restaurant,
    Selection, SelectionState, SortOption, ViewContext,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::middleware::RequestId;

use super::places::search_candidates;
use super::{map_session_error, ApiError, ApiResponse, AppState};

// ---------------------------------------------------------------------------
// Request bodies
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(in crate::api) struct CategoryRequest {
    /// `None` shows every category.
    #[serde(default)]
    pub category: Option<Cuisine>,
}

#[derive(Debug, Deserialize)]
pub(in crate::api) struct SearchRequest {
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Deserialize)]
pub(in crate::api) struct SortRequest {
    pub sort: SortOption,
}

/// Row click and map marker click both land here.
#[derive(Debug, Deserialize)]
pub(in crate::api) struct SelectRowRequest {
    pub restaurant_id: i64,
}

#[derive(Debug, Deserialize)]
pub(in crate::api) struct ReviewRequest {
    pub score: f64,
    pub comment: String,
    pub contributor: String,
}

// ---------------------------------------------------------------------------
// Response bodies
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub(in crate::api) struct SessionView {
    pub session_id: Uuid,
    pub view: RenderModel,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn load_session(state: &AppState, rid: &str, id: Uuid) -> Result<SelectionState, ApiError> {
    state
        .sessions
        .get(id)
        .await
        .ok_or_else(|| ApiError::new(rid, "not_found", format!("session {id} not found")))
}

async fn build_view(
    state: &AppState,
    id: Uuid,
    session: &SelectionState,
    table: &[Restaurant],
) -> SessionView {
    let (search_hits, warnings) = if session.active == ActiveFilter::SearchActive {
        let result = search_candidates(state, &session.search_query, table).await;
        (result.places, result.warning.into_iter().collect())
    } else {
        (Vec::new(), Vec::new())
    };

    let ctx = ViewContext {
        reference: state.config.reference,
        reference_name: &state.config.reference_name,
    };
    SessionView {
        session_id: id,
        view: render(session, table, search_hits, warnings, ctx),
    }
}

/// Stores `next` and renders it against the current table.
async fn commit(
    state: &AppState,
    req_id: String,
    id: Uuid,
    next: SelectionState,
) -> Json<ApiResponse<SessionView>> {
    let stored = state.sessions.put(id, next).await;
    let table = state.cache.get_or_load(&state.store).await;
    let view = build_view(state, id, &stored, &table).await;
    Json(ApiResponse::new(req_id, view))
}

fn find_row<'a>(
    rid: &str,
    table: &'a [Restaurant],
    restaurant_id: i64,
) -> Result<&'a Restaurant, ApiError> {
    table.iter().find(|r| r.id == restaurant_id).ok_or_else(|| {
        ApiError::new(
            rid,
            "not_found",
            format!("restaurant {restaurant_id} not found"),
        )
    })
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/sessions: start a session with the default view.
pub(in crate::api) async fn create_session(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> (StatusCode, Json<ApiResponse<SessionView>>) {
    let (id, session) = state.sessions.create().await;
    tracing::info!(session_id = %id, "session created");
    let table = state.cache.get_or_load(&state.store).await;
    let view = build_view(&state, id, &session, &table).await;
    (StatusCode::CREATED, Json(ApiResponse::new(req_id.0, view)))
}

/// GET /api/v1/sessions/{id}
pub(in crate::api) async fn get_session(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<SessionView>>, ApiError> {
    let session = load_session(&state, &req_id.0, id).await?;
    let table = state.cache.get_or_load(&state.store).await;
    let view = build_view(&state, id, &session, &table).await;
    Ok(Json(ApiResponse::new(req_id.0, view)))
}

/// PUT /api/v1/sessions/{id}/category
pub(in crate::api) async fn set_category(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<Uuid>,
    Json(body): Json<CategoryRequest>,
) -> Result<Json<ApiResponse<SessionView>>, ApiError> {
    let session = load_session(&state, &req_id.0, id).await?;
    let next = session.set_category(body.category);
    Ok(commit(&state, req_id.0, id, next).await)
}

/// PUT /api/v1/sessions/{id}/search
pub(in crate::api) async fn set_search(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<Uuid>,
    Json(body): Json<SearchRequest>,
) -> Result<Json<ApiResponse<SessionView>>, ApiError> {
    let session = load_session(&state, &req_id.0, id).await?;
    let next = session.set_search_query(&body.query);
    Ok(commit(&state, req_id.0, id, next).await)
}

/// PUT /api/v1/sessions/{id}/sort
pub(in crate::api) async fn set_sort(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<Uuid>,
    Json(body): Json<SortRequest>,
) -> Result<Json<ApiResponse<SessionView>>, ApiError> {
    let session = load_session(&state, &req_id.0, id).await?;
    let next = session.set_sort_option(body.sort);
    Ok(commit(&state, req_id.0, id, next).await)
}

/// POST /api/v1/sessions/{id}/selection: open a stored restaurant.
pub(in crate::api) async fn select_row(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<Uuid>,
    Json(body): Json<SelectRowRequest>,
) -> Result<Json<ApiResponse<SessionView>>, ApiError> {
    let session = load_session(&state, &req_id.0, id).await?;
    let table = state.cache.get_or_load(&state.store).await;
    let row = find_row(&req_id.0, &table, body.restaurant_id)?;
    let next = session.select_row(row);
    Ok(commit(&state, req_id.0, id, next).await)
}

/// POST /api/v1/sessions/{id}/selection/candidate: open a search hit.
pub(in crate::api) async fn select_candidate(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<Uuid>,
    Json(candidate): Json<CandidatePlace>,
) -> Result<Json<ApiResponse<SessionView>>, ApiError> {
    let session = load_session(&state, &req_id.0, id).await?;
    let table = state.cache.get_or_load(&state.store).await;
    let next = session.select_candidate(candidate, &table);
    Ok(commit(&state, req_id.0, id, next).await)
}

/// DELETE /api/v1/sessions/{id}/selection
pub(in crate::api) async fn clear_selection(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<SessionView>>, ApiError> {
    let session = load_session(&state, &req_id.0, id).await?;
    let next = session.clear_selection();
    Ok(commit(&state, req_id.0, id, next).await)
}

/// POST /api/v1/sessions/{id}/random: pick from the whole table.
pub(in crate::api) async fn pick_random(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<SessionView>>, ApiError> {
    let session = load_session(&state, &req_id.0, id).await?;
    let table: Arc<Vec<Restaurant>> = state.cache.get_or_load(&state.store).await;
    let next = session
        .pick_random(&table, &mut rand::rng())
        .map_err(|e| map_session_error(&req_id.0, &e))?;
    tracing::info!(session_id = %id, pick = ?next.last_pick, "random pick");
    Ok(commit(&state, req_id.0, id, next).await)
}

/// POST /api/v1/sessions/{id}/reviews: review the opened restaurant.
///
/// The row is re-read from the store first so the score folds into the
/// current aggregate rather than a cached one.
pub(in crate::api) async fn record_review(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<Uuid>,
    Json(body): Json<ReviewRequest>,
) -> Result<Json<ApiResponse<SessionView>>, ApiError> {
    let rid = req_id.0;
    let session = load_session(&state, &rid, id).await?;
    let Some(restaurant_id) = session.selected_id() else {
        return Err(ApiError::new(
            rid,
            "validation_error",
            "open a restaurant before reviewing it",
        ));
    };

    let table = state.cache.refresh(&state.store).await;
    let restaurant = find_row(&rid, &table, restaurant_id)?;

    let (next, updated) = lunchmap_core::record_review(
        &state.store,
        &session,
        restaurant,
        body.score,
        &body.comment,
        &body.contributor,
    )
    .await
    .map_err(|e| map_session_error(&rid, &e))?;

    state.cache.invalidate().await;
    tracing::info!(
        session_id = %id,
        restaurant_id,
        rating = updated.rating,
        rating_count = updated.rating_count,
        "review recorded"
    );
    Ok(commit(&state, rid, id, next).await)
}

/// POST /api/v1/sessions/{id}/registrations: save the opened search hit.
pub(in crate::api) async fn register_candidate(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<Uuid>,
    Json(form): Json<Registration>,
) -> Result<Json<ApiResponse<SessionView>>, ApiError> {
    let rid = req_id.0;
    let session = load_session(&state, &rid, id).await?;
    let Selection::New(candidate) = &session.selection else {
        return Err(ApiError::new(
            rid,
            "validation_error",
            "open a new place before registering it",
        ));
    };

    let (next, inserted) =
        lunchmap_core::register_candidate(&state.store, &session, candidate, &form)
            .await
            .map_err(|e| map_session_error(&rid, &e))?;

    state.cache.invalidate().await;
    tracing::info!(session_id = %id, restaurant_id = inserted.id, name = %inserted.name, "restaurant registered");
    Ok(commit(&state, rid, id, next).await)
}
