mod places;
mod restaurants;
mod sessions;

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post, put},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use lunchmap_core::{AppConfig, SessionError, StoreError};
use lunchmap_db::PgRestaurantStore;
use lunchmap_places::KakaoPlaceClient;
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::cache::TableCache;
use crate::middleware::{request_id, RequestId, REQUEST_ID_HEADER};
use crate::sessions::SessionStore;

#[derive(Clone)]
pub struct AppState {
    pub store: PgRestaurantStore,
    /// `None` when no search key is configured.
    pub places: Option<Arc<KakaoPlaceClient>>,
    pub sessions: SessionStore,
    pub cache: TableCache,
    pub config: Arc<AppConfig>,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    database: &'static str,
    place_search: &'static str,
    sessions: usize,
}

#[derive(Debug, Serialize)]
struct MapConfigData {
    reference_name: String,
    reference_lat: f64,
    reference_lon: f64,
    search_radius_m: u32,
    map_key: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub(super) fn new(request_id: String, data: T) -> Self {
        Self {
            data,
            meta: ResponseMeta::new(request_id),
        }
    }
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            "empty_table" => StatusCode::UNPROCESSABLE_ENTITY,
            "store_unavailable" => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

pub(super) fn map_session_error(request_id: &str, error: &SessionError) -> ApiError {
    match error {
        SessionError::Validation(msg) => ApiError::new(request_id, "validation_error", msg),
        SessionError::NotFound(_) | SessionError::Store(StoreError::NotFound { .. }) => {
            ApiError::new(request_id, "not_found", error.to_string())
        }
        SessionError::EmptyTable => ApiError::new(request_id, "empty_table", error.to_string()),
        SessionError::Store(StoreError::NotConfigured) => {
            tracing::warn!("write rejected: restaurant store is not configured");
            ApiError::new(request_id, "store_unavailable", error.to_string())
        }
        SessionError::Store(StoreError::Transport(_)) => {
            tracing::error!(error = %error, "restaurant store write failed");
            ApiError::new(
                request_id,
                "store_unavailable",
                "the restaurant store could not be reached; nothing was saved",
            )
        }
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static(REQUEST_ID_HEADER),
        ])
}

fn session_router() -> Router<AppState> {
    Router::new()
        .route("/api/v1/sessions", post(sessions::create_session))
        .route("/api/v1/sessions/{id}", get(sessions::get_session))
        .route("/api/v1/sessions/{id}/category", put(sessions::set_category))
        .route("/api/v1/sessions/{id}/search", put(sessions::set_search))
        .route("/api/v1/sessions/{id}/sort", put(sessions::set_sort))
        .route(
            "/api/v1/sessions/{id}/selection",
            post(sessions::select_row).delete(sessions::clear_selection),
        )
        .route(
            "/api/v1/sessions/{id}/selection/candidate",
            post(sessions::select_candidate),
        )
        .route("/api/v1/sessions/{id}/random", post(sessions::pick_random))
        .route("/api/v1/sessions/{id}/reviews", post(sessions::record_review))
        .route(
            "/api/v1/sessions/{id}/registrations",
            post(sessions::register_candidate),
        )
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/map-config", get(map_config))
        .route("/api/v1/restaurants", get(restaurants::list_restaurants))
        .route("/api/v1/places/search", get(places::search_places))
        .merge(session_router())
        .layer(
            ServiceBuilder::new()
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id))
                .layer(TraceLayer::new_for_http()),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    let meta = ResponseMeta::new(req_id.0);
    let place_search = if state.places.is_some() {
        "ok"
    } else {
        "not_configured"
    };
    let sessions = state.sessions.count().await;

    let database = match state.store.pool() {
        None => "not_configured",
        Some(pool) => match lunchmap_db::health_check(pool).await {
            Ok(()) => "ok",
            Err(e) => {
                tracing::warn!(error = %e, "health check: database unavailable");
                "unavailable"
            }
        },
    };

    let (status_code, status) = if database == "ok" {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    (
        status_code,
        Json(ApiResponse {
            data: HealthData {
                status,
                database,
                place_search,
                sessions,
            },
            meta,
        }),
    )
}

async fn map_config(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<MapConfigData>> {
    let config = &state.config;
    Json(ApiResponse::new(
        req_id.0,
        MapConfigData {
            reference_name: config.reference_name.clone(),
            reference_lat: config.reference.lat,
            reference_lon: config.reference.lon,
            search_radius_m: config.search_radius_m,
            map_key: config.kakao_js_api_key.clone(),
        },
    ))
}

#[cfg(test)]
pub(crate) mod test_support;

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;
