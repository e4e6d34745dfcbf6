//! Shared fixtures for router tests.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use lunchmap_core::{AppConfig, Coordinate, Environment};
use lunchmap_db::PgRestaurantStore;
use lunchmap_places::KakaoPlaceClient;
use tower::ServiceExt;

use super::{build_app, AppState};
use crate::cache::TableCache;
use crate::sessions::SessionStore;

pub(crate) const OFFICE: Coordinate = Coordinate::new(37.561_786_4, 126.991_043_8);

pub(crate) fn test_config() -> AppConfig {
    AppConfig {
        database_url: None,
        env: Environment::Test,
        bind_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 3000),
        log_level: "info".to_string(),
        kakao_rest_api_key: None,
        kakao_js_api_key: Some("js-key".to_string()),
        reference: OFFICE,
        reference_name: "Office".to_string(),
        search_radius_m: 1000,
        table_cache_ttl_secs: 60,
        session_idle_secs: 3600,
        seed_path: None,
        db_max_connections: 5,
        db_min_connections: 1,
        db_acquire_timeout_secs: 5,
    }
}

pub(crate) fn test_app(store: PgRestaurantStore, places_base_url: Option<&str>) -> Router {
    let config = test_config();
    let places = places_base_url.map(|url| {
        Arc::new(
            KakaoPlaceClient::with_base_url("test-key", config.reference, 1000, url)
                .expect("client construction should not fail"),
        )
    });
    build_app(AppState {
        store,
        places,
        sessions: SessionStore::new(Duration::from_secs(config.session_idle_secs)),
        cache: TableCache::new(Duration::from_secs(config.table_cache_ttl_secs)),
        config: Arc::new(config),
    })
}

/// Sends one request and returns the status and the parsed JSON body.
pub(crate) async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .expect("request"),
        None => builder.body(Body::empty()).expect("request"),
    };

    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json parse")
    };
    (status, json)
}

/// Creates a session and returns its id.
pub(crate) async fn new_session(app: &Router) -> String {
    let (status, json) = send(app, "POST", "/api/v1/sessions", None).await;
    assert_eq!(status, StatusCode::CREATED);
    json["data"]["session_id"]
        .as_str()
        .expect("session id")
        .to_string()
}
