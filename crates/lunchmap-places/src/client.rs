//! HTTP client for the Kakao Local keyword search.
//!
//! Searches are biased toward a fixed origin (the office) and limited to a
//! radius around it. One attempt per query; there is no retry.

use std::time::Duration;

use lunchmap_core::{CandidatePlace, Coordinate};
use reqwest::{Client, StatusCode, Url};

use crate::error::PlacesError;
use crate::types::{KakaoErrorBody, KakaoKeywordResponse};

const DEFAULT_BASE_URL: &str = "https://dapi.kakao.com/";
const KEYWORD_PATH: &str = "v2/local/search/keyword.json";
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Result of a search that never fails.
///
/// On any error `places` is empty and `warning` carries a short, user-facing
/// description.
#[derive(Debug, Clone, Default)]
pub struct SearchOutcome {
    pub places: Vec<CandidatePlace>,
    pub warning: Option<String>,
}

/// Client for the keyword place search API.
///
/// Use [`KakaoPlaceClient::new`] for production or
/// [`KakaoPlaceClient::with_base_url`] to point at a mock server in tests.
pub struct KakaoPlaceClient {
    client: Client,
    api_key: String,
    base_url: Url,
    origin: Coordinate,
    radius_m: u32,
}

impl KakaoPlaceClient {
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, origin: Coordinate, radius_m: u32) -> Result<Self, PlacesError> {
        Self::with_base_url(api_key, origin, radius_m, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`PlacesError::ApiError`] if `base_url`
    /// is not a valid URL.
    pub fn with_base_url(
        api_key: &str,
        origin: Coordinate,
        radius_m: u32,
        base_url: &str,
    ) -> Result<Self, PlacesError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(5))
            .user_agent("lunchmap/0.1")
            .build()?;

        // Exactly one trailing slash, so joining the endpoint path appends
        // rather than replacing the last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised)
            .map_err(|e| PlacesError::ApiError(format!("invalid base URL '{base_url}': {e}")))?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
            origin,
            radius_m,
        })
    }

    /// Looks up places matching `keyword` near the origin, ordered by accuracy.
    ///
    /// An empty or whitespace-only keyword returns no places without a request.
    /// Documents with unparseable coordinates are skipped.
    ///
    /// # Errors
    ///
    /// - [`PlacesError::Http`] on network failure or non-2xx status without an
    ///   error body.
    /// - [`PlacesError::ApiError`] if the API returned an error body.
    /// - [`PlacesError::Deserialize`] if the response does not match the
    ///   expected shape.
    pub async fn search_keyword(&self, keyword: &str) -> Result<Vec<CandidatePlace>, PlacesError> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Ok(Vec::new());
        }

        let url = self.build_url(keyword)?;
        let response = self
            .client
            .get(url.clone())
            .header(
                reqwest::header::AUTHORIZATION,
                format!("KakaoAK {}", self.api_key),
            )
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(Self::api_error(status, &body));
        }

        let parsed: KakaoKeywordResponse =
            serde_json::from_str(&body).map_err(|e| PlacesError::Deserialize {
                context: format!("keyword search (query={keyword})"),
                source: e,
            })?;

        Ok(parsed
            .documents
            .into_iter()
            .filter_map(crate::types::KakaoDocument::into_candidate)
            .collect())
    }

    /// Like [`search_keyword`](Self::search_keyword), but folds any failure
    /// into an empty result with a warning.
    pub async fn search(&self, keyword: &str) -> SearchOutcome {
        match self.search_keyword(keyword).await {
            Ok(places) => SearchOutcome {
                places,
                warning: None,
            },
            Err(e) => {
                tracing::warn!(keyword, error = %e, "place search failed");
                SearchOutcome {
                    places: Vec::new(),
                    warning: Some(format!("place search unavailable: {e}")),
                }
            }
        }
    }

    /// Builds the request URL with percent-encoded query parameters.
    fn build_url(&self, keyword: &str) -> Result<Url, PlacesError> {
        let mut url = self
            .base_url
            .join(KEYWORD_PATH)
            .map_err(|e| PlacesError::ApiError(format!("invalid endpoint path: {e}")))?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("query", keyword);
            pairs.append_pair("x", &self.origin.lon.to_string());
            pairs.append_pair("y", &self.origin.lat.to_string());
            pairs.append_pair("radius", &self.radius_m.to_string());
            pairs.append_pair("sort", "accuracy");
        }
        Ok(url)
    }

    fn api_error(status: StatusCode, body: &str) -> PlacesError {
        let detail = serde_json::from_str::<KakaoErrorBody>(body)
            .ok()
            .and_then(|b| match (b.error_type, b.message) {
                (Some(t), Some(m)) => Some(format!("{t}: {m}")),
                (t, m) => t.or(m),
            })
            .unwrap_or_else(|| "no error detail".to_string());
        PlacesError::ApiError(format!("status {}: {detail}", status.as_u16()))
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
