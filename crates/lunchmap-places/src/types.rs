//! Response shapes of the keyword search endpoint.
//!
//! Coordinates arrive as decimal strings: `x` is longitude and `y` latitude.

use lunchmap_core::CandidatePlace;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct KakaoKeywordResponse {
    #[serde(default)]
    pub documents: Vec<KakaoDocument>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct KakaoDocument {
    pub place_name: String,
    pub x: String,
    pub y: String,
    #[serde(default)]
    pub address_name: String,
    #[serde(default)]
    pub road_address_name: String,
    #[serde(default)]
    pub category_name: String,
}

impl KakaoDocument {
    /// Converts to a [`CandidatePlace`], or `None` if the coordinates do not parse.
    ///
    /// The road address is preferred over the lot-number address when present.
    #[must_use]
    pub fn into_candidate(self) -> Option<CandidatePlace> {
        let latitude = self.y.trim().parse::<f64>().ok().filter(|v| v.is_finite())?;
        let longitude = self.x.trim().parse::<f64>().ok().filter(|v| v.is_finite())?;
        let address = if self.road_address_name.trim().is_empty() {
            self.address_name
        } else {
            self.road_address_name
        };
        Some(CandidatePlace {
            name: self.place_name,
            latitude,
            longitude,
            address,
            category: Some(self.category_name).filter(|c| !c.is_empty()),
            is_registered: false,
        })
    }
}

/// Error body returned with non-2xx statuses.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct KakaoErrorBody {
    #[serde(default, rename = "errorType")]
    pub error_type: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}
