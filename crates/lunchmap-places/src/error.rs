use thiserror::Error;

/// Errors returned by the keyword place search client.
#[derive(Debug, Error)]
pub enum PlacesError {
    /// Network or TLS failure, or a non-2xx status.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with an error envelope.
    #[error("place search API error: {0}")]
    ApiError(String),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// No REST key was supplied, so no client exists.
    #[error("place search is not configured")]
    NotConfigured,
}
