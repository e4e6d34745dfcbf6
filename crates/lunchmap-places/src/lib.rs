pub mod client;
pub mod error;
pub mod types;

pub use client::{KakaoPlaceClient, SearchOutcome};
pub use error::PlacesError;
pub use types::{KakaoDocument, KakaoKeywordResponse};
