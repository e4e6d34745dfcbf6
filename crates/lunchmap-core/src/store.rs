//! The restaurant table as seen by the session flows.

use std::future::Future;

use thiserror::Error;

use crate::restaurant::{NewRestaurant, Restaurant, RestaurantPatch};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("restaurant {id} not found")]
    NotFound { id: i64 },
    #[error("restaurant store is not configured")]
    NotConfigured,
    #[error("restaurant store unavailable: {0}")]
    Transport(String),
}

/// CRUD access to the persisted restaurant table.
///
/// Writes are not coordinated: two sessions updating the same row race and the
/// last write wins.
pub trait RestaurantStore: Send + Sync {
    /// Every stored restaurant. Implementations return an empty list rather than
    /// an error when the backing table cannot be reached.
    fn list_all(&self) -> impl Future<Output = Vec<Restaurant>> + Send;

    /// Inserts a row and returns it with its assigned id.
    fn insert(
        &self,
        record: &NewRestaurant,
    ) -> impl Future<Output = Result<Restaurant, StoreError>> + Send;

    /// Applies `patch` to the row with `id`.
    ///
    /// Fails with [`StoreError::NotFound`] when no such row exists.
    fn update_by_id(
        &self,
        id: i64,
        patch: &RestaurantPatch,
    ) -> impl Future<Output = Result<Restaurant, StoreError>> + Send;
}
