//! [`RestaurantStore`] backed by Postgres.

use lunchmap_core::{NewRestaurant, Restaurant, RestaurantPatch, RestaurantStore, StoreError};
use sqlx::PgPool;

use crate::{restaurants, DbError};

/// Postgres-backed restaurant table.
///
/// Without a pool the store behaves as an empty, read-only table: listing
/// returns nothing and writes fail with [`StoreError::NotConfigured`].
#[derive(Debug, Clone, Default)]
pub struct PgRestaurantStore {
    pool: Option<PgPool>,
}

impl PgRestaurantStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool: Some(pool) }
    }

    #[must_use]
    pub fn unconfigured() -> Self {
        Self { pool: None }
    }

    #[must_use]
    pub fn pool(&self) -> Option<&PgPool> {
        self.pool.as_ref()
    }

    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.pool.is_some()
    }

    fn require_pool(&self) -> Result<&PgPool, StoreError> {
        self.pool.as_ref().ok_or(StoreError::NotConfigured)
    }
}

impl From<DbError> for StoreError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::NotFound(id) => StoreError::NotFound { id },
            DbError::MissingDatabaseUrl => StoreError::NotConfigured,
            other => StoreError::Transport(other.to_string()),
        }
    }
}

impl RestaurantStore for PgRestaurantStore {
    async fn list_all(&self) -> Vec<Restaurant> {
        let Some(pool) = &self.pool else {
            tracing::warn!("restaurant store is not configured; returning an empty table");
            return Vec::new();
        };
        match restaurants::list_restaurants(pool).await {
            Ok(rows) => rows,
            Err(e) => {
                tracing::warn!(error = %e, "failed to load restaurants; returning an empty table");
                Vec::new()
            }
        }
    }

    async fn insert(&self, record: &NewRestaurant) -> Result<Restaurant, StoreError> {
        let pool = self.require_pool()?;
        restaurants::insert_restaurant(pool, record)
            .await
            .map_err(StoreError::from)
    }

    async fn update_by_id(
        &self,
        id: i64,
        patch: &RestaurantPatch,
    ) -> Result<Restaurant, StoreError> {
        let pool = self.require_pool()?;
        restaurants::update_restaurant(pool, id, patch)
            .await
            .map_err(StoreError::from)
    }
}
