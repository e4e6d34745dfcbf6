//! Database operations for the `restaurants` table.

use chrono::{DateTime, Utc};
use lunchmap_core::{Cuisine, NewRestaurant, Restaurant, RestaurantPatch};
use sqlx::PgPool;

use crate::DbError;

const RESTAURANT_COLUMNS: &str = "id, name, cuisine, rating, rating_count, review, best_menu, \
     recommender, location, latitude, longitude, created_at, updated_at";

// ---------------------------------------------------------------------------
// Row type
// ---------------------------------------------------------------------------

/// A row from the `restaurants` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RestaurantRow {
    pub id: i64,
    pub name: String,
    pub cuisine: String,
    pub rating: f64,
    pub rating_count: i32,
    pub review: String,
    pub best_menu: Option<String>,
    pub recommender: Option<String>,
    pub location: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<RestaurantRow> for Restaurant {
    type Error = DbError;

    fn try_from(row: RestaurantRow) -> Result<Self, Self::Error> {
        let cuisine = row
            .cuisine
            .parse::<Cuisine>()
            .map_err(|_| DbError::InvalidCuisine(row.cuisine.clone()))?;
        Ok(Restaurant {
            id: row.id,
            name: row.name,
            cuisine,
            rating: row.rating,
            rating_count: row.rating_count,
            review: row.review,
            best_menu: row.best_menu,
            recommender: row.recommender,
            location: row.location,
            latitude: row.latitude,
            longitude: row.longitude,
        })
    }
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Returns every stored restaurant in insertion order.
///
/// Rows whose cuisine cannot be parsed are skipped with a warning so one bad
/// row does not hide the whole table.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_restaurants(pool: &PgPool) -> Result<Vec<Restaurant>, DbError> {
    let rows = sqlx::query_as::<_, RestaurantRow>(&format!(
        "SELECT {RESTAURANT_COLUMNS} FROM restaurants ORDER BY id"
    ))
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .filter_map(|row| {
            let id = row.id;
            Restaurant::try_from(row)
                .map_err(|e| tracing::warn!(id, error = %e, "skipping unreadable restaurant row"))
                .ok()
        })
        .collect())
}

/// Returns a single restaurant by id, or `None` if not found.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails, or
/// [`DbError::InvalidCuisine`] if the stored cuisine is unknown.
pub async fn get_restaurant(pool: &PgPool, id: i64) -> Result<Option<Restaurant>, DbError> {
    let row = sqlx::query_as::<_, RestaurantRow>(&format!(
        "SELECT {RESTAURANT_COLUMNS} FROM restaurants WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    row.map(Restaurant::try_from).transpose()
}

/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn count_restaurants(pool: &PgPool) -> Result<i64, DbError> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM restaurants")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Inserts a restaurant and returns it with its assigned id.
///
/// Cuisine is stored by its English label.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails (including CHECK violations).
pub async fn insert_restaurant(pool: &PgPool, record: &NewRestaurant) -> Result<Restaurant, DbError> {
    let row = sqlx::query_as::<_, RestaurantRow>(&format!(
        "INSERT INTO restaurants \
             (name, cuisine, rating, rating_count, review, best_menu, recommender, location, latitude, longitude) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
         RETURNING {RESTAURANT_COLUMNS}"
    ))
    .bind(&record.name)
    .bind(record.cuisine.label())
    .bind(record.rating)
    .bind(record.rating_count)
    .bind(&record.review)
    .bind(&record.best_menu)
    .bind(&record.recommender)
    .bind(&record.location)
    .bind(record.latitude)
    .bind(record.longitude)
    .fetch_one(pool)
    .await?;

    Restaurant::try_from(row)
}

/// Applies the non-`None` fields of `patch` to the row with `id`.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no row has `id`, or [`DbError::Sqlx`] if the
/// update fails.
pub async fn update_restaurant(
    pool: &PgPool,
    id: i64,
    patch: &RestaurantPatch,
) -> Result<Restaurant, DbError> {
    let row = sqlx::query_as::<_, RestaurantRow>(&format!(
        "UPDATE restaurants SET \
             rating = COALESCE($2, rating), \
             rating_count = COALESCE($3, rating_count), \
             review = COALESCE($4, review), \
             recommender = COALESCE($5, recommender), \
             best_menu = COALESCE($6, best_menu), \
             updated_at = NOW() \
         WHERE id = $1 \
         RETURNING {RESTAURANT_COLUMNS}"
    ))
    .bind(id)
    .bind(patch.rating)
    .bind(patch.rating_count)
    .bind(&patch.review)
    .bind(&patch.recommender)
    .bind(&patch.best_menu)
    .fetch_optional(pool)
    .await?
    .ok_or(DbError::NotFound(id))?;

    Restaurant::try_from(row)
}
