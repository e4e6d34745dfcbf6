use lunchmap_core::SeedRestaurant;
use sqlx::PgPool;

use crate::DbError;

/// Insert seed restaurants when the table is empty.
///
/// Returns the number of rows inserted; zero when the table already had data.
/// All inserts run inside a single transaction.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any database operation fails.
pub async fn seed_restaurants_if_empty(
    pool: &PgPool,
    restaurants: &[SeedRestaurant],
) -> Result<usize, DbError> {
    let mut tx = pool.begin().await?;

    let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM restaurants")
        .fetch_one(&mut *tx)
        .await?;
    if existing > 0 {
        return Ok(0);
    }

    let mut count = 0usize;
    for seed in restaurants {
        let record = seed.to_new_restaurant();
        sqlx::query(
            "INSERT INTO restaurants \
                 (name, cuisine, rating, rating_count, review, best_menu, recommender, location, latitude, longitude) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        )
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
        .execute(&mut *tx)
        .await?;
        count += 1;
    }

    tx.commit().await?;
    Ok(count)
}
