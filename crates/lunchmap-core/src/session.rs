//! Interactions that write through the restaurant store.
//!
//! Both flows validate first and only build the next [`SelectionState`] after
//! the store accepted the write. On any error the caller's state is untouched.

use serde::Deserialize;
use thiserror::Error;

use crate::place::CandidatePlace;
use crate::rating::{review_entry, review_patch, validate_score};
use crate::restaurant::{Cuisine, NewRestaurant, Restaurant};
use crate::selection::SelectionState;
use crate::store::{RestaurantStore, StoreError};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("{0}")]
    Validation(String),
    #[error("restaurant {0} not found")]
    NotFound(i64),
    #[error("there are no restaurants to pick from")]
    EmptyTable,
    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for SessionError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound { id } => SessionError::NotFound(id),
            other => SessionError::Store(other),
        }
    }
}

/// Form submitted to turn a search hit into a stored restaurant.
#[derive(Debug, Clone, Deserialize)]
pub struct Registration {
    pub name: String,
    pub cuisine: Cuisine,
    pub score: f64,
    pub comment: String,
    /// Comma-separated names of the people recommending the place.
    pub recommenders: String,
    #[serde(default)]
    pub best_menu: Option<String>,
}

fn require(field: &str, value: &str) -> Result<(), SessionError> {
    if value.trim().is_empty() {
        Err(SessionError::Validation(format!("{field} must not be empty")))
    } else {
        Ok(())
    }
}

/// Folds a new score into `restaurant` and appends the comment to its log.
///
/// Returns the next state (still focused on the restaurant) together with the
/// row as persisted.
///
/// # Errors
///
/// - [`SessionError::Validation`] if `comment` or `contributor` is empty or the
///   score is out of range. Nothing is written.
/// - [`SessionError::NotFound`] if the row disappeared from the store.
/// - [`SessionError::Store`] if the write failed.
pub async fn record_review<S: RestaurantStore>(
    store: &S,
    state: &SelectionState,
    restaurant: &Restaurant,
    score: f64,
    comment: &str,
    contributor: &str,
) -> Result<(SelectionState, Restaurant), SessionError> {
    require("comment", comment)?;
    require("contributor name", contributor)?;
    validate_score(score)?;

    let patch = review_patch(restaurant, score, comment.trim(), contributor.trim());
    let updated = store.update_by_id(restaurant.id, &patch).await?;

    Ok((state.clone().select_row(&updated), updated))
}

/// Inserts `candidate` as a new restaurant and opens it.
///
/// # Errors
///
/// - [`SessionError::Validation`] if the name, comment or recommenders are
///   empty or the score is out of range. Nothing is inserted.
/// - [`SessionError::Store`] if the insert failed.
pub async fn register_candidate<S: RestaurantStore>(
    store: &S,
    state: &SelectionState,
    candidate: &CandidatePlace,
    form: &Registration,
) -> Result<(SelectionState, Restaurant), SessionError> {
    require("name", &form.name)?;
    require("comment", &form.comment)?;
    require("recommenders", &form.recommenders)?;
    validate_score(form.score)?;

    let recommenders = form.recommenders.trim();
    let record = NewRestaurant {
        name: form.name.trim().to_string(),
        cuisine: form.cuisine,
        rating: form.score,
        rating_count: 1,
        review: review_entry(recommenders, form.comment.trim(), form.score),
        best_menu: form
            .best_menu
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(ToOwned::to_owned),
        recommender: Some(recommenders.to_string()),
        location: Some(candidate.address.clone()).filter(|a| !a.is_empty()),
        latitude: Some(candidate.latitude),
        longitude: Some(candidate.longitude),
    };

    let inserted = store.insert(&record).await?;

    let next = state.clone().clear_search_query().select_row(&inserted);
    Ok((next, inserted))
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
