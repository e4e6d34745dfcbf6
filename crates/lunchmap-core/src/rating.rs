//! Running-mean rating rule and the review log format.
//!
//! Only the aggregate `(rating, rating_count)` is persisted. Folding a score in
//! keeps `rating` equal to the arithmetic mean of every score submitted so far,
//! so the result does not depend on submission order.

use crate::restaurant::{Restaurant, RestaurantPatch};
use crate::session::SessionError;

pub const MIN_SCORE: f64 = 0.0;
pub const MAX_SCORE: f64 = 100.0;

/// Folds one more score into a running mean.
///
/// Returns the new `(rating, count)` pair. The count saturates at
/// `i32::MAX`; the mean is still folded.
#[must_use]
pub fn fold_score(rating: f64, count: i32, score: f64) -> (f64, i32) {
    let old = f64::from(count);
    ((rating * old + score) / (old + 1.0), count.saturating_add(1))
}

/// Rejects scores outside `[0, 100]` and non-finite values.
///
/// # Errors
///
/// Returns [`SessionError::Validation`] when the score is out of range.
pub fn validate_score(score: f64) -> Result<(), SessionError> {
    if score.is_finite() && (MIN_SCORE..=MAX_SCORE).contains(&score) {
        Ok(())
    } else {
        Err(SessionError::Validation(format!(
            "score must be between {MIN_SCORE} and {MAX_SCORE}, got {score}"
        )))
    }
}

/// Renders a score without a trailing `.0` for whole numbers.
#[must_use]
pub fn format_score(score: f64) -> String {
    if score.fract() == 0.0 {
        format!("{score:.0}")
    } else {
        format!("{score}")
    }
}

/// One review log entry: `[{who}] {comment} (⭐{score})`.
#[must_use]
pub fn review_entry(who: &str, comment: &str, score: f64) -> String {
    format!("[{who}] {comment} (⭐{})", format_score(score))
}

/// Appends a review entry, separated from earlier entries by a blank line.
#[must_use]
pub fn append_review(existing: &str, who: &str, comment: &str, score: f64) -> String {
    format!("{existing}\n\n{}", review_entry(who, comment, score))
}

/// Adds a contributor to the comma-separated recommender list.
#[must_use]
pub fn append_recommender(existing: Option<&str>, who: &str) -> String {
    match existing.map(str::trim) {
        Some(list) if !list.is_empty() => format!("{list}, {who}"),
        _ => who.to_string(),
    }
}

/// Builds the patch that records one more review against `restaurant`.
#[must_use]
pub fn review_patch(
    restaurant: &Restaurant,
    score: f64,
    comment: &str,
    contributor: &str,
) -> RestaurantPatch {
    let (rating, rating_count) = fold_score(restaurant.rating, restaurant.rating_count, score);
    RestaurantPatch {
        rating: Some(rating),
        rating_count: Some(rating_count),
        review: Some(append_review(&restaurant.review, contributor, comment, score)),
        recommender: Some(append_recommender(
            restaurant.recommender.as_deref(),
            contributor,
        )),
        best_menu: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{a} != {b}");
    }

    #[test]
    fn fold_score_follows_running_mean() {
        let (r, n) = fold_score(80.0, 1, 60.0);
        assert_close(r, 70.0);
        assert_eq!(n, 2);

        let (r, n) = fold_score(r, n, 100.0);
        assert_close(r, 80.0);
        assert_eq!(n, 3);
    }

    #[test]
    fn fold_score_is_order_independent() {
        let orders: [[f64; 2]; 2] = [[60.0, 100.0], [100.0, 60.0]];
        for order in orders {
            let (mut r, mut n) = (80.0, 1);
            for score in order {
                (r, n) = fold_score(r, n, score);
            }
            assert_close(r, 80.0);
            assert_eq!(n, 3);
        }
    }

    #[test]
    fn fold_score_saturates_count() {
        let (r, n) = fold_score(90.0, i32::MAX, 0.0);
        assert_eq!(n, i32::MAX);
        assert!(r < 90.0 && r > 89.999);
    }

    #[test]
    fn validate_score_bounds() {
        assert!(validate_score(0.0).is_ok());
        assert!(validate_score(100.0).is_ok());
        assert!(validate_score(-1.0).is_err());
        assert!(validate_score(100.5).is_err());
        assert!(validate_score(f64::NAN).is_err());
    }

    #[test]
    fn format_score_drops_whole_fraction() {
        assert_eq!(format_score(80.0), "80");
        assert_eq!(format_score(72.5), "72.5");
    }

    #[test]
    fn append_review_uses_blank_line_separator() {
        let log = append_review("[Min] tasty (⭐80)", "Jae", "too salty", 60.0);
        assert_eq!(log, "[Min] tasty (⭐80)\n\n[Jae] too salty (⭐60)");
    }

    #[test]
    fn append_recommender_sets_when_empty() {
        assert_eq!(append_recommender(None, "Jae"), "Jae");
        assert_eq!(append_recommender(Some("  "), "Jae"), "Jae");
        assert_eq!(append_recommender(Some("Min"), "Jae"), "Min, Jae");
    }
}
