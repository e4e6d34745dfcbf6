use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::geo::Coordinate;
use crate::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cuisine {
    #[serde(alias = "한식")]
    Korean,
    #[serde(alias = "중식")]
    Chinese,
    #[serde(alias = "일식")]
    Japanese,
    #[serde(alias = "양식")]
    Western,
    #[serde(alias = "분식")]
    Snack,
    #[serde(alias = "술집")]
    Bar,
    #[serde(alias = "기타")]
    Other,
}

impl Cuisine {
    pub const ALL: [Cuisine; 7] = [
        Cuisine::Korean,
        Cuisine::Chinese,
        Cuisine::Japanese,
        Cuisine::Western,
        Cuisine::Snack,
        Cuisine::Bar,
        Cuisine::Other,
    ];

    /// The label stored in the `cuisine` column and matched by free-text search.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Cuisine::Korean => "Korean",
            Cuisine::Chinese => "Chinese",
            Cuisine::Japanese => "Japanese",
            Cuisine::Western => "Western",
            Cuisine::Snack => "Snack",
            Cuisine::Bar => "Bar",
            Cuisine::Other => "Other",
        }
    }

    /// Label used by the legacy spreadsheet this table was first populated from.
    #[must_use]
    pub const fn legacy_label(self) -> &'static str {
        match self {
            Cuisine::Korean => "한식",
            Cuisine::Chinese => "중식",
            Cuisine::Japanese => "일식",
            Cuisine::Western => "양식",
            Cuisine::Snack => "분식",
            Cuisine::Bar => "술집",
            Cuisine::Other => "기타",
        }
    }
}

impl std::fmt::Display for Cuisine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Cuisine {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Cuisine::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(s) || c.legacy_label() == s)
            .ok_or_else(|| CoreError::InvalidCuisine(s.to_string()))
    }
}

/// A persisted restaurant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Restaurant {
    pub id: i64,
    pub name: String,
    pub cuisine: Cuisine,
    /// Mean of `rating_count` submitted scores, each in `[0, 100]`.
    pub rating: f64,
    pub rating_count: i32,
    pub review: String,
    pub best_menu: Option<String>,
    pub recommender: Option<String>,
    pub location: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl Restaurant {
    #[must_use]
    pub fn coordinate(&self) -> Option<Coordinate> {
        Coordinate::from_parts(self.latitude, self.longitude)
    }
}

/// Fields for a restaurant that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewRestaurant {
    pub name: String,
    pub cuisine: Cuisine,
    pub rating: f64,
    pub rating_count: i32,
    pub review: String,
    pub best_menu: Option<String>,
    pub recommender: Option<String>,
    pub location: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl NewRestaurant {
    /// Attaches a store-assigned id.
    #[must_use]
    pub fn with_id(self, id: i64) -> Restaurant {
        Restaurant {
            id,
            name: self.name,
            cuisine: self.cuisine,
            rating: self.rating,
            rating_count: self.rating_count,
            review: self.review,
            best_menu: self.best_menu,
            recommender: self.recommender,
            location: self.location,
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}

/// Sparse update applied by `update_by_id`. `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RestaurantPatch {
    pub rating: Option<f64>,
    pub rating_count: Option<i32>,
    pub review: Option<String>,
    pub recommender: Option<String>,
    pub best_menu: Option<String>,
}

impl RestaurantPatch {
    /// Overlays the patch onto `restaurant` in place.
    pub fn apply_to(&self, restaurant: &mut Restaurant) {
        if let Some(rating) = self.rating {
            restaurant.rating = rating;
        }
        if let Some(count) = self.rating_count {
            restaurant.rating_count = count;
        }
        if let Some(ref review) = self.review {
            restaurant.review.clone_from(review);
        }
        if let Some(ref recommender) = self.recommender {
            restaurant.recommender = Some(recommender.clone());
        }
        if let Some(ref best_menu) = self.best_menu {
            restaurant.best_menu = Some(best_menu.clone());
        }
    }
}
