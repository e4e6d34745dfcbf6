//! Starter restaurant list loaded from YAML.

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;

use crate::rating::{review_entry, MAX_SCORE, MIN_SCORE};
use crate::restaurant::{Cuisine, NewRestaurant};
use crate::ConfigError;

#[derive(Debug, Clone, Deserialize)]
pub struct SeedRestaurant {
    pub name: String,
    pub cuisine: Cuisine,
    pub score: f64,
    pub comment: String,
    pub recommender: String,
    #[serde(default)]
    pub best_menu: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

impl SeedRestaurant {
    /// A seeded row starts with a single review by its recommender.
    #[must_use]
    pub fn to_new_restaurant(&self) -> NewRestaurant {
        NewRestaurant {
            name: self.name.trim().to_string(),
            cuisine: self.cuisine,
            rating: self.score,
            rating_count: 1,
            review: review_entry(&self.recommender, &self.comment, self.score),
            best_menu: self.best_menu.clone(),
            recommender: Some(self.recommender.clone()),
            location: self.location.clone(),
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SeedFile {
    pub restaurants: Vec<SeedRestaurant>,
}

/// Load and validate the seed restaurant list from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_seed_file(path: &Path) -> Result<SeedFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::SeedFileIo {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_seed(&content)
}

/// # Errors
///
/// Returns `ConfigError` if the YAML is malformed or fails validation.
pub fn parse_seed(content: &str) -> Result<SeedFile, ConfigError> {
    let seed: SeedFile = serde_yaml::from_str(content).map_err(ConfigError::SeedFileParse)?;
    validate_seed(&seed)?;
    Ok(seed)
}

fn validate_seed(seed: &SeedFile) -> Result<(), ConfigError> {
    let mut seen_names = HashSet::new();

    for r in &seed.restaurants {
        if r.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "restaurant name must be non-empty".to_string(),
            ));
        }

        if !(MIN_SCORE..=MAX_SCORE).contains(&r.score) {
            return Err(ConfigError::Validation(format!(
                "restaurant '{}' has score {}; must be within [{MIN_SCORE}, {MAX_SCORE}]",
                r.name, r.score
            )));
        }

        if r.latitude.is_some() != r.longitude.is_some() {
            return Err(ConfigError::Validation(format!(
                "restaurant '{}' needs both latitude and longitude, or neither",
                r.name
            )));
        }

        if !seen_names.insert(r.name.trim().to_string()) {
            return Err(ConfigError::Validation(format!(
                "duplicate restaurant name: '{}'",
                r.name
            )));
        }
    }

    Ok(())
}
