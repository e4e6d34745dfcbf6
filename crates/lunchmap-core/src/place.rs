use serde::{Deserialize, Serialize};

use crate::geo::Coordinate;
use crate::restaurant::Restaurant;

/// A place returned by the external keyword search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidatePlace {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub address: String,
    #[serde(default)]
    pub category: Option<String>,
    /// True when a stored restaurant has exactly the same name.
    #[serde(default)]
    pub is_registered: bool,
}

impl CandidatePlace {
    #[must_use]
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }
}

/// Finds the stored restaurant a candidate refers to.
///
/// Matching is by exact name. Two different places with the same name resolve
/// to the first stored row.
#[must_use]
pub fn find_registered<'a>(
    candidate: &CandidatePlace,
    table: &'a [Restaurant],
) -> Option<&'a Restaurant> {
    table.iter().find(|r| r.name == candidate.name)
}

/// Sets `is_registered` on each candidate against the current table.
pub fn mark_registered(candidates: &mut [CandidatePlace], table: &[Restaurant]) {
    for candidate in candidates {
        candidate.is_registered = find_registered(candidate, table).is_some();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::restaurant::{Cuisine, NewRestaurant};

    fn stored(id: i64, name: &str) -> Restaurant {
        NewRestaurant {
            name: name.to_string(),
            cuisine: Cuisine::Korean,
            rating: 70.0,
            rating_count: 1,
            review: String::new(),
            best_menu: None,
            recommender: None,
            location: None,
            latitude: None,
            longitude: None,
        }
        .with_id(id)
    }

    fn hit(name: &str) -> CandidatePlace {
        CandidatePlace {
            name: name.to_string(),
            latitude: 37.5,
            longitude: 127.0,
            address: String::new(),
            category: None,
            is_registered: false,
        }
    }

    #[test]
    fn exact_name_match_is_registered() {
        let table = vec![stored(1, "Gukbap Jip"), stored(2, "Noodle Bar")];
        let found = find_registered(&hit("Noodle Bar"), &table).map(|r| r.id);
        assert_eq!(found, Some(2));
    }

    #[test]
    fn near_names_do_not_match() {
        let table = vec![stored(1, "Noodle Bar")];
        assert!(find_registered(&hit("noodle bar"), &table).is_none());
        assert!(find_registered(&hit("Noodle Bar 2"), &table).is_none());
    }

    #[test]
    fn mark_registered_flags_each_candidate() {
        let table = vec![stored(1, "Noodle Bar")];
        let mut hits = vec![hit("Noodle Bar"), hit("Taco Stand")];
        mark_registered(&mut hits, &table);
        assert!(hits[0].is_registered);
        assert!(!hits[1].is_registered);
    }
}
