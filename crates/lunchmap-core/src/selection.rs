//! Per-session browse state and the transitions that drive it.
//!
//! [`SelectionState`] is a plain value: every transition consumes the current
//! state and returns the next one with `version` bumped. Callers own where the
//! value lives between requests.

use std::cmp::Ordering;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::geo::Coordinate;
use crate::place::{find_registered, CandidatePlace};
use crate::restaurant::{Cuisine, Restaurant};
use crate::session::SessionError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOption {
    #[default]
    Rating,
    Distance,
    Newest,
}

/// Which lens drives the visible row set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "cuisine", rename_all = "snake_case")]
pub enum ActiveFilter {
    #[default]
    All,
    Category(Cuisine),
    SearchActive,
}

/// The item whose detail panel is open.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum Selection {
    #[default]
    None,
    Existing(i64),
    New(CandidatePlace),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectionState {
    pub version: u64,
    pub active: ActiveFilter,
    pub sort: SortOption,
    pub search_query: String,
    pub selection: Selection,
    pub focus: Option<Coordinate>,
    /// Name of the most recent random pick, shown as a banner.
    pub last_pick: Option<String>,
}

impl SelectionState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn bump(mut self) -> Self {
        self.version += 1;
        self
    }

    fn reset_selection(&mut self) {
        self.selection = Selection::None;
        self.focus = None;
    }

    /// Opens a category, or `None` for every category.
    ///
    /// Choosing the category that is already open closes it back to
    /// [`ActiveFilter::All`].
    #[must_use]
    pub fn set_category(mut self, category: Option<Cuisine>) -> Self {
        self.active = match (self.active, category) {
            (ActiveFilter::Category(open), Some(requested)) if open == requested => {
                ActiveFilter::All
            }
            (_, Some(requested)) => ActiveFilter::Category(requested),
            (_, None) => ActiveFilter::All,
        };
        self.search_query.clear();
        self.reset_selection();
        self.bump()
    }

    /// A non-empty query replaces category browsing; an empty one returns to
    /// [`ActiveFilter::All`].
    #[must_use]
    pub fn set_search_query(mut self, query: &str) -> Self {
        query.clone_into(&mut self.search_query);
        self.active = if query.is_empty() {
            ActiveFilter::All
        } else {
            ActiveFilter::SearchActive
        };
        self.reset_selection();
        self.bump()
    }

    /// Empties the query without touching the selection. Only the search lens
    /// is closed; an open category stays open.
    #[must_use]
    pub fn clear_search_query(mut self) -> Self {
        self.search_query.clear();
        if self.active == ActiveFilter::SearchActive {
            self.active = ActiveFilter::All;
        }
        self.bump()
    }

    #[must_use]
    pub fn set_sort_option(mut self, sort: SortOption) -> Self {
        self.sort = sort;
        self.bump()
    }

    #[must_use]
    pub fn select_row(mut self, restaurant: &Restaurant) -> Self {
        self.selection = Selection::Existing(restaurant.id);
        self.focus = restaurant.coordinate();
        self.bump()
    }

    /// Routes a search hit that is already stored to its restaurant, otherwise
    /// opens it as a new place.
    #[must_use]
    pub fn select_candidate(mut self, candidate: CandidatePlace, table: &[Restaurant]) -> Self {
        if let Some(existing) = find_registered(&candidate, table) {
            return self.select_row(existing);
        }
        self.focus = Some(candidate.coordinate());
        self.selection = Selection::New(candidate);
        self.bump()
    }

    #[must_use]
    pub fn clear_selection(mut self) -> Self {
        self.reset_selection();
        self.bump()
    }

    /// Picks one row uniformly at random and resets the filters so it is
    /// visible in the default view.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::EmptyTable`] when `rows` is empty.
    pub fn pick_random<R: Rng>(
        &self,
        rows: &[Restaurant],
        rng: &mut R,
    ) -> Result<Self, SessionError> {
        if rows.is_empty() {
            return Err(SessionError::EmptyTable);
        }
        let winner = &rows[rng.random_range(0..rows.len())];

        let mut next = self.clone();
        next.active = ActiveFilter::All;
        next.search_query.clear();
        next.last_pick = Some(winner.name.clone());
        Ok(next.select_row(winner))
    }

    /// Applies the active filter and sort to `table`.
    ///
    /// Distance is measured from `reference`; rows without coordinates sort
    /// last. All sorts are stable.
    #[must_use]
    pub fn derive_visible_rows<'a>(
        &self,
        table: &'a [Restaurant],
        reference: Coordinate,
    ) -> Vec<&'a Restaurant> {
        let query = self.search_query.as_str();
        let mut rows: Vec<&Restaurant> = if !query.is_empty() {
            table.iter().filter(|r| matches_query(r, query)).collect()
        } else if let ActiveFilter::Category(cuisine) = self.active {
            table.iter().filter(|r| r.cuisine == cuisine).collect()
        } else {
            table.iter().collect()
        };

        match self.sort {
            SortOption::Rating => rows.sort_by(|a, b| b.rating.total_cmp(&a.rating)),
            SortOption::Newest => rows.sort_by(|a, b| b.id.cmp(&a.id)),
            SortOption::Distance => rows.sort_by(|a, b| {
                compare_distance(
                    a.coordinate().map(|c| reference.distance_m(&c)),
                    b.coordinate().map(|c| reference.distance_m(&c)),
                )
            }),
        }

        rows
    }

    /// Id of the opened stored restaurant, if any.
    #[must_use]
    pub fn selected_id(&self) -> Option<i64> {
        match self.selection {
            Selection::Existing(id) => Some(id),
            _ => None,
        }
    }
}

/// Case-sensitive substring match over name, cuisine label and best menu.
fn matches_query(restaurant: &Restaurant, query: &str) -> bool {
    restaurant.name.contains(query)
        || restaurant.cuisine.label().contains(query)
        || restaurant
            .best_menu
            .as_deref()
            .is_some_and(|menu| menu.contains(query))
}

fn compare_distance(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
#[path = "selection_test.rs"]
mod tests;
