//! Render model handed to the list/map front-end.

use serde::Serialize;

use crate::geo::Coordinate;
use crate::place::CandidatePlace;
use crate::restaurant::{Cuisine, Restaurant};
use crate::selection::{Selection, SelectionState};

const NAME_LABEL_CHARS: usize = 8;
const CUISINE_LABEL_CHARS: usize = 4;
const MENU_LABEL_CHARS: usize = 10;

#[derive(Debug, Clone, Serialize)]
pub struct RowView {
    pub id: i64,
    pub label: String,
    pub name: String,
    pub cuisine: Cuisine,
    pub rating: f64,
    pub best_menu: Option<String>,
    pub is_selected: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub id: Option<i64>,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub rating: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MapView {
    pub center: Coordinate,
    pub reference: Marker,
    pub restaurants: Vec<Marker>,
    /// External search hits, drawn with a distinct marker style.
    pub search_hits: Vec<Marker>,
    pub highlighted: Option<Marker>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum DetailPanel {
    Existing(Restaurant),
    New(CandidatePlace),
}

#[derive(Debug, Clone, Serialize)]
pub struct RenderModel {
    pub state: SelectionState,
    pub rows: Vec<RowView>,
    pub row_count: usize,
    pub map: MapView,
    pub detail: Option<DetailPanel>,
    pub search_hits: Vec<CandidatePlace>,
    pub warnings: Vec<String>,
}

/// Inputs that come from outside the session.
#[derive(Debug, Clone, Copy)]
pub struct ViewContext<'a> {
    pub reference: Coordinate,
    pub reference_name: &'a str,
}

/// Shortens `s` to `max` characters, marking the cut with `..`.
fn clip(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        let kept: String = s.chars().take(max - 1).collect();
        format!("{kept}..")
    } else {
        s.to_string()
    }
}

/// Compact one-line label: `name | cuisine | ⭐rating | menu`.
#[must_use]
pub fn row_label(r: &Restaurant) -> String {
    let cuisine: String = r.cuisine.label().chars().take(CUISINE_LABEL_CHARS).collect();
    format!(
        "{} | {} | ⭐{:.1} | {}",
        clip(&r.name, NAME_LABEL_CHARS),
        cuisine,
        r.rating,
        clip(r.best_menu.as_deref().unwrap_or(""), MENU_LABEL_CHARS),
    )
}

fn restaurant_marker(r: &Restaurant) -> Option<Marker> {
    r.coordinate().map(|c| Marker {
        id: Some(r.id),
        name: r.name.clone(),
        lat: c.lat,
        lon: c.lon,
        rating: Some(r.rating),
    })
}

fn candidate_marker(c: &CandidatePlace) -> Marker {
    Marker {
        id: None,
        name: c.name.clone(),
        lat: c.latitude,
        lon: c.longitude,
        rating: None,
    }
}

fn mean_coordinate(markers: &[Marker]) -> Option<Coordinate> {
    if markers.is_empty() {
        return None;
    }
    #[allow(clippy::cast_precision_loss)] // marker counts are tiny
    let n = markers.len() as f64;
    let lat = markers.iter().map(|m| m.lat).sum::<f64>() / n;
    let lon = markers.iter().map(|m| m.lon).sum::<f64>() / n;
    Some(Coordinate::new(lat, lon))
}

/// Builds everything the front-end needs for one screen.
///
/// The map centres on the focused item, else on the mean of the visible
/// markers, else on the reference coordinate.
#[must_use]
pub fn render(
    state: &SelectionState,
    table: &[Restaurant],
    search_hits: Vec<CandidatePlace>,
    warnings: Vec<String>,
    ctx: ViewContext<'_>,
) -> RenderModel {
    let visible = state.derive_visible_rows(table, ctx.reference);
    let selected_id = state.selected_id();

    let rows: Vec<RowView> = visible
        .iter()
        .map(|r| RowView {
            id: r.id,
            label: row_label(r),
            name: r.name.clone(),
            cuisine: r.cuisine,
            rating: r.rating,
            best_menu: r.best_menu.clone(),
            is_selected: selected_id == Some(r.id),
        })
        .collect();

    let restaurants: Vec<Marker> = visible.iter().filter_map(|r| restaurant_marker(r)).collect();

    let detail = match &state.selection {
        Selection::None => None,
        Selection::Existing(id) => table
            .iter()
            .find(|r| r.id == *id)
            .cloned()
            .map(DetailPanel::Existing),
        Selection::New(candidate) => Some(DetailPanel::New(candidate.clone())),
    };

    let highlighted = state.focus.map(|focus| Marker {
        id: selected_id,
        name: match &detail {
            Some(DetailPanel::Existing(r)) => r.name.clone(),
            Some(DetailPanel::New(c)) => c.name.clone(),
            None => String::new(),
        },
        lat: focus.lat,
        lon: focus.lon,
        rating: None,
    });

    let center = state
        .focus
        .or_else(|| mean_coordinate(&restaurants))
        .unwrap_or(ctx.reference);

    RenderModel {
        state: state.clone(),
        row_count: rows.len(),
        rows,
        map: MapView {
            center,
            reference: Marker {
                id: None,
                name: ctx.reference_name.to_string(),
                lat: ctx.reference.lat,
                lon: ctx.reference.lon,
                rating: None,
            },
            restaurants,
            search_hits: search_hits.iter().map(candidate_marker).collect(),
            highlighted,
        },
        detail,
        search_hits,
        warnings,
    }
}
