//! Discovery filter engine
//!
//! Pure functions that compute the filtered event view from the raw
//! event list and the active criteria, plus the featured/upcoming split
//! the discovery screen renders. Filtering is stable: output preserves
//! input order and never re-ranks.

use serde::{Deserialize, Serialize};

use crate::catalog::CitySelection;
use crate::model::Event;

/// Maximum number of events shown in the featured carousel
pub const FEATURED_LIMIT: usize = 5;

/// The (city, genre, search query) tuple that determines visibility
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCriteria {
    /// City restriction, `All` by default
    pub city: CitySelection,

    /// Genre restriction, `None` meaning "All"; matched case-sensitively
    /// against an event's genre tags
    pub genre: Option<String>,

    /// Free-text query; case-insensitive substring match against title,
    /// venue, location, and DJ names
    pub query: String,
}

impl FilterCriteria {
    /// Check whether every criterion is at its default (identity filter)
    pub fn is_default(&self) -> bool {
        self.city == CitySelection::All && self.genre.is_none() && self.query.is_empty()
    }

    /// Check whether the given event passes all active criteria
    pub fn matches(&self, event: &Event) -> bool {
        self.city_matches(event) && self.genre_matches(event) && self.query_matches(event)
    }

    fn city_matches(&self, event: &Event) -> bool {
        self.city.admits(event.city)
    }

    fn genre_matches(&self, event: &Event) -> bool {
        match &self.genre {
            None => true,
            Some(genre) => event.has_genre(genre),
        }
    }

    fn query_matches(&self, event: &Event) -> bool {
        if self.query.is_empty() {
            return true;
        }
        let needle = self.query.to_lowercase();
        event.title.to_lowercase().contains(&needle)
            || event.venue.to_lowercase().contains(&needle)
            || event.location.to_lowercase().contains(&needle)
            || event.djs.iter().any(|dj| dj.to_lowercase().contains(&needle))
    }
}

/// Filter events by the given criteria, preserving source order
///
/// All predicates are applied as a conjunction. Default criteria return
/// the input unchanged.
pub fn filter_events(events: &[Event], criteria: &FilterCriteria) -> Vec<Event> {
    events
        .iter()
        .filter(|event| criteria.matches(event))
        .cloned()
        .collect()
}

/// The derived view the discovery screen renders
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedView {
    /// Events passing all active criteria, source order preserved
    pub filtered_events: Vec<Event>,

    /// First `FEATURED_LIMIT` filtered events flagged as featured
    pub featured_events: Vec<Event>,

    /// All filtered events not flagged as featured
    pub upcoming_events: Vec<Event>,
}

impl DerivedView {
    /// Compute the derived view from the raw list and the active criteria
    pub fn compute(events: &[Event], criteria: &FilterCriteria) -> Self {
        let filtered_events = filter_events(events, criteria);

        let featured_events: Vec<Event> = filtered_events
            .iter()
            .filter(|event| event.featured)
            .take(FEATURED_LIMIT)
            .cloned()
            .collect();

        let upcoming_events: Vec<Event> = filtered_events
            .iter()
            .filter(|event| !event.featured)
            .cloned()
            .collect();

        DerivedView { filtered_events, featured_events, upcoming_events }
    }

    /// Check whether the view contains no events at all
    pub fn is_empty(&self) -> bool {
        self.filtered_events.is_empty()
    }

    /// Number of events passing the active criteria
    pub fn len(&self) -> usize {
        self.filtered_events.len()
    }
}
