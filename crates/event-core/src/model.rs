//! Event data model
//!
//! A validated event record as used throughout the app. Wire-level
//! sanitization lives in the client crate; by the time an `Event` exists
//! its id is non-empty and its date has parsed.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::catalog::CityId;

/// A schedulable happening (concert, party) with date, venue, and tags
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Unique identifier, immutable once created
    pub id: String,

    /// Event title
    pub title: String,

    /// Venue name
    pub venue: String,

    /// Free-form location within the city
    pub location: String,

    /// City the event takes place in
    pub city: CityId,

    /// Calendar date of the event
    pub date: NaiveDate,

    /// Display time string (e.g., "23:00")
    pub time: String,

    /// Cover image URI
    pub image: String,

    /// Ordered genre tags
    pub genres: Vec<String>,

    /// Lineup of DJs/artists, may be empty
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub djs: Vec<String>,

    /// Whether the event gets promotional placement
    #[serde(default)]
    pub featured: bool,
}

impl Event {
    /// Check whether the event carries the given genre tag (case-sensitive)
    pub fn has_genre(&self, genre: &str) -> bool {
        self.genres.iter().any(|g| g == genre)
    }
}
