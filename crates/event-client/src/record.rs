//! Wire-record sanitization
//!
//! The event feed returns loosely typed JSON records. This module
//! validates them at ingestion and converts them into the fixed-schema
//! `Event` the rest of the app works with. Records that fail validation
//! are rejected individually rather than poisoning the whole fetch.

use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;

use event_core::{CityId, Event};

/// Errors that can occur while sanitizing a wire record
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    /// A required field is missing or blank
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// The date string did not parse as a calendar date
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// Neither the city field nor the location named a catalog city
    #[error("Cannot determine city for record {id}: {location:?}")]
    UnknownCity {
        /// Record id
        id: String,
        /// Location string the derivation was attempted on
        location: String,
    },
}

/// Result type for record sanitization
pub type Result<T> = std::result::Result<T, RecordError>;

/// A raw event record as returned by the feed
///
/// Everything beyond `id` is optional at the wire level; `sanitize`
/// decides what is actually required.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    /// Unique identifier
    #[serde(default)]
    pub id: String,

    /// Event title
    #[serde(default)]
    pub title: String,

    /// Venue name
    #[serde(default)]
    pub venue: String,

    /// Free-form location
    #[serde(default)]
    pub location: String,

    /// Explicit city identifier, if the feed provides one
    #[serde(default)]
    pub city: Option<String>,

    /// Calendar date as "YYYY-MM-DD"
    #[serde(default)]
    pub date: String,

    /// Display time string
    #[serde(default)]
    pub time: String,

    /// Cover image URI
    #[serde(default)]
    pub image: String,

    /// Genre tags
    #[serde(default)]
    pub genres: Vec<String>,

    /// DJ lineup
    #[serde(default)]
    pub djs: Vec<String>,

    /// Promotional placement flag
    #[serde(default)]
    pub featured: bool,
}

impl EventRecord {
    /// Validate the record and convert it into an `Event`
    ///
    /// Requires non-blank `id`, `title`, `venue`, and `location`, and a
    /// parsable date. The city comes from the explicit `city` field when
    /// it names a catalog city; otherwise it is derived from `location`.
    pub fn sanitize(self) -> Result<Event> {
        let id = non_blank(self.id, "id")?;
        let title = non_blank(self.title, "title")?;
        let venue = non_blank(self.venue, "venue")?;
        let location = non_blank(self.location, "location")?;

        let date = NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d")
            .map_err(|_| RecordError::InvalidDate(self.date.clone()))?;

        let city = self
            .city
            .as_deref()
            .and_then(|c| c.parse::<CityId>().ok())
            .or_else(|| CityId::from_location(&location))
            .ok_or_else(|| RecordError::UnknownCity {
                id: id.clone(),
                location: location.clone(),
            })?;

        let genres = self
            .genres
            .into_iter()
            .map(|g| g.trim().to_string())
            .filter(|g| !g.is_empty())
            .collect();

        let djs = self
            .djs
            .into_iter()
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty())
            .collect();

        Ok(Event {
            id,
            title,
            venue,
            location,
            city,
            date,
            time: self.time.trim().to_string(),
            image: self.image.trim().to_string(),
            genres,
            djs,
            featured: self.featured,
        })
    }
}

fn non_blank(value: String, field: &'static str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(RecordError::MissingField(field))
    } else {
        Ok(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_record() -> EventRecord {
        EventRecord {
            id: "ev-1".to_string(),
            title: "Summer Festival".to_string(),
            venue: "Top Hill".to_string(),
            location: "Topolica, Bar".to_string(),
            city: None,
            date: "2024-07-12".to_string(),
            time: "22:00".to_string(),
            image: "https://cdn.example.com/ev-1.jpg".to_string(),
            genres: vec!["Festival".to_string()],
            djs: vec!["DJ Luna".to_string()],
            featured: true,
        }
    }

    #[test]
    fn test_sanitize_valid_record() {
        let event = valid_record().sanitize().unwrap();
        assert_eq!(event.id, "ev-1");
        assert_eq!(event.city, CityId::Bar);
        assert_eq!(event.date.to_string(), "2024-07-12");
        assert!(event.featured);
    }

    #[test]
    fn test_sanitize_rejects_blank_id() {
        let record = EventRecord { id: "  ".to_string(), ..valid_record() };
        assert_eq!(record.sanitize().unwrap_err(), RecordError::MissingField("id"));
    }

    #[test]
    fn test_sanitize_rejects_missing_title() {
        let record = EventRecord { title: String::new(), ..valid_record() };
        assert_eq!(record.sanitize().unwrap_err(), RecordError::MissingField("title"));
    }

    #[test]
    fn test_sanitize_rejects_bad_date() {
        let record = EventRecord { date: "12/07/2024".to_string(), ..valid_record() };
        assert_eq!(
            record.sanitize().unwrap_err(),
            RecordError::InvalidDate("12/07/2024".to_string())
        );
    }

    #[test]
    fn test_explicit_city_wins_over_location() {
        let record = EventRecord {
            city: Some("podgorica".to_string()),
            location: "Somewhere, Bar".to_string(),
            ..valid_record()
        };
        assert_eq!(record.sanitize().unwrap().city, CityId::Podgorica);
    }

    #[test]
    fn test_unrecognized_city_field_falls_back_to_location() {
        let record = EventRecord { city: Some("belgrade".to_string()), ..valid_record() };
        assert_eq!(record.sanitize().unwrap().city, CityId::Bar);
    }

    #[test]
    fn test_underivable_city_is_rejected() {
        let record = EventRecord {
            city: None,
            location: "Skadarlija, Belgrade".to_string(),
            ..valid_record()
        };
        assert!(matches!(
            record.sanitize().unwrap_err(),
            RecordError::UnknownCity { .. }
        ));
    }

    #[test]
    fn test_sanitize_trims_and_drops_blank_tags() {
        let record = EventRecord {
            genres: vec![" Festival ".to_string(), "  ".to_string()],
            djs: vec!["".to_string(), " DJ Luna ".to_string()],
            ..valid_record()
        };

        let event = record.sanitize().unwrap();
        assert_eq!(event.genres, vec!["Festival".to_string()]);
        assert_eq!(event.djs, vec!["DJ Luna".to_string()]);
    }

    #[test]
    fn test_record_deserializes_sparse_json() {
        let record: EventRecord =
            serde_json::from_str(r#"{"id":"ev-9","date":"2024-01-01"}"#).unwrap();
        assert_eq!(record.id, "ev-9");
        assert!(record.genres.is_empty());
        assert!(!record.featured);
        // Still rejected at sanitization for the blank fields
        assert!(record.sanitize().is_err());
    }
}
