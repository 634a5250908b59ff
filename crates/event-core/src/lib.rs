//! Core domain model for Nocturne
//!
//! This crate contains the event data model, the fixed city and genre
//! catalogs, and the pure filter engine that computes the discovery view.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod catalog;
pub mod filter;
pub mod model;

pub use catalog::{City, CityId, CitySelection, CITIES, GENRES};
pub use filter::{filter_events, DerivedView, FilterCriteria, FEATURED_LIMIT};
pub use model::Event;
