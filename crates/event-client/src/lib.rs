//! Event feed client for Nocturne
//!
//! This crate provides the fetch collaborator the event store depends
//! on: an `EventSource` trait, an HTTP implementation with retry logic,
//! and wire-record sanitization at ingestion.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod client;
pub mod record;

pub use client::{EventSource, EventsClient, EventsClientConfig, FetchError, RetryConfig};
pub use record::{EventRecord, RecordError};
