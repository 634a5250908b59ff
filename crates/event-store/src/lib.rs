//! Event store for Nocturne
//!
//! This crate provides the explicit state container that owns the event
//! list, filter criteria, and liked set, and recomputes the derived
//! discovery view after every accepted mutation.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod store;

pub use store::{EventStore, LoadOutcome, LoadState, StoreError, StoreEvent};
