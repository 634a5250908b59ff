//! Nocturne — nightlife event discovery for Montenegro
//!
//! This crate is the composition root: it wires the HTTP event client
//! into the event store and initializes tracing. The host UI layer
//! consumes the store through the `App` handle.

#![warn(missing_docs)]
#![warn(clippy::all)]

use std::sync::Arc;

use event_client::{EventSource, EventsClient, EventsClientConfig, FetchError};
use event_store::EventStore;

pub use event_client::{self, EventsClientConfig as ClientConfig};
pub use event_core::{
    self, CityId, CitySelection, DerivedView, Event, FilterCriteria, CITIES, FEATURED_LIMIT,
    GENRES,
};
pub use event_store::{self, LoadOutcome, LoadState, StoreError, StoreEvent};

/// Application configuration
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    /// Event feed client configuration
    pub client: EventsClientConfig,
}

/// Composition root holding the wired application state
///
/// Owns the event store and hands out shared references to consumers,
/// so tests can construct isolated instances instead of relying on
/// ambient globals.
pub struct App {
    store: Arc<EventStore>,
}

impl App {
    /// Build the app with the HTTP event client
    pub fn new(config: AppConfig) -> Result<Self, FetchError> {
        let client = EventsClient::new(config.client)?;
        Ok(Self::with_source(Arc::new(client)))
    }

    /// Build the app around an arbitrary event source
    ///
    /// Used by tests to substitute an in-memory source for the network.
    pub fn with_source(source: Arc<dyn EventSource>) -> Self {
        Self { store: Arc::new(EventStore::new(source)) }
    }

    /// The event store
    pub fn store(&self) -> &Arc<EventStore> {
        &self.store
    }
}

/// Initialize tracing with an environment-driven filter
///
/// Reads `RUST_LOG`, defaulting to `info`. Safe to call once at startup.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}
