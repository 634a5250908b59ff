//! The event store
//!
//! An explicit state container owned by the composition root. It holds
//! the authoritative event list plus filter/like state and publishes the
//! derived view through a watch channel, so consumers observe
//! recomputation without any implicit UI-framework reactivity.
//!
//! Mutations are synchronous under a single writer lock; only
//! `load_events` suspends, and the lock is never held across an await.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use thiserror::Error;
use tokio::sync::{broadcast, watch};

use event_client::{EventSource, FetchError};
use event_core::{CitySelection, DerivedView, Event, FilterCriteria};

/// Capacity of the store event broadcast channel
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Errors that can occur during store operations
#[derive(Debug, Error)]
pub enum StoreError {
    /// A filter mutation named a value outside the fixed catalog
    #[error("Invalid filter value: {0}")]
    InvalidFilterValue(String),

    /// The event fetch failed; prior state is preserved
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

/// Result type for store operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Loading state of the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    /// No fetch in flight, last load (if any) succeeded
    #[default]
    Idle,

    /// A fetch is in flight
    Loading,

    /// The last fetch failed; prior data is still being shown
    Error,
}

/// Outcome of a completed `load_events` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The fetched list was applied; carries the stored event count
    Applied(usize),

    /// A newer load was started while this one was in flight, so its
    /// result was discarded (latest-request-wins)
    Superseded,
}

/// Events broadcast when store state changes
#[derive(Debug, Clone)]
pub enum StoreEvent {
    /// The derived view was recomputed
    ViewChanged,

    /// A like was toggled; carries the event id and the new state
    LikeChanged {
        /// Event id whose like state flipped
        event_id: String,
        /// Whether the event is now liked
        liked: bool,
    },

    /// A fetch completed and replaced the event list
    EventsLoaded {
        /// Number of events now stored
        count: usize,
    },

    /// A fetch failed; prior data is preserved
    LoadFailed {
        /// Error message for display
        message: String,
    },
}

/// Interior state guarded by the store's writer lock
#[derive(Debug, Default)]
struct StoreState {
    /// Authoritative event list, replaced wholesale on each fetch
    events: Vec<Event>,
    /// Active filter criteria
    criteria: FilterCriteria,
    /// Ids of liked events; ids need not exist in `events`
    liked: HashSet<String>,
    /// Loading state machine
    load_state: LoadState,
    /// Message from the last failed fetch, cleared on success
    last_error: Option<String>,
}

/// State container for event discovery
///
/// Owns `(events, criteria, liked)` and recomputes the derived view
/// synchronously after every accepted mutation. Criteria and likes
/// persist across fetches within the session; nothing is persisted
/// across process restarts.
///
/// # Example
///
/// ```no_run
/// use event_client::{EventsClient, EventsClientConfig};
/// use event_store::EventStore;
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = EventsClient::new(EventsClientConfig::default())?;
/// let store = EventStore::new(Arc::new(client));
///
/// store.load_events().await?;
/// store.set_selected_city("podgorica")?;
/// store.set_search_query("festival");
///
/// let view = store.derived_view();
/// println!("{} events match", view.len());
/// # Ok(())
/// # }
/// ```
pub struct EventStore {
    /// Fetch collaborator
    source: Arc<dyn EventSource>,
    /// Interior state; the lock is never held across an await
    state: RwLock<StoreState>,
    /// Latest derived view, recomputed after each accepted mutation
    view_tx: watch::Sender<DerivedView>,
    /// State change broadcaster
    events_tx: broadcast::Sender<StoreEvent>,
    /// Load generation counter for latest-request-wins
    generation: AtomicU64,
}

impl EventStore {
    /// Create a new store backed by the given event source
    pub fn new(source: Arc<dyn EventSource>) -> Self {
        let (view_tx, _) = watch::channel(DerivedView::default());
        let (events_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        Self {
            source,
            state: RwLock::new(StoreState::default()),
            view_tx,
            events_tx,
            generation: AtomicU64::new(0),
        }
    }

    // -------------------------------------------------------------------------
    // Loading
    // -------------------------------------------------------------------------

    /// Fetch events from the source and replace the stored list
    ///
    /// On success the list is replaced wholesale and the view is
    /// recomputed with the criteria current at completion time, not a
    /// snapshot captured at fetch start. On failure the prior list and
    /// view are preserved and the error is recorded for display.
    ///
    /// Concurrent loads are tolerated: each call takes a generation
    /// number, and a completion that is no longer the newest generation
    /// is discarded (`LoadOutcome::Superseded`).
    pub async fn load_events(&self) -> Result<LoadOutcome> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        {
            let mut state = self.state.write();
            state.load_state = LoadState::Loading;
        }
        tracing::debug!("Loading events (generation {})", generation);

        let result = self.source.fetch_events().await;

        let mut state = self.state.write();
        if self.generation.load(Ordering::SeqCst) != generation {
            tracing::debug!("Discarding superseded load (generation {})", generation);
            return Ok(LoadOutcome::Superseded);
        }

        match result {
            Ok(events) => {
                let count = events.len();
                state.events = events;
                state.load_state = LoadState::Idle;
                state.last_error = None;
                self.publish(&state);
                drop(state);

                tracing::debug!("Loaded {} events", count);
                let _ = self.events_tx.send(StoreEvent::EventsLoaded { count });
                Ok(LoadOutcome::Applied(count))
            }
            Err(err) => {
                state.load_state = LoadState::Error;
                state.last_error = Some(err.to_string());
                drop(state);

                tracing::error!("Event load failed: {}", err);
                let _ = self.events_tx.send(StoreEvent::LoadFailed { message: err.to_string() });
                Err(err.into())
            }
        }
    }

    // -------------------------------------------------------------------------
    // Filter mutations
    // -------------------------------------------------------------------------

    /// Set the selected city
    ///
    /// Accepts "all" or a member of the fixed city catalog; anything else
    /// is rejected with `InvalidFilterValue` and leaves criteria
    /// unchanged.
    pub fn set_selected_city(&self, city_id: &str) -> Result<()> {
        let selection: CitySelection = city_id
            .parse()
            .map_err(|_| StoreError::InvalidFilterValue(city_id.to_string()))?;

        let mut state = self.state.write();
        state.criteria.city = selection;
        self.publish(&state);
        Ok(())
    }

    /// Set the selected genre; `None` clears the restriction ("All")
    ///
    /// Genres are matched case-sensitively against event tags. Unknown
    /// genres are accepted and simply match nothing.
    pub fn set_selected_genre(&self, genre: Option<String>) {
        let mut state = self.state.write();
        state.criteria.genre = genre;
        self.publish(&state);
    }

    /// Set the free-text search query
    pub fn set_search_query(&self, query: impl Into<String>) {
        let mut state = self.state.write();
        state.criteria.query = query.into();
        self.publish(&state);
    }

    /// Reset all filter criteria to their defaults
    pub fn clear_filters(&self) {
        let mut state = self.state.write();
        state.criteria = FilterCriteria::default();
        self.publish(&state);
    }

    // -------------------------------------------------------------------------
    // Likes
    // -------------------------------------------------------------------------

    /// Toggle the liked state of an event id, returning the new state
    ///
    /// The id need not exist in the current event list; a like can be
    /// toggled on an id no longer present without error.
    pub fn toggle_like(&self, event_id: &str) -> bool {
        let liked = {
            let mut state = self.state.write();
            if state.liked.remove(event_id) {
                false
            } else {
                state.liked.insert(event_id.to_string());
                true
            }
        };

        tracing::debug!("Like toggled for {}: {}", event_id, liked);
        let _ = self
            .events_tx
            .send(StoreEvent::LikeChanged { event_id: event_id.to_string(), liked });
        liked
    }

    /// Check whether an event id is liked
    pub fn is_liked(&self, event_id: &str) -> bool {
        self.state.read().liked.contains(event_id)
    }

    /// Ids of all liked events
    pub fn liked_events(&self) -> HashSet<String> {
        self.state.read().liked.clone()
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    /// The current derived view
    pub fn derived_view(&self) -> DerivedView {
        self.view_tx.borrow().clone()
    }

    /// Subscribe to derived view changes
    pub fn subscribe(&self) -> watch::Receiver<DerivedView> {
        self.view_tx.subscribe()
    }

    /// Subscribe to store state change events
    pub fn subscribe_events(&self) -> broadcast::Receiver<StoreEvent> {
        self.events_tx.subscribe()
    }

    /// The current loading state
    pub fn load_state(&self) -> LoadState {
        self.state.read().load_state
    }

    /// Message from the last failed fetch, if the store is in error
    pub fn last_error(&self) -> Option<String> {
        self.state.read().last_error.clone()
    }

    /// The active filter criteria
    pub fn criteria(&self) -> FilterCriteria {
        self.state.read().criteria.clone()
    }

    /// Look up an event by id in the authoritative list
    ///
    /// Used by the detail-view navigation collaborator.
    pub fn event_by_id(&self, event_id: &str) -> Option<Event> {
        self.state.read().events.iter().find(|e| e.id == event_id).cloned()
    }

    /// Number of events in the authoritative list, before filtering
    pub fn event_count(&self) -> usize {
        self.state.read().events.len()
    }

    /// Recompute the derived view from the locked state and publish it
    fn publish(&self, state: &StoreState) {
        let view = DerivedView::compute(&state.events, &state.criteria);
        self.view_tx.send_replace(view);
        let _ = self.events_tx.send(StoreEvent::ViewChanged);
    }
}
