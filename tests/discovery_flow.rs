//! Discovery flow integration tests
//!
//! End-to-end tests for the wired app: load, filter, search, like, and
//! failure recovery across the store and client seams.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use nocturne::event_client::{self, EventSource, FetchError};
use nocturne::{App, CityId, Event, LoadState, FEATURED_LIMIT};

fn make_event(id: &str, title: &str, city: CityId, genres: &[&str], featured: bool) -> Event {
    Event {
        id: id.to_string(),
        title: title.to_string(),
        venue: format!("{} Venue", title),
        location: format!("Centar, {}", city.display_name()),
        city,
        date: NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
        time: "22:00".to_string(),
        image: format!("https://cdn.example.com/{}.jpg", id),
        genres: genres.iter().map(|g| g.to_string()).collect(),
        djs: vec!["DJ Luna".to_string()],
        featured,
    }
}

struct MemorySource {
    events: Vec<Event>,
    fail: AtomicBool,
}

impl MemorySource {
    fn new(events: Vec<Event>) -> Self {
        Self { events, fail: AtomicBool::new(false) }
    }
}

#[async_trait]
impl EventSource for MemorySource {
    async fn fetch_events(&self) -> event_client::client::Result<Vec<Event>> {
        if self.fail.load(Ordering::SeqCst) {
            Err(FetchError::Status { status: 502 })
        } else {
            Ok(self.events.clone())
        }
    }
}

fn seeded_events() -> Vec<Event> {
    let mut events = vec![
        make_event("fest", "Summer Festival", CityId::Bar, &["Festival", "DJ Set"], true),
        make_event("club", "Club Night", CityId::Podgorica, &["Club Night"], false),
        make_event("ware", "Warehouse Session", CityId::Podgorica, &["DJ Set"], false),
    ];
    for i in 0..6 {
        events.push(make_event(
            &format!("feat{}", i),
            &format!("Headliner {}", i),
            CityId::Podgorica,
            &["Concert"],
            true,
        ));
    }
    events
}

/// Full discovery session: load, narrow, search, like, reset
#[tokio::test]
async fn test_discovery_session() {
    let app = App::with_source(Arc::new(MemorySource::new(seeded_events())));
    let store = app.store();

    store.load_events().await.unwrap();
    assert_eq!(store.load_state(), LoadState::Idle);

    // featured carousel caps at five, in source order
    let view = store.derived_view();
    assert_eq!(view.featured_events.len(), FEATURED_LIMIT);
    assert_eq!(view.featured_events[0].id, "fest");
    assert_eq!(view.upcoming_events.len(), 2);

    // narrow by city, then genre, then search text
    store.set_selected_city("podgorica").unwrap();
    assert_eq!(store.derived_view().len(), 8);

    store.set_selected_genre(Some("DJ Set".to_string()));
    let view = store.derived_view();
    assert_eq!(view.len(), 1);
    assert_eq!(view.filtered_events[0].id, "ware");

    store.set_selected_genre(None);
    store.set_search_query("headliner 3");
    let view = store.derived_view();
    assert_eq!(view.len(), 1);
    assert_eq!(view.filtered_events[0].id, "feat3");

    // like survives a filter reset
    store.toggle_like("feat3");
    store.clear_filters();
    assert_eq!(store.derived_view().len(), 9);
    assert!(store.is_liked("feat3"));

    // detail lookup for the navigation collaborator
    assert_eq!(store.event_by_id("club").unwrap().title, "Club Night");
}

/// A failed refresh keeps showing the previously loaded events
#[tokio::test]
async fn test_failed_refresh_degrades_to_prior_data() {
    let source = Arc::new(MemorySource::new(seeded_events()));
    let app = App::with_source(source.clone());
    let store = app.store();

    store.load_events().await.unwrap();
    store.set_selected_city("bar").unwrap();
    let before = store.derived_view();

    source.fail.store(true, Ordering::SeqCst);
    assert!(store.load_events().await.is_err());

    assert_eq!(store.derived_view(), before);
    assert_eq!(store.load_state(), LoadState::Error);
    assert!(store.last_error().unwrap().contains("502"));

    // retry succeeds and clears the error indicator
    source.fail.store(false, Ordering::SeqCst);
    store.load_events().await.unwrap();
    assert_eq!(store.load_state(), LoadState::Idle);
    assert_eq!(store.last_error(), None);
}

/// View subscribers observe every accepted mutation
#[tokio::test]
async fn test_view_subscription() {
    let app = App::with_source(Arc::new(MemorySource::new(seeded_events())));
    let store = app.store();
    let mut rx = store.subscribe();

    store.load_events().await.unwrap();
    rx.changed().await.unwrap();
    assert_eq!(rx.borrow_and_update().len(), 9);

    store.set_search_query("warehouse");
    rx.changed().await.unwrap();
    assert_eq!(rx.borrow_and_update().filtered_events[0].id, "ware");
}
