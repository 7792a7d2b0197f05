//! Search orchestration
//!
//! Holds the cached origin and turns a user search into exactly one fetch.
//! Background searches run on their own worker thread and report back over
//! a one-shot channel. Workers are never cancelled, so when two searches
//! overlap the one that finishes last is what the caller ends up showing,
//! even if it was started first.

use std::sync::mpsc::{self, Receiver};
use std::thread;

use crate::api::{FetchError, FetchResult, PlaceFetcher, Schema, SearchQuery};
use crate::geometry::Coordinate;
use crate::location::{LocationProvider, LocationStatus};

pub struct SearchController<F> {
    fetcher: F,
    schema: Schema,
    last_known_location: Option<Coordinate>,
}

impl<F: PlaceFetcher> SearchController<F> {
    pub fn new(fetcher: F, schema: Schema) -> Self {
        Self {
            fetcher,
            schema,
            last_known_location: None,
        }
    }

    pub fn location(&self) -> Option<Coordinate> {
        self.last_known_location
    }

    /// Replace the cached origin
    pub fn update_location(&mut self, location: Coordinate) {
        self.last_known_location = Some(location);
    }

    /// Ask the provider once for its last known fix and cache it if there is one.
    ///
    /// An unavailable fix leaves any previously cached location in place.
    pub fn refresh_location(&mut self, provider: &dyn LocationProvider) -> LocationStatus {
        if !provider.has_permission() {
            return LocationStatus::PermissionDenied;
        }
        match provider.last_known_location() {
            Some(location) => {
                self.update_location(location);
                LocationStatus::Acquired(location)
            }
            None => LocationStatus::Unavailable,
        }
    }

    /// Run a search on the calling thread
    pub fn search(&self, term: &str) -> FetchResult {
        let query = self.prepare(term)?;
        self.fetcher.fetch(&query)
    }

    fn prepare(&self, term: &str) -> Result<SearchQuery, FetchError> {
        let origin = self
            .last_known_location
            .ok_or(FetchError::LocationUnavailable)?;
        Ok(SearchQuery {
            term: self.schema.normalize_term(term),
            origin,
        })
    }
}

impl<F> SearchController<F>
where
    F: PlaceFetcher + Clone + Send + 'static,
{
    /// Run a search on a new worker thread.
    ///
    /// The origin is captured here, on the caller's thread. A missing origin
    /// is answered immediately without spawning anything.
    pub fn spawn_search(&self, term: &str) -> SearchHandle {
        let (sender, receiver) = mpsc::channel();

        match self.prepare(term) {
            Ok(query) => {
                let fetcher = self.fetcher.clone();
                thread::spawn(move || {
                    // The receiver may already be gone; nobody is waiting then.
                    let _ = sender.send(fetcher.fetch(&query));
                });
            }
            Err(e) => {
                let _ = sender.send(Err(e));
            }
        }

        SearchHandle {
            term: term.to_string(),
            receiver,
        }
    }
}

/// The pending answer to one background search
pub struct SearchHandle {
    term: String,
    receiver: Receiver<FetchResult>,
}

impl SearchHandle {
    pub fn term(&self) -> &str {
        &self.term
    }

    /// Block until the worker delivers its result
    pub fn wait(self) -> FetchResult {
        self.receiver
            .recv()
            .unwrap_or_else(|_| Err(FetchError::Transport("search worker terminated".into())))
    }

    /// Non-blocking poll; `None` while the worker is still running
    pub fn try_result(&self) -> Option<FetchResult> {
        match self.receiver.try_recv() {
            Ok(result) => Some(result),
            Err(mpsc::TryRecvError::Empty) => None,
            Err(mpsc::TryRecvError::Disconnected) => Some(Err(FetchError::Transport(
                "search worker terminated".into(),
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PlaceRecord;
    use crate::location::FixedLocation;
    use std::sync::{Arc, Mutex};

    /// Records every query and answers with a fixed result
    #[derive(Clone)]
    struct RecordingFetcher {
        queries: Arc<Mutex<Vec<SearchQuery>>>,
        answer: FetchResult,
    }

    impl RecordingFetcher {
        fn answering(answer: FetchResult) -> Self {
            Self {
                queries: Arc::new(Mutex::new(Vec::new())),
                answer,
            }
        }

        fn calls(&self) -> Vec<SearchQuery> {
            self.queries.lock().unwrap().clone()
        }
    }

    impl PlaceFetcher for RecordingFetcher {
        fn fetch(&self, query: &SearchQuery) -> FetchResult {
            self.queries.lock().unwrap().push(query.clone());
            self.answer.clone()
        }
    }

    struct DeniedLocation;

    impl LocationProvider for DeniedLocation {
        fn has_permission(&self) -> bool {
            false
        }

        fn last_known_location(&self) -> Option<Coordinate> {
            panic!("location read without permission");
        }
    }

    fn here() -> Coordinate {
        Coordinate::new(52.52, 13.405).unwrap()
    }

    fn cafe() -> PlaceRecord {
        PlaceRecord::new("Cafe", "", Some(0.2))
    }

    #[test]
    fn test_search_without_location_skips_network() {
        let fetcher = RecordingFetcher::answering(Ok(vec![cafe()]));
        let controller = SearchController::new(fetcher.clone(), Schema::Overpass);

        assert_eq!(controller.search("cafe"), Err(FetchError::LocationUnavailable));
        assert!(fetcher.calls().is_empty());
    }

    #[test]
    fn test_overpass_term_is_trimmed_and_lowercased() {
        let fetcher = RecordingFetcher::answering(Ok(vec![cafe()]));
        let mut controller = SearchController::new(fetcher.clone(), Schema::Overpass);
        controller.update_location(here());

        let places = controller.search("  CAFE ").unwrap();
        assert_eq!(places, vec![cafe()]);
        assert_eq!(
            fetcher.calls(),
            vec![SearchQuery {
                term: "cafe".to_string(),
                origin: here(),
            }]
        );
    }

    #[test]
    fn test_nominatim_term_keeps_case() {
        let fetcher = RecordingFetcher::answering(Ok(Vec::new()));
        let mut controller = SearchController::new(fetcher.clone(), Schema::Nominatim);
        controller.update_location(here());

        controller.search(" Brandenburger Tor ").unwrap();
        assert_eq!(fetcher.calls()[0].term, "Brandenburger Tor");
    }

    #[test]
    fn test_update_location_overwrites() {
        let mut controller =
            SearchController::new(RecordingFetcher::answering(Ok(Vec::new())), Schema::Overpass);
        controller.update_location(here());
        let later = Coordinate::new(48.1351, 11.582).unwrap();
        controller.update_location(later);
        assert_eq!(controller.location(), Some(later));
    }

    #[test]
    fn test_refresh_location() {
        let mut controller =
            SearchController::new(RecordingFetcher::answering(Ok(Vec::new())), Schema::Overpass);

        assert_eq!(
            controller.refresh_location(&FixedLocation::new(None)),
            LocationStatus::Unavailable
        );
        assert_eq!(controller.location(), None);

        assert_eq!(
            controller.refresh_location(&FixedLocation::new(Some(here()))),
            LocationStatus::Acquired(here())
        );

        // A later miss keeps the cached fix
        controller.refresh_location(&FixedLocation::new(None));
        assert_eq!(controller.location(), Some(here()));

        assert_eq!(
            controller.refresh_location(&DeniedLocation),
            LocationStatus::PermissionDenied
        );
        assert_eq!(controller.location(), Some(here()));
    }

    #[test]
    fn test_spawn_search_delivers_one_result() {
        let fetcher = RecordingFetcher::answering(Err(FetchError::Http { status: 503 }));
        let mut controller = SearchController::new(fetcher.clone(), Schema::Overpass);
        controller.update_location(here());

        let handle = controller.spawn_search("Pharmacy");
        assert_eq!(handle.term(), "Pharmacy");
        assert_eq!(handle.wait(), Err(FetchError::Http { status: 503 }));
        assert_eq!(fetcher.calls().len(), 1);
        assert_eq!(fetcher.calls()[0].term, "pharmacy");
    }

    #[test]
    fn test_spawn_search_without_location_answers_immediately() {
        let fetcher = RecordingFetcher::answering(Ok(vec![cafe()]));
        let controller = SearchController::new(fetcher.clone(), Schema::Nominatim);

        let handle = controller.spawn_search("cafe");
        assert_eq!(
            handle.try_result(),
            Some(Err(FetchError::LocationUnavailable))
        );
        assert!(fetcher.calls().is_empty());
    }

    #[test]
    fn test_worker_panic_is_reported() {
        #[derive(Clone)]
        struct PanickingFetcher;

        impl PlaceFetcher for PanickingFetcher {
            fn fetch(&self, _query: &SearchQuery) -> FetchResult {
                panic!("boom");
            }
        }

        let mut controller = SearchController::new(PanickingFetcher, Schema::Overpass);
        controller.update_location(here());

        assert_eq!(
            controller.spawn_search("cafe").wait(),
            Err(FetchError::Transport("search worker terminated".to_string()))
        );
    }
}
