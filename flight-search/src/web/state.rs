//! Application state for the web layer.

use std::sync::Arc;

use crate::airports::AirportDirectory;
use crate::bookmarks::InMemoryBookmarkRepository;
use crate::provider::FlightSource;
use crate::results::{Clock, PipelineConfig, SystemClock};

/// Shared application state.
///
/// Contains all the services needed to handle requests.
#[derive(Clone)]
pub struct AppState {
    /// Flight offers source
    pub provider: FlightSource,

    /// Airport lookup and search
    pub airports: Arc<AirportDirectory>,

    /// Default paging for flight results
    pub pipeline: PipelineConfig,

    /// "Now" for the departure sanity filter and past-date checks
    pub clock: Arc<dyn Clock>,

    /// Saved searches per user
    pub bookmarks: InMemoryBookmarkRepository,
}

impl AppState {
    /// Create a new app state using the system clock.
    pub fn new(provider: FlightSource, airports: AirportDirectory, pipeline: PipelineConfig) -> Self {
        Self {
            provider,
            airports: Arc::new(airports),
            pipeline,
            clock: Arc::new(SystemClock),
            bookmarks: InMemoryBookmarkRepository::new(),
        }
    }

    /// Use a different clock.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Use a different bookmark store.
    pub fn with_bookmarks(mut self, bookmarks: InMemoryBookmarkRepository) -> Self {
        self.bookmarks = bookmarks;
        self
    }
}
