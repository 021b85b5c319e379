//! Incremental ("load more") view over one search's flight results.
//!
//! The pipeline owns the fetched flights for the active criteria, applies the
//! sanity filter and the active sort, and hands out pages on demand. Any
//! change to the flights, the sort or the page size resets the accumulated
//! pages and discards page loads that were started before the change.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::{FilterCriteria, Flight, SortSpec};

use super::backend::{InMemoryBackend, PageBackend};
use super::comparator::sort_flights;
use super::config::PipelineConfig;
use super::error::PipelineError;
use super::pager::{CursorPolicy, Page, page};
use super::sanity::{Clock, SystemClock, sanity_filter};

/// Loading state of the accumulated view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    /// Ready for `load_more`.
    Idle,

    /// A page load or an upstream fetch is in flight.
    Loading,

    /// Every page has been loaded.
    Exhausted,

    /// The last fetch or page load failed.
    Error(PipelineError),
}

/// Identity of a derived view: which result set, sorted how, paged by what.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewKey {
    /// Incremented whenever a new result set is installed.
    pub generation: u64,
    pub sort: SortSpec,
    pub limit: usize,
}

/// An upstream fetch the caller must perform for the active criteria.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
    criteria: FilterCriteria,
}

impl FetchTicket {
    /// Criteria to search the provider with.
    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }
}

/// A page load captured at `begin_load_more` time.
pub struct PageRequest {
    key: ViewKey,
    epoch: u64,
    offset: usize,
    cursor: CursorPolicy,
    view: Arc<[Flight]>,
    backend: Arc<dyn PageBackend>,
}

impl PageRequest {
    /// Offset of the requested page.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Key that was active when the request was made.
    pub fn key(&self) -> ViewKey {
        self.key
    }

    /// Resolve the page against the backend.
    pub async fn fetch(&self) -> Result<Page<Flight>, PipelineError> {
        self.backend
            .fetch_page(self.view.clone(), self.offset, self.key.limit, self.cursor)
            .await
    }
}

impl fmt::Debug for PageRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageRequest")
            .field("key", &self.key)
            .field("epoch", &self.epoch)
            .field("offset", &self.offset)
            .finish_non_exhaustive()
    }
}

type ScrollHook = Box<dyn FnMut() + Send>;

/// Paginated, re-sortable view over one search session's flights.
///
/// Single owner: all mutation goes through `&mut self`.
pub struct ResultPipeline {
    config: PipelineConfig,
    clock: Arc<dyn Clock>,
    backend: Arc<dyn PageBackend>,

    criteria: Option<FilterCriteria>,
    sort: SortSpec,
    generation: u64,
    pending_fetch: Option<u64>,

    /// Sanity-filtered flights in provider order.
    flights: Arc<[Flight]>,

    /// Sorted views of the current result set, by sort.
    views: HashMap<SortSpec, Arc<[Flight]>>,
    view: Arc<[Flight]>,

    /// Incremented on every reset; page requests from an older epoch are stale.
    epoch: u64,
    items: Vec<Flight>,
    next_offset: Option<usize>,
    state: LoadState,

    scroll_hooks: Vec<ScrollHook>,
}

impl ResultPipeline {
    /// Create an empty pipeline using the system clock and in-memory paging.
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            clock: Arc::new(SystemClock),
            backend: Arc::new(InMemoryBackend),
            criteria: None,
            sort: SortSpec::default(),
            generation: 0,
            pending_fetch: None,
            flights: Arc::from(Vec::new()),
            views: HashMap::new(),
            view: Arc::from(Vec::new()),
            epoch: 0,
            items: Vec::new(),
            next_offset: Some(0),
            state: LoadState::Idle,
            scroll_hooks: Vec::new(),
        }
    }

    /// Use a different clock for the sanity filter.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Use a different page backend.
    pub fn with_backend(mut self, backend: impl PageBackend + 'static) -> Self {
        self.backend = Arc::new(backend);
        self
    }

    // ---- inputs ----

    /// Select a new result set by criteria.
    ///
    /// Returns the fetch the caller must perform, or `None` if the criteria
    /// are unchanged. Until the fetch completes the pipeline is `Loading`
    /// and shows nothing.
    pub fn set_filter_criteria(&mut self, criteria: FilterCriteria) -> Option<FetchTicket> {
        if self.criteria.as_ref() == Some(&criteria) {
            return None;
        }

        debug!(
            origin = %criteria.origin(),
            destination = %criteria.destination(),
            date = %criteria.departure_date(),
            "criteria changed"
        );
        Some(self.start_fetch(criteria))
    }

    /// Re-issue the fetch for the active criteria after a fetch failure.
    pub fn retry_fetch(&mut self) -> Option<FetchTicket> {
        if !matches!(&self.state, LoadState::Error(e) if e.is_fetch()) {
            return None;
        }
        let criteria = self.criteria.clone()?;
        debug!("retrying fetch");
        Some(self.start_fetch(criteria))
    }

    /// Complete a fetch started by [`set_filter_criteria`](Self::set_filter_criteria)
    /// or [`retry_fetch`](Self::retry_fetch).
    ///
    /// Results for a superseded ticket are discarded; returns whether the
    /// result was applied.
    pub fn complete_fetch(
        &mut self,
        ticket: FetchTicket,
        result: Result<Vec<Flight>, PipelineError>,
    ) -> bool {
        if self.pending_fetch != Some(ticket.generation) {
            debug!(generation = ticket.generation, "discarding stale fetch result");
            return false;
        }
        self.pending_fetch = None;

        match result {
            Ok(flights) => self.set_flights(flights),
            Err(e) => self.set_fetch_error(e),
        }
        true
    }

    /// Install a fetched result set for the active criteria.
    ///
    /// Flights that fail the sanity filter are dropped; the rest keep
    /// provider order until sorted.
    pub fn set_flights(&mut self, flights: Vec<Flight>) {
        let date = self.criteria.as_ref().map(FilterCriteria::departure_date);
        let kept = sanity_filter(&flights, date, self.clock.now());
        debug!(
            fetched = flights.len(),
            kept = kept.len(),
            "installing result set"
        );

        self.pending_fetch = None;
        self.install(kept.into(), LoadState::Idle);
    }

    /// Record an upstream failure for the active criteria.
    pub fn set_fetch_error(&mut self, error: PipelineError) {
        warn!(error = %error, "flight fetch failed");
        self.pending_fetch = None;
        let error = match error {
            e @ PipelineError::Fetch(_) => e,
            other => PipelineError::Fetch(other.to_string()),
        };
        self.install(Arc::from(Vec::new()), LoadState::Error(error));
    }

    /// Change the active sort. Returns whether anything changed.
    pub fn set_sort(&mut self, sort: SortSpec) -> bool {
        if self.sort == sort {
            return false;
        }
        debug!(%sort, "sort changed");
        self.sort = sort;
        self.refresh_view();
        self.reset_pages();
        true
    }

    /// Change the page size. Returns whether anything changed.
    pub fn set_page_size(&mut self, page_size: usize) -> bool {
        if self.config.page_size == page_size {
            return false;
        }
        debug!(page_size, "page size changed");
        self.config.page_size = page_size;
        self.reset_pages();
        true
    }

    // ---- loading ----

    /// Start loading the next page.
    ///
    /// Returns `None` while loading, once exhausted, and after a fetch
    /// failure (use [`retry_fetch`](Self::retry_fetch)). From a page error
    /// this is a retry of the failed page.
    pub fn begin_load_more(&mut self) -> Option<PageRequest> {
        match &self.state {
            LoadState::Loading | LoadState::Exhausted => return None,
            LoadState::Error(e) if e.is_fetch() => return None,
            LoadState::Idle | LoadState::Error(_) => {}
        }

        let Some(offset) = self.next_offset else {
            self.state = LoadState::Exhausted;
            return None;
        };

        self.state = LoadState::Loading;
        Some(PageRequest {
            key: self.key(),
            epoch: self.epoch,
            offset,
            cursor: self.config.cursor,
            view: self.view.clone(),
            backend: self.backend.clone(),
        })
    }

    /// Apply a resolved page request.
    ///
    /// A request started before the last reset is discarded. Returns whether
    /// the result was applied.
    pub fn complete_load_more(
        &mut self,
        request: PageRequest,
        result: Result<Page<Flight>, PipelineError>,
    ) -> bool {
        if request.epoch != self.epoch || request.key != self.key() {
            debug!(
                offset = request.offset,
                requested = ?request.key,
                active = ?self.key(),
                "discarding stale page"
            );
            return false;
        }

        match result {
            Ok(page) => {
                debug!(
                    offset = request.offset,
                    items = page.items.len(),
                    next_offset = ?page.next_offset,
                    "page loaded"
                );
                self.items.extend(page.items);
                self.next_offset = page.next_offset;
                self.state = if self.next_offset.is_some() {
                    LoadState::Idle
                } else {
                    LoadState::Exhausted
                };
            }
            Err(e) => {
                warn!(offset = request.offset, error = %e, "page load failed");
                self.state = LoadState::Error(e);
            }
        }
        true
    }

    /// Load the next page.
    ///
    /// Returns `Ok(true)` when a page was appended and `Ok(false)` when there
    /// was nothing to do.
    pub async fn load_more(&mut self) -> Result<bool, PipelineError> {
        let Some(request) = self.begin_load_more() else {
            return Ok(false);
        };

        let result = request.fetch().await;
        let failure = result.as_ref().err().cloned();
        let applied = self.complete_load_more(request, result);

        match failure {
            Some(e) if applied => Err(e),
            _ => Ok(applied),
        }
    }

    // ---- outputs ----

    /// Flights loaded so far, in display order.
    pub fn visible_items(&self) -> &[Flight] {
        &self.items
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    /// Whether another `load_more` could append flights.
    pub fn has_more(&self) -> bool {
        self.next_offset.is_some()
            && !matches!(self.state, LoadState::Exhausted)
            && !matches!(&self.state, LoadState::Error(e) if e.is_fetch())
    }

    /// Number of flights in the sorted view.
    pub fn total(&self) -> usize {
        self.view.len()
    }

    /// One page of the sorted view at an arbitrary offset.
    ///
    /// Leaves the accumulated pages untouched; for stateless callers that
    /// carry the cursor themselves.
    pub fn page_at(&self, offset: usize) -> Page<Flight> {
        page(&self.view, offset, self.config.page_size, self.config.cursor)
    }

    pub fn sort(&self) -> SortSpec {
        self.sort
    }

    pub fn criteria(&self) -> Option<&FilterCriteria> {
        self.criteria.as_ref()
    }

    pub fn config(&self) -> PipelineConfig {
        self.config
    }

    /// The key the current page state belongs to.
    pub fn key(&self) -> ViewKey {
        ViewKey {
            generation: self.generation,
            sort: self.sort,
            limit: self.config.page_size,
        }
    }

    // ---- scroll ----

    /// Register a hook run whenever the view resets.
    pub fn on_scroll_reset(&mut self, hook: impl FnMut() + Send + 'static) {
        self.scroll_hooks.push(Box::new(hook));
    }

    /// Ask the consumer to scroll back to the top. No effect on data.
    pub fn reset_scroll(&mut self) {
        for hook in &mut self.scroll_hooks {
            hook();
        }
    }

    // ---- internals ----

    fn start_fetch(&mut self, criteria: FilterCriteria) -> FetchTicket {
        self.criteria = Some(criteria.clone());
        self.generation += 1;
        self.pending_fetch = Some(self.generation);
        self.flights = Arc::from(Vec::new());
        self.views.clear();
        self.refresh_view();
        self.reset_pages();

        FetchTicket {
            generation: self.generation,
            criteria,
        }
    }

    fn install(&mut self, flights: Arc<[Flight]>, state: LoadState) {
        self.generation += 1;
        self.flights = flights;
        self.views.clear();
        self.refresh_view();
        self.reset_pages();
        // Overrides the state chosen by reset_pages.
        self.state = state;
    }

    /// Point `view` at the sorted view for the active sort, sorting at most
    /// once per (result set, sort).
    fn refresh_view(&mut self) {
        let flights = &self.flights;
        let sort = self.sort;
        let view = self
            .views
            .entry(sort)
            .or_insert_with(|| {
                let mut sorted = flights.to_vec();
                sort_flights(&mut sorted, sort);
                sorted.into()
            })
            .clone();
        self.view = view;
    }

    fn reset_pages(&mut self) {
        self.epoch += 1;
        self.items.clear();
        self.next_offset = Some(0);
        self.state = match &self.state {
            _ if self.pending_fetch.is_some() => LoadState::Loading,
            LoadState::Error(e) if e.is_fetch() => LoadState::Error(e.clone()),
            _ => LoadState::Idle,
        };
        self.reset_scroll();
    }
}

impl Default for ResultPipeline {
    fn default() -> Self {
        Self::new(PipelineConfig::default())
    }
}

impl fmt::Debug for ResultPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResultPipeline")
            .field("key", &self.key())
            .field("state", &self.state)
            .field("loaded", &self.items.len())
            .field("total", &self.view.len())
            .finish_non_exhaustive()
    }
}
