//! Flight results engine: sort, page and incrementally load search results.
//!
//! Fetched flights pass through a sanity filter, are stably sorted by the
//! active [`SortSpec`](crate::domain::SortSpec), and are handed to the UI one
//! page at a time through [`ResultPipeline::load_more`].

mod backend;
mod comparator;
mod config;
mod error;
mod pager;
mod pipeline;
mod sanity;

pub use backend::{InMemoryBackend, PageBackend};
pub use comparator::{compare, sort_flights};
pub use config::{DEFAULT_PAGE_SIZE, PipelineConfig};
pub use error::PipelineError;
pub use pager::{CursorPolicy, Page, all_pages, page};
pub use pipeline::{FetchTicket, LoadState, PageRequest, ResultPipeline, ViewKey};
pub use sanity::{Clock, FixedClock, SystemClock, departs_on, sanity_filter};

#[cfg(test)]
pub(crate) use comparator::fixtures;
