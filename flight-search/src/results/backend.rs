//! Page backends supply pages of the current sorted view.
//!
//! Paging an in-memory view is synchronous, but the pipeline treats every
//! page as an asynchronous step so a backend can produce later pages lazily.

use std::sync::Arc;

use futures::FutureExt;
use futures::future::{BoxFuture, ready};

use crate::domain::Flight;

use super::error::PipelineError;
use super::pager::{CursorPolicy, Page, page};

/// Supplies one page of a sorted, filtered view.
pub trait PageBackend: Send + Sync {
    fn fetch_page(
        &self,
        view: Arc<[Flight]>,
        offset: usize,
        limit: usize,
        cursor: CursorPolicy,
    ) -> BoxFuture<'static, Result<Page<Flight>, PipelineError>>;
}

/// Slices the in-memory view.
#[derive(Debug, Clone, Copy, Default)]
pub struct InMemoryBackend;

impl PageBackend for InMemoryBackend {
    fn fetch_page(
        &self,
        view: Arc<[Flight]>,
        offset: usize,
        limit: usize,
        cursor: CursorPolicy,
    ) -> BoxFuture<'static, Result<Page<Flight>, PipelineError>> {
        ready(Ok(page(&view, offset, limit, cursor))).boxed()
    }
}
