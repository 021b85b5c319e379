//! Offset/limit page windows over an in-memory collection.
//!
//! Paging is a pure function of `(collection, offset, limit)`, so pages can
//! be recomputed or restarted at any point without hidden state.

use serde::Serialize;

/// How the cursor for the next page is derived.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CursorPolicy {
    /// A full page implies there may be more. When the collection length is
    /// an exact multiple of the limit, exhaustion is only signalled by one
    /// further, empty page.
    #[default]
    LengthHeuristic,

    /// Compare against the collection length; the last non-empty page is
    /// already exhausted.
    Exact,
}

/// One window of a collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,

    /// Offset of the next page, `None` once exhausted.
    pub next_offset: Option<usize>,
}

impl<T> Page<T> {
    /// An empty, exhausted page.
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            next_offset: None,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.next_offset.is_none()
    }

    /// Transform the items, keeping the cursor.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            next_offset: self.next_offset,
        }
    }
}

/// Take the page `[offset, offset + limit)` of `collection`.
///
/// Never fails: an offset past the end yields an empty, exhausted page, and a
/// zero limit yields an empty, exhausted page.
///
/// # Examples
///
/// ```
/// use flight_search::results::{CursorPolicy, page};
///
/// let items: Vec<u32> = (0..25).collect();
/// let first = page(&items, 0, 10, CursorPolicy::LengthHeuristic);
/// assert_eq!(first.items.len(), 10);
/// assert_eq!(first.next_offset, Some(10));
///
/// let last = page(&items, 20, 10, CursorPolicy::LengthHeuristic);
/// assert_eq!(last.items.len(), 5);
/// assert_eq!(last.next_offset, None);
/// ```
pub fn page<T: Clone>(collection: &[T], offset: usize, limit: usize, policy: CursorPolicy) -> Page<T> {
    if limit == 0 || offset >= collection.len() {
        return Page::empty();
    }

    let end = offset.saturating_add(limit).min(collection.len());
    let items = collection[offset..end].to_vec();

    let has_more = match policy {
        CursorPolicy::LengthHeuristic => items.len() == limit,
        CursorPolicy::Exact => end < collection.len(),
    };

    Page {
        items,
        next_offset: has_more.then(|| offset.saturating_add(limit)),
    }
}

/// Follow cursors from offset zero until exhaustion, returning every page.
pub fn all_pages<T: Clone>(collection: &[T], limit: usize, policy: CursorPolicy) -> Vec<Page<T>> {
    let mut pages = Vec::new();
    let mut offset = Some(0);

    while let Some(current) = offset {
        let next = page(collection, current, limit, policy);
        offset = next.next_offset;
        pages.push(next);
    }

    pages
}
