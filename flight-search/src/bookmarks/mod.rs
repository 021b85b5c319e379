//! Saved flight searches per user.
//!
//! A bookmark remembers the query string of a search together with its
//! departure time, so a user can list upcoming searches and re-run them.

mod error;
mod store;

pub use error::BookmarkError;
pub use store::{Bookmark, BookmarkRepository, InMemoryBookmarkRepository, NewBookmark};
