//! Bookmark errors.

use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BookmarkError {
    /// The user already saved this search
    #[error("bookmark already exists for {search_params}")]
    Duplicate { search_params: String },

    /// No bookmark with this id belongs to the user
    #[error("bookmark {0} not found")]
    NotFound(Uuid),
}
