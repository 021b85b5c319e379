//! Bookmark storage.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use chrono::NaiveDateTime;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::results::{Clock, SystemClock};

use super::error::BookmarkError;

/// A saved flight search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bookmark {
    pub id: Uuid,

    pub user_id: String,

    /// Query string of the saved search, unique per user
    pub search_params: String,

    pub departure_at: NaiveDateTime,

    pub created_at: NaiveDateTime,
}

/// A bookmark about to be saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBookmark {
    pub search_params: String,
    pub departure_at: NaiveDateTime,
}

/// Persistence for bookmarks, scoped by user.
pub trait BookmarkRepository: Send + Sync {
    /// Save a bookmark. Saving the same search twice is a
    /// [`BookmarkError::Duplicate`].
    fn add(
        &self,
        user_id: &str,
        bookmark: NewBookmark,
    ) -> impl Future<Output = Result<Bookmark, BookmarkError>> + Send;

    /// The user's bookmarks in creation order, optionally only those
    /// departing at or after `departure_at_after`.
    fn list(
        &self,
        user_id: &str,
        departure_at_after: Option<NaiveDateTime>,
    ) -> impl Future<Output = Vec<Bookmark>> + Send;

    /// Remove one of the user's bookmarks.
    fn delete(
        &self,
        user_id: &str,
        id: Uuid,
    ) -> impl Future<Output = Result<(), BookmarkError>> + Send;
}

/// Bookmarks held in process memory.
#[derive(Clone)]
pub struct InMemoryBookmarkRepository {
    inner: Arc<RwLock<HashMap<String, Vec<Bookmark>>>>,
    clock: Arc<dyn Clock>,
}

impl InMemoryBookmarkRepository {
    /// An empty repository stamping bookmarks with the system clock.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
            clock: Arc::new(SystemClock),
        }
    }

    /// Use a different clock for `created_at`.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }
}

impl Default for InMemoryBookmarkRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl BookmarkRepository for InMemoryBookmarkRepository {
    async fn add(&self, user_id: &str, bookmark: NewBookmark) -> Result<Bookmark, BookmarkError> {
        let mut guard = self.inner.write().await;
        let saved = guard.entry(user_id.to_string()).or_default();

        if saved
            .iter()
            .any(|b| b.search_params == bookmark.search_params)
        {
            return Err(BookmarkError::Duplicate {
                search_params: bookmark.search_params,
            });
        }

        let bookmark = Bookmark {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            search_params: bookmark.search_params,
            departure_at: bookmark.departure_at,
            created_at: self.clock.now(),
        };
        debug!(user_id, id = %bookmark.id, "bookmark added");
        saved.push(bookmark.clone());
        Ok(bookmark)
    }

    async fn list(&self, user_id: &str, departure_at_after: Option<NaiveDateTime>) -> Vec<Bookmark> {
        let guard = self.inner.read().await;
        guard
            .get(user_id)
            .into_iter()
            .flatten()
            .filter(|b| departure_at_after.is_none_or(|after| b.departure_at >= after))
            .cloned()
            .collect()
    }

    async fn delete(&self, user_id: &str, id: Uuid) -> Result<(), BookmarkError> {
        let mut guard = self.inner.write().await;
        let saved = guard.get_mut(user_id).ok_or(BookmarkError::NotFound(id))?;
        let index = saved
            .iter()
            .position(|b| b.id == id)
            .ok_or(BookmarkError::NotFound(id))?;

        saved.remove(index);
        debug!(user_id, %id, "bookmark deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::FixedClock;
    use chrono::NaiveDate;

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn new_bookmark(params: &str, departure_at: NaiveDateTime) -> NewBookmark {
        NewBookmark {
            search_params: params.to_string(),
            departure_at,
        }
    }

    fn repo() -> InMemoryBookmarkRepository {
        InMemoryBookmarkRepository::new().with_clock(FixedClock(at(1, 8)))
    }

    #[tokio::test]
    async fn add_stamps_id_and_creation_time() {
        let repo = repo();
        let saved = repo
            .add("alice", new_bookmark("origin=KUL&dest=IKA", at(5, 9)))
            .await
            .unwrap();

        assert_eq!(saved.user_id, "alice");
        assert_eq!(saved.created_at, at(1, 8));
        assert_eq!(repo.list("alice", None).await, vec![saved]);
    }

    #[tokio::test]
    async fn duplicate_search_is_rejected_per_user() {
        let repo = repo();
        repo.add("alice", new_bookmark("q=1", at(5, 9))).await.unwrap();

        let err = repo
            .add("alice", new_bookmark("q=1", at(6, 9)))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            BookmarkError::Duplicate {
                search_params: "q=1".into()
            }
        );

        assert!(repo.add("bob", new_bookmark("q=1", at(5, 9))).await.is_ok());
        assert_eq!(repo.list("alice", None).await.len(), 1);
    }

    #[tokio::test]
    async fn list_filters_on_departure_inclusive() {
        let repo = repo();
        repo.add("alice", new_bookmark("q=1", at(3, 9))).await.unwrap();
        repo.add("alice", new_bookmark("q=2", at(5, 9))).await.unwrap();
        repo.add("alice", new_bookmark("q=3", at(7, 9))).await.unwrap();

        let params: Vec<_> = repo
            .list("alice", Some(at(5, 9)))
            .await
            .into_iter()
            .map(|b| b.search_params)
            .collect();
        assert_eq!(params, ["q=2", "q=3"]);

        assert!(repo.list("carol", None).await.is_empty());
    }

    #[tokio::test]
    async fn delete_is_scoped_to_owner() {
        let repo = repo();
        let saved = repo.add("alice", new_bookmark("q=1", at(5, 9))).await.unwrap();

        assert_eq!(
            repo.delete("bob", saved.id).await,
            Err(BookmarkError::NotFound(saved.id))
        );
        assert_eq!(repo.list("alice", None).await.len(), 1);

        repo.delete("alice", saved.id).await.unwrap();
        assert!(repo.list("alice", None).await.is_empty());
        assert_eq!(
            repo.delete("alice", saved.id).await,
            Err(BookmarkError::NotFound(saved.id))
        );
    }

    #[test]
    fn bookmark_serializes_camel_case() {
        let bookmark = Bookmark {
            id: Uuid::nil(),
            user_id: "alice".into(),
            search_params: "q=1".into(),
            departure_at: at(5, 9),
            created_at: at(1, 8),
        };
        let json = serde_json::to_value(&bookmark).unwrap();
        assert_eq!(json["userId"], "alice");
        assert_eq!(json["searchParams"], "q=1");
        assert_eq!(json["departureAt"], "2025-06-05T09:00:00");
        assert_eq!(json["id"], "00000000-0000-0000-0000-000000000000");
    }
}
