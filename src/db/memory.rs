use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    db::{ReviewStore, WatchlistStore},
    error::{AppError, AppResult},
    models::{NewReview, NewWatchlistEntry, Review, WatchlistEntry},
};

/// Document store kept in process memory.
///
/// Used when no database is configured and in tests. Contents are lost on
/// restart.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    inner: Arc<RwLock<InMemoryStoreInner>>,
}

#[derive(Default)]
struct InMemoryStoreInner {
    watchlist: Vec<WatchlistEntry>,
    reviews: HashMap<Uuid, Review>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl WatchlistStore for InMemoryStore {
    async fn add_to_watchlist(
        &self,
        user_id: &str,
        entry: NewWatchlistEntry,
    ) -> AppResult<WatchlistEntry> {
        let mut inner = self.inner.write().await;
        if let Some(existing) = inner
            .watchlist
            .iter()
            .find(|e| e.user_id == user_id && e.movie_id == entry.movie_id)
        {
            return Ok(existing.clone());
        }

        let saved = WatchlistEntry::new(user_id, entry);
        inner.watchlist.push(saved.clone());
        Ok(saved)
    }

    async fn remove_from_watchlist(&self, user_id: &str, movie_id: &str) -> AppResult<u64> {
        let mut inner = self.inner.write().await;
        let before = inner.watchlist.len();
        inner
            .watchlist
            .retain(|e| !(e.user_id == user_id && e.movie_id == movie_id));
        Ok((before - inner.watchlist.len()) as u64)
    }

    async fn watchlist(&self, user_id: &str) -> AppResult<Vec<WatchlistEntry>> {
        let inner = self.inner.read().await;
        // Entries are appended in insertion order
        Ok(inner
            .watchlist
            .iter()
            .rev()
            .filter(|e| e.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn is_in_watchlist(&self, user_id: &str, movie_id: &str) -> AppResult<bool> {
        let inner = self.inner.read().await;
        Ok(inner
            .watchlist
            .iter()
            .any(|e| e.user_id == user_id && e.movie_id == movie_id))
    }
}

#[async_trait]
impl ReviewStore for InMemoryStore {
    async fn add_review(
        &self,
        user_id: &str,
        movie_id: &str,
        review: NewReview,
    ) -> AppResult<Review> {
        let saved = Review::new(user_id, movie_id, review);
        let mut inner = self.inner.write().await;
        inner.reviews.insert(saved.id, saved.clone());
        Ok(saved)
    }

    async fn movie_reviews(&self, movie_id: &str) -> AppResult<Vec<Review>> {
        let inner = self.inner.read().await;
        let mut reviews: Vec<Review> = inner
            .reviews
            .values()
            .filter(|r| r.movie_id == movie_id)
            .cloned()
            .collect();
        reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(reviews)
    }

    async fn user_review(&self, user_id: &str, movie_id: &str) -> AppResult<Option<Review>> {
        let inner = self.inner.read().await;
        Ok(inner
            .reviews
            .values()
            .filter(|r| r.user_id == user_id && r.movie_id == movie_id)
            .max_by_key(|r| r.created_at)
            .cloned())
    }

    async fn like_review(&self, review_id: Uuid) -> AppResult<Review> {
        let mut inner = self.inner.write().await;
        let review = inner
            .reviews
            .get_mut(&review_id)
            .ok_or_else(|| AppError::NotFound(format!("Review {} not found", review_id)))?;
        review.likes += 1;
        Ok(review.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(movie_id: &str) -> NewWatchlistEntry {
        NewWatchlistEntry {
            movie_id: movie_id.to_string(),
            movie_title: format!("Movie {}", movie_id),
            poster: None,
            rating: Some("7.1".to_string()),
            year: Some("2010".to_string()),
        }
    }

    fn review(rating: i32) -> NewReview {
        NewReview {
            user_name: "Ada".to_string(),
            movie_title: "Inception".to_string(),
            rating,
            review: String::new(),
        }
    }

    #[tokio::test]
    async fn test_watchlist_add_is_idempotent_per_pair() {
        let store = InMemoryStore::new();
        let first = store.add_to_watchlist("u1", entry("1")).await.unwrap();
        let again = store.add_to_watchlist("u1", entry("1")).await.unwrap();
        assert_eq!(first.id, again.id);

        store.add_to_watchlist("u2", entry("1")).await.unwrap();
        assert_eq!(store.watchlist("u1").await.unwrap().len(), 1);
        assert_eq!(store.watchlist("u2").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_watchlist_newest_first_and_remove() {
        let store = InMemoryStore::new();
        store.add_to_watchlist("u1", entry("1")).await.unwrap();
        store.add_to_watchlist("u1", entry("2")).await.unwrap();

        let movies: Vec<String> = store
            .watchlist("u1")
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.movie_id)
            .collect();
        assert_eq!(movies, vec!["2", "1"]);

        assert!(store.is_in_watchlist("u1", "1").await.unwrap());
        assert_eq!(store.remove_from_watchlist("u1", "1").await.unwrap(), 1);
        assert!(!store.is_in_watchlist("u1", "1").await.unwrap());
        assert_eq!(store.remove_from_watchlist("u1", "1").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_reviews_and_likes() {
        let store = InMemoryStore::new();
        let saved = store.add_review("u1", "27205", review(5)).await.unwrap();
        store.add_review("u2", "27205", review(3)).await.unwrap();
        store.add_review("u2", "155", review(4)).await.unwrap();

        assert_eq!(store.movie_reviews("27205").await.unwrap().len(), 2);
        assert_eq!(
            store.user_review("u1", "27205").await.unwrap().map(|r| r.rating),
            Some(5)
        );
        assert!(store.user_review("u1", "155").await.unwrap().is_none());

        assert_eq!(store.like_review(saved.id).await.unwrap().likes, 1);
        assert_eq!(store.like_review(saved.id).await.unwrap().likes, 2);
        assert!(matches!(
            store.like_review(Uuid::new_v4()).await,
            Err(AppError::NotFound(_))
        ));
    }
}
