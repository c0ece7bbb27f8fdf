//! Storage for user documents (watchlist entries and reviews) and the
//! Redis cache for external metadata.

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{NewReview, NewWatchlistEntry, Review, WatchlistEntry},
};

pub mod memory;
pub mod postgres;
pub mod redis;

pub use self::memory::InMemoryStore;
pub use self::postgres::{create_pool, PgStore};
pub use self::redis::{create_redis_client, Cache, CacheKey, CacheWriterHandle};

/// Watchlist documents keyed by `(user_id, movie_id)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WatchlistStore: Send + Sync {
    /// Adds a movie; adding a movie already present returns the existing entry
    async fn add_to_watchlist(
        &self,
        user_id: &str,
        entry: NewWatchlistEntry,
    ) -> AppResult<WatchlistEntry>;

    /// Removes every entry for the pair, returning how many were removed
    async fn remove_from_watchlist(&self, user_id: &str, movie_id: &str) -> AppResult<u64>;

    /// All entries of a user, newest first
    async fn watchlist(&self, user_id: &str) -> AppResult<Vec<WatchlistEntry>>;

    async fn is_in_watchlist(&self, user_id: &str, movie_id: &str) -> AppResult<bool>;
}

/// Star ratings and written reviews
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewStore: Send + Sync {
    async fn add_review(&self, user_id: &str, movie_id: &str, review: NewReview)
        -> AppResult<Review>;

    /// Reviews of a movie, newest first
    async fn movie_reviews(&self, movie_id: &str) -> AppResult<Vec<Review>>;

    /// The user's most recent review of a movie
    async fn user_review(&self, user_id: &str, movie_id: &str) -> AppResult<Option<Review>>;

    /// Increments the like counter; `NotFound` for unknown reviews
    async fn like_review(&self, review_id: Uuid) -> AppResult<Review>;
}
