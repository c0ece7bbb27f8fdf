use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};
use uuid::Uuid;

use crate::{
    db::{ReviewStore, WatchlistStore},
    error::{AppError, AppResult},
    models::{NewReview, NewWatchlistEntry, Review, WatchlistEntry},
};

/// Creates a PostgreSQL connection pool and applies pending migrations
pub async fn create_pool(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}

/// Watchlist and review documents stored in PostgreSQL
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl WatchlistStore for PgStore {
    async fn add_to_watchlist(
        &self,
        user_id: &str,
        entry: NewWatchlistEntry,
    ) -> AppResult<WatchlistEntry> {
        let candidate = WatchlistEntry::new(user_id, entry);

        sqlx::query(
            r#"
            INSERT INTO watchlist (id, user_id, movie_id, movie_title, poster, rating, year, added_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (user_id, movie_id) DO NOTHING
            "#,
        )
        .bind(candidate.id)
        .bind(&candidate.user_id)
        .bind(&candidate.movie_id)
        .bind(&candidate.movie_title)
        .bind(&candidate.poster)
        .bind(&candidate.rating)
        .bind(&candidate.year)
        .bind(candidate.added_at)
        .execute(&self.pool)
        .await?;

        let saved = sqlx::query_as::<_, WatchlistEntry>(
            "SELECT * FROM watchlist WHERE user_id = $1 AND movie_id = $2",
        )
        .bind(user_id)
        .bind(&candidate.movie_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(saved)
    }

    async fn remove_from_watchlist(&self, user_id: &str, movie_id: &str) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM watchlist WHERE user_id = $1 AND movie_id = $2")
            .bind(user_id)
            .bind(movie_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn watchlist(&self, user_id: &str) -> AppResult<Vec<WatchlistEntry>> {
        let entries = sqlx::query_as::<_, WatchlistEntry>(
            "SELECT * FROM watchlist WHERE user_id = $1 ORDER BY added_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(entries)
    }

    async fn is_in_watchlist(&self, user_id: &str, movie_id: &str) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM watchlist WHERE user_id = $1 AND movie_id = $2)",
        )
        .bind(user_id)
        .bind(movie_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }
}

#[async_trait]
impl ReviewStore for PgStore {
    async fn add_review(
        &self,
        user_id: &str,
        movie_id: &str,
        review: NewReview,
    ) -> AppResult<Review> {
        let review = Review::new(user_id, movie_id, review);

        sqlx::query(
            r#"
            INSERT INTO reviews (id, user_id, user_name, movie_id, movie_title, rating, review, likes, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(review.id)
        .bind(&review.user_id)
        .bind(&review.user_name)
        .bind(&review.movie_id)
        .bind(&review.movie_title)
        .bind(review.rating)
        .bind(&review.review)
        .bind(review.likes)
        .bind(review.created_at)
        .execute(&self.pool)
        .await?;

        Ok(review)
    }

    async fn movie_reviews(&self, movie_id: &str) -> AppResult<Vec<Review>> {
        let reviews = sqlx::query_as::<_, Review>(
            "SELECT * FROM reviews WHERE movie_id = $1 ORDER BY created_at DESC",
        )
        .bind(movie_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(reviews)
    }

    async fn user_review(&self, user_id: &str, movie_id: &str) -> AppResult<Option<Review>> {
        let review = sqlx::query_as::<_, Review>(
            r#"
            SELECT * FROM reviews
            WHERE user_id = $1 AND movie_id = $2
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .bind(movie_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(review)
    }

    async fn like_review(&self, review_id: Uuid) -> AppResult<Review> {
        sqlx::query_as::<_, Review>(
            "UPDATE reviews SET likes = likes + 1 WHERE id = $1 RETURNING *",
        )
        .bind(review_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Review {} not found", review_id)))
    }
}
