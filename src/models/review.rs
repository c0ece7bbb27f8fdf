use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

pub const MIN_STARS: i32 = 1;
pub const MAX_STARS: i32 = 5;

/// A user's star rating and written review of a movie
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: Uuid,
    pub user_id: String,
    pub user_name: String,
    pub movie_id: String,
    pub movie_title: String,
    pub rating: i32,
    pub review: String,
    pub likes: i64,
    pub created_at: DateTime<Utc>,
}

/// Request body for posting a review
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReview {
    pub user_name: String,
    pub movie_title: String,
    pub rating: i32,
    #[serde(default)]
    pub review: String,
}

impl NewReview {
    pub fn validate(&self) -> AppResult<()> {
        if !(MIN_STARS..=MAX_STARS).contains(&self.rating) {
            return Err(AppError::InvalidInput(format!(
                "Rating must be between {} and {} stars",
                MIN_STARS, MAX_STARS
            )));
        }
        if self.user_name.trim().is_empty() {
            return Err(AppError::InvalidInput("User name is required".to_string()));
        }
        Ok(())
    }
}

impl Review {
    pub fn new(user_id: &str, movie_id: &str, review: NewReview) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            user_name: review.user_name,
            movie_id: movie_id.to_string(),
            movie_title: review.movie_title,
            rating: review.rating,
            review: review.review,
            likes: 0,
            created_at: Utc::now(),
        }
    }
}
