use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    middleware::UserId,
    models::{NewReview, Review},
    routes::AppState,
};

/// All reviews of a movie, newest first
pub async fn list_for_movie(
    State(state): State<Arc<AppState>>,
    Path(movie_id): Path<String>,
) -> AppResult<Json<Vec<Review>>> {
    Ok(Json(state.reviews.movie_reviews(&movie_id).await?))
}

/// Posts the caller's review of a movie
pub async fn create(
    State(state): State<Arc<AppState>>,
    user: UserId,
    Path(movie_id): Path<String>,
    payload: Result<Json<NewReview>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Review>)> {
    let Json(review) = payload?;
    review.validate()?;

    let saved = state
        .reviews
        .add_review(user.as_str(), &movie_id, review)
        .await?;

    tracing::info!(
        user_id = %user,
        movie_id = %movie_id,
        rating = saved.rating,
        "Review posted"
    );

    Ok((StatusCode::CREATED, Json(saved)))
}

/// The caller's own review of a movie
pub async fn mine(
    State(state): State<Arc<AppState>>,
    user: UserId,
    Path(movie_id): Path<String>,
) -> AppResult<Json<Review>> {
    state
        .reviews
        .user_review(user.as_str(), &movie_id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("You have not reviewed this movie".to_string()))
}

/// Likes a review
pub async fn like(
    State(state): State<Arc<AppState>>,
    _user: UserId,
    Path(review_id): Path<Uuid>,
) -> AppResult<Json<Review>> {
    Ok(Json(state.reviews.like_review(review_id).await?))
}
