use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    middleware::UserId,
    models::{NewWatchlistEntry, WatchlistEntry},
    routes::AppState,
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchlistStatus {
    pub movie_id: String,
    pub in_watchlist: bool,
}

/// The caller's watchlist, newest first
pub async fn list(
    State(state): State<Arc<AppState>>,
    user: UserId,
) -> AppResult<Json<Vec<WatchlistEntry>>> {
    let entries = state.watchlist.watchlist(user.as_str()).await?;
    Ok(Json(entries))
}

/// Adds a movie to the caller's watchlist
pub async fn add(
    State(state): State<Arc<AppState>>,
    user: UserId,
    payload: Result<Json<NewWatchlistEntry>, JsonRejection>,
) -> AppResult<(StatusCode, Json<WatchlistEntry>)> {
    let Json(entry) = payload?;
    if entry.movie_id.trim().is_empty() || entry.movie_title.trim().is_empty() {
        return Err(AppError::InvalidInput(
            "movieId and movieTitle are required".to_string(),
        ));
    }

    let saved = state.watchlist.add_to_watchlist(user.as_str(), entry).await?;
    tracing::info!(user_id = %user, movie_id = %saved.movie_id, "Added to watchlist");
    Ok((StatusCode::CREATED, Json(saved)))
}

/// Whether a movie is on the caller's watchlist.
/// Store failures surface as errors rather than a guessed `false`.
pub async fn status(
    State(state): State<Arc<AppState>>,
    user: UserId,
    Path(movie_id): Path<String>,
) -> AppResult<Json<WatchlistStatus>> {
    let in_watchlist = state
        .watchlist
        .is_in_watchlist(user.as_str(), &movie_id)
        .await?;
    Ok(Json(WatchlistStatus {
        movie_id,
        in_watchlist,
    }))
}

/// Removes a movie from the caller's watchlist
pub async fn remove(
    State(state): State<Arc<AppState>>,
    user: UserId,
    Path(movie_id): Path<String>,
) -> AppResult<StatusCode> {
    let removed = state
        .watchlist
        .remove_from_watchlist(user.as_str(), &movie_id)
        .await?;
    tracing::info!(user_id = %user, movie_id = %movie_id, removed, "Removed from watchlist");
    Ok(StatusCode::NO_CONTENT)
}
