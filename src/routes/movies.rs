use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::MovieDetails,
    routes::AppState,
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieDetailsResponse {
    #[serde(flatten)]
    pub details: MovieDetails,
    pub poster_url: String,
    pub backdrop_url: String,
}

/// Full details of a movie from the metadata provider
pub async fn details(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> AppResult<Json<MovieDetailsResponse>> {
    let details = state
        .metadata_provider
        .fetch_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Movie {} not found", id)))?;

    Ok(Json(MovieDetailsResponse {
        poster_url: state.images.poster(details.poster_path.as_deref()),
        backdrop_url: state.images.backdrop(details.backdrop_path.as_deref()),
        details,
    }))
}
