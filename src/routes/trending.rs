use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    error::AppResult,
    models::{MovieSummary, TimeWindow},
    routes::AppState,
    services::trending::{self, SortBy, TrendingFilter},
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendingQuery {
    #[serde(default)]
    genre: Option<String>,
    #[serde(default)]
    min_rating: Option<f64>,
    #[serde(default)]
    sort_by: Option<String>,
    #[serde(default)]
    time_window: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TrendingResponse {
    pub results: Vec<MovieSummary>,
}

/// Handler for trending movies
pub async fn trending(
    State(state): State<Arc<AppState>>,
    params: Result<Query<TrendingQuery>, QueryRejection>,
) -> AppResult<Json<TrendingResponse>> {
    let Query(params) = params?;
    let window = match params.time_window.as_deref() {
        Some(window) => window.parse::<TimeWindow>()?,
        None => TimeWindow::default(),
    };

    let filter = TrendingFilter {
        genre: params.genre,
        min_rating: params.min_rating,
        sort_by: params.sort_by.as_deref().map(SortBy::parse),
    };

    let results = trending::trending(state.metadata_provider.as_ref(), window, &filter).await?;
    Ok(Json(TrendingResponse { results }))
}
