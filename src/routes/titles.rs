use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    error::AppResult,
    middleware::RequestId,
    routes::AppState,
    services::title_search::{self, DEFAULT_LIMIT},
};

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    query: Option<String>,
    #[serde(default)]
    limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub count: usize,
    pub results: Vec<String>,
}

/// Handler for title autocomplete
pub async fn search(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    params: Result<Query<SearchQuery>, QueryRejection>,
) -> AppResult<Json<SearchResponse>> {
    let Query(params) = params?;
    let query = params.query.unwrap_or_default();
    title_search::validate_query(&query)?;

    let limit = params
        .limit
        .map(|limit| usize::try_from(limit).unwrap_or(0))
        .unwrap_or(DEFAULT_LIMIT);

    let loaded = state.artifacts.get().await?;
    let results = title_search::search_titles(&loaded.artifact, &query, limit)?;

    tracing::debug!(
        request_id = %request_id,
        query = %query,
        limit,
        results = results.len(),
        "Title search completed"
    );

    Ok(Json(SearchResponse {
        count: results.len(),
        query,
        results,
    }))
}
