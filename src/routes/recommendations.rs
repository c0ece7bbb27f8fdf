use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::{sync::Arc, time::Instant};

use crate::{
    error::{AppError, AppResult},
    middleware::RequestId,
    models::{EnrichedMovie, RecommendedMovie},
    routes::AppState,
    services::{enrichment, recommendations},
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendRequest {
    #[serde(default)]
    pub movie_title: Option<String>,
    #[serde(default)]
    pub top_n: Option<i64>,
    /// Join each recommendation with external metadata
    #[serde(default)]
    pub enrich: bool,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum RecommendationList {
    Plain(Vec<RecommendedMovie>),
    Enriched(Vec<EnrichedMovie>),
}

impl RecommendationList {
    fn len(&self) -> usize {
        match self {
            RecommendationList::Plain(items) => items.len(),
            RecommendationList::Enriched(items) => items.len(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ModelInfo {
    pub version: Option<String>,
    pub total_movies: usize,
    pub trained_at: Option<String>,
    pub tfidf_features: Option<u64>,
    pub response_time_ms: u64,
}

#[derive(Debug, Serialize)]
pub struct RecommendResponse {
    pub query: String,
    pub resolved_title: String,
    pub recommendations: RecommendationList,
    pub source: &'static str,
    pub model_info: ModelInfo,
}

/// Handler for the recommendations endpoint
pub async fn recommend(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    payload: Result<Json<RecommendRequest>, JsonRejection>,
) -> AppResult<Json<RecommendResponse>> {
    let started = Instant::now();
    let Json(request) = payload?;

    // Blank titles are still queries and resolve to "not found"
    let movie_title = request
        .movie_title
        .filter(|title| !title.is_empty())
        .ok_or_else(|| AppError::InvalidInput("Movie title is required".to_string()))?;
    let top_n = request.top_n.unwrap_or(state.default_top_n);

    let loaded = state.artifacts.get().await.map_err(|e| match e {
        AppError::ArtifactUnavailable(err) => AppError::RecommendationFailed(err),
        other => other,
    })?;
    let artifact = &loaded.artifact;

    let result = recommendations::recommend(artifact, &movie_title, top_n).map_err(|e| {
        if let AppError::MovieNotFound { suggestions, .. } = &e {
            tracing::info!(
                request_id = %request_id,
                query = %movie_title,
                suggestions = suggestions.len(),
                "Movie not found"
            );
        }
        e
    })?;

    let recommendations = if request.enrich {
        RecommendationList::Enriched(
            enrichment::enrich_all(
                state.metadata_provider.clone(),
                &state.images,
                result.items,
                state.enrichment_timeout,
            )
            .await,
        )
    } else {
        RecommendationList::Plain(result.items)
    };

    let build_info = artifact.build_info();
    let response_time_ms = started.elapsed().as_millis() as u64;

    tracing::info!(
        request_id = %request_id,
        query = %movie_title,
        resolved = %result.resolved_title,
        top_n,
        returned = recommendations.len(),
        enriched = request.enrich,
        response_time_ms,
        "Recommendations generated"
    );

    Ok(Json(RecommendResponse {
        query: movie_title,
        resolved_title: result.resolved_title,
        recommendations,
        source: "ml_model",
        model_info: ModelInfo {
            version: build_info.version.clone(),
            total_movies: artifact.len(),
            trained_at: build_info.trained_at.clone(),
            tfidf_features: build_info.tfidf_features,
            response_time_ms,
        },
    }))
}

/// Any verb other than POST on the recommendations endpoint
pub async fn method_not_allowed() -> (StatusCode, Json<Value>) {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(json!({ "error": "Method not allowed" })),
    )
}
