use std::{path::PathBuf, sync::Arc};

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Reasons the similarity artifact could not be loaded
#[derive(thiserror::Error, Debug)]
pub enum ArtifactError {
    #[error("artifact file not found: {}", .0.display())]
    Missing(PathBuf),

    #[error("failed to read artifact {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed artifact: {0}")]
    Malformed(String),
}

impl From<serde_json::Error> for ArtifactError {
    fn from(err: serde_json::Error) -> Self {
        ArtifactError::Malformed(err.to_string())
    }
}

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Movie not found: {query}")]
    MovieNotFound {
        query: String,
        suggestions: Vec<String>,
        total_movies: usize,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Recommendation model unavailable: {0}")]
    ArtifactUnavailable(Arc<ArtifactError>),

    /// Artifact failure surfaced by the recommendation endpoint
    #[error("Failed to generate recommendations: {0}")]
    RecommendationFailed(Arc<ArtifactError>),

    #[error("External API error: {0}")]
    ExternalApi(String),

    #[error("Collaborator unavailable: {0}")]
    CollaboratorUnavailable(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::MovieNotFound {
                query,
                suggestions,
                total_movies,
            } => {
                let body = Json(json!({
                    "error": "Movie not found",
                    "query": query,
                    "suggestions": suggestions,
                    "totalMovies": total_movies,
                }));
                return (StatusCode::NOT_FOUND, body).into_response();
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::ArtifactUnavailable(ref err) => {
                tracing::error!(error = %err, "Recommendation model unavailable");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Recommendation model unavailable".to_string(),
                )
            }
            AppError::RecommendationFailed(ref err) => {
                tracing::error!(error = %err, "Recommendation model unavailable");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to generate recommendations".to_string(),
                )
            }
            AppError::Database(_) | AppError::Cache(_) | AppError::Internal(_) => {
                tracing::error!(error = %self, "Internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
            AppError::ExternalApi(msg) => (StatusCode::BAD_GATEWAY, msg),
            AppError::HttpClient(_) => (StatusCode::BAD_GATEWAY, self.to_string()),
            AppError::CollaboratorUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

/// Malformed or missing JSON bodies answer 400 like any other bad input
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidInput(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::InvalidInput(rejection.body_text())
    }
}

pub type AppResult<T> = Result<T, AppError>;
