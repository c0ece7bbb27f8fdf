/// External movie-metadata abstraction
///
/// The artifact only knows titles, ids and structural metadata. Posters,
/// descriptions, trending lists and full details come from an external
/// service behind this trait, so it can be swapped or disabled.
use crate::{
    error::{AppError, AppResult},
    models::{MovieDetails, MovieSummary, TimeWindow},
};

pub mod tmdb;

pub use tmdb::TmdbProvider;

/// Trait for external movie-metadata providers
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Best match for a title, or `None` when the provider knows nothing
    async fn fetch_by_title(&self, title: &str) -> AppResult<Option<MovieSummary>>;

    /// Full details for a provider id, or `None` when it does not exist
    async fn fetch_by_id(&self, id: i64) -> AppResult<Option<MovieDetails>>;

    /// Currently trending movies, in provider order
    async fn trending(&self, window: TimeWindow) -> AppResult<Vec<MovieSummary>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}

/// Provider used when no metadata service is configured
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledProvider;

impl DisabledProvider {
    fn unavailable() -> AppError {
        AppError::CollaboratorUnavailable("Movie metadata service is not configured".to_string())
    }
}

#[async_trait::async_trait]
impl MetadataProvider for DisabledProvider {
    async fn fetch_by_title(&self, _title: &str) -> AppResult<Option<MovieSummary>> {
        Err(Self::unavailable())
    }

    async fn fetch_by_id(&self, _id: i64) -> AppResult<Option<MovieDetails>> {
        Err(Self::unavailable())
    }

    async fn trending(&self, _window: TimeWindow) -> AppResult<Vec<MovieSummary>> {
        Err(Self::unavailable())
    }

    fn name(&self) -> &'static str {
        "disabled"
    }
}
