//! Best-effort join of recommendations with external metadata.
//!
//! Every recommendation is looked up by title at the metadata provider. A
//! failed, slow or empty lookup never fails the request; the record keeps
//! its structural fields and gets placeholders for the external ones.

use std::{sync::Arc, time::Duration};

use crate::{
    models::{EnrichedMovie, MovieSummary, RecommendedMovie},
    services::providers::MetadataProvider,
};

pub const PLACEHOLDER_POSTER: &str = "/placeholder-movie.png";
pub const PLACEHOLDER_BACKDROP: &str = "/placeholder-backdrop.png";
pub const NO_DESCRIPTION: &str = "No description available.";
pub const NOT_AVAILABLE: &str = "N/A";

const POSTER_SIZE: &str = "w500";
const BACKDROP_SIZE: &str = "original";

/// Builds image URLs on the provider's CDN
#[derive(Debug, Clone)]
pub struct ImageUrls {
    base_url: String,
}

impl ImageUrls {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn poster(&self, path: Option<&str>) -> String {
        self.image(path, POSTER_SIZE, PLACEHOLDER_POSTER)
    }

    pub fn backdrop(&self, path: Option<&str>) -> String {
        self.image(path, BACKDROP_SIZE, PLACEHOLDER_BACKDROP)
    }

    fn image(&self, path: Option<&str>, size: &str, placeholder: &str) -> String {
        match path.filter(|p| !p.is_empty()) {
            Some(path) => format!("{}/{}{}", self.base_url, size, path),
            None => placeholder.to_string(),
        }
    }
}

/// Merges one recommendation with an optional external summary
pub fn merge(
    movie: RecommendedMovie,
    summary: Option<&MovieSummary>,
    images: &ImageUrls,
) -> EnrichedMovie {
    let poster = images.poster(summary.and_then(|s| s.poster_path.as_deref()));
    let overview = summary
        .and_then(|s| s.overview.as_deref())
        .filter(|o| !o.trim().is_empty())
        .unwrap_or(NO_DESCRIPTION)
        .to_string();
    let display_rating = summary
        .and_then(|s| s.vote_average)
        .map(|rating| format!("{:.1}", rating))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());
    let display_year = summary
        .and_then(|s| s.release_year())
        .unwrap_or(NOT_AVAILABLE)
        .to_string();

    EnrichedMovie {
        poster,
        overview,
        display_rating,
        display_year,
        tmdb_id: summary.map(|s| s.id),
        movie,
    }
}

/// Enriches all recommendations concurrently, preserving their order.
///
/// Each lookup runs in its own task bounded by `timeout`.
pub async fn enrich_all(
    provider: Arc<dyn MetadataProvider>,
    images: &ImageUrls,
    movies: Vec<RecommendedMovie>,
    timeout: Duration,
) -> Vec<EnrichedMovie> {
    let mut tasks = Vec::with_capacity(movies.len());

    for movie in &movies {
        let provider = provider.clone();
        let title = movie.title.clone();
        tasks.push(tokio::spawn(async move {
            tokio::time::timeout(timeout, provider.fetch_by_title(&title)).await
        }));
    }

    let mut enriched = Vec::with_capacity(movies.len());
    let mut degraded = 0usize;

    for (movie, task) in movies.into_iter().zip(tasks) {
        let summary = match task.await {
            Ok(Ok(Ok(summary))) => summary,
            Ok(Ok(Err(e))) => {
                tracing::warn!(title = %movie.title, error = %e, "Metadata lookup failed");
                None
            }
            Ok(Err(_elapsed)) => {
                tracing::warn!(
                    title = %movie.title,
                    timeout_ms = timeout.as_millis() as u64,
                    "Metadata lookup timed out"
                );
                None
            }
            Err(e) => {
                tracing::error!(title = %movie.title, error = %e, "Metadata task join error");
                None
            }
        };

        if summary.is_none() {
            degraded += 1;
        }
        enriched.push(merge(movie, summary.as_ref(), images));
    }

    if degraded > 0 {
        tracing::info!(
            total = enriched.len(),
            degraded,
            provider = provider.name(),
            "Enrichment used placeholders"
        );
    }

    enriched
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::models::MovieId;
    use crate::services::providers::MockMetadataProvider;

    fn movie(title: &str) -> RecommendedMovie {
        RecommendedMovie {
            title: title.to_string(),
            id: MovieId::Numeric(1),
            score: 0.5,
            year: Some(2010),
            rating: Some(8.0),
            vote_count: None,
            genres: None,
            primary_genre: None,
            runtime: None,
            language: None,
            popularity: None,
        }
    }

    fn summary(id: i64, title: &str) -> MovieSummary {
        MovieSummary {
            id,
            title: title.to_string(),
            overview: Some("A thief who steals corporate secrets".to_string()),
            poster_path: Some("/poster.jpg".to_string()),
            backdrop_path: None,
            release_date: Some("2010-07-15".to_string()),
            vote_average: Some(8.364),
            genre_ids: vec![28, 878],
            popularity: None,
        }
    }

    fn images() -> ImageUrls {
        ImageUrls::new("https://image.tmdb.org/t/p/")
    }

    #[test]
    fn test_image_urls() {
        let images = images();
        assert_eq!(
            images.poster(Some("/a.jpg")),
            "https://image.tmdb.org/t/p/w500/a.jpg"
        );
        assert_eq!(images.poster(None), PLACEHOLDER_POSTER);
        assert_eq!(images.poster(Some("")), PLACEHOLDER_POSTER);
        assert_eq!(
            images.backdrop(Some("/b.jpg")),
            "https://image.tmdb.org/t/p/original/b.jpg"
        );
        assert_eq!(images.backdrop(None), PLACEHOLDER_BACKDROP);
    }

    #[test]
    fn test_merge_with_summary() {
        let enriched = merge(movie("Inception"), Some(&summary(27205, "Inception")), &images());
        assert_eq!(enriched.poster, "https://image.tmdb.org/t/p/w500/poster.jpg");
        assert_eq!(enriched.display_rating, "8.4");
        assert_eq!(enriched.display_year, "2010");
        assert_eq!(enriched.tmdb_id, Some(27205));
        assert_eq!(enriched.movie.rating, Some(8.0));
    }

    #[test]
    fn test_merge_without_summary_uses_placeholders() {
        let enriched = merge(movie("Obscure"), None, &images());
        assert_eq!(enriched.poster, PLACEHOLDER_POSTER);
        assert_eq!(enriched.overview, NO_DESCRIPTION);
        assert_eq!(enriched.display_rating, NOT_AVAILABLE);
        assert_eq!(enriched.display_year, NOT_AVAILABLE);
        assert_eq!(enriched.tmdb_id, None);
        // Structural fields survive
        assert_eq!(enriched.movie.year, Some(2010));
    }

    #[test]
    fn test_enriched_json_flattens_structural_fields() {
        let enriched = merge(movie("Obscure"), None, &images());
        let json = serde_json::to_value(&enriched).unwrap();
        assert_eq!(json["title"], "Obscure");
        assert_eq!(json["displayRating"], "N/A");
        assert_eq!(json["voteCount"], serde_json::Value::Null);
    }

    #[tokio::test]
    async fn test_enrich_all_degrades_per_item() {
        let mut provider = MockMetadataProvider::new();
        provider
            .expect_fetch_by_title()
            .returning(|title| match title {
                "Inception" => Ok(Some(summary(27205, "Inception"))),
                "Unknown" => Ok(None),
                _ => Err(AppError::ExternalApi("rate limited".to_string())),
            });
        provider.expect_name().return_const("mock");

        let movies = vec![movie("Inception"), movie("Broken"), movie("Unknown")];
        let enriched = enrich_all(
            Arc::new(provider),
            &images(),
            movies,
            Duration::from_secs(1),
        )
        .await;

        assert_eq!(enriched.len(), 3);
        assert_eq!(enriched[0].movie.title, "Inception");
        assert_eq!(enriched[0].display_year, "2010");
        assert_eq!(enriched[1].movie.title, "Broken");
        assert_eq!(enriched[1].overview, NO_DESCRIPTION);
        assert_eq!(enriched[2].movie.title, "Unknown");
        assert_eq!(enriched[2].poster, PLACEHOLDER_POSTER);
    }

    #[tokio::test]
    async fn test_enrich_all_with_disabled_provider() {
        let provider = Arc::new(crate::services::providers::DisabledProvider);
        let enriched = enrich_all(
            provider,
            &images(),
            vec![movie("Inception")],
            Duration::from_millis(100),
        )
        .await;
        assert_eq!(enriched[0].display_rating, NOT_AVAILABLE);
    }
}
