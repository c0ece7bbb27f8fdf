/// TMDB (The Movie Database) provider
///
/// Responses are cached in Redis for an hour; TMDB data changes slowly and
/// the API is rate limited.
use crate::{
    cached,
    db::{Cache, CacheKey},
    error::{AppError, AppResult},
    models::{tmdb::TmdbPage, MovieDetails, MovieSummary, TimeWindow},
    services::providers::MetadataProvider,
};
use reqwest::{Client as HttpClient, Response, StatusCode};

const TMDB_CACHE_TTL: u64 = 3600; // 1 hour
const LANGUAGE: &str = "en-US";

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    cache: Cache,
}

impl TmdbProvider {
    pub fn new(cache: Cache, api_key: String, api_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
            cache,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_url, path.trim_start_matches('/'))
    }

    async fn ensure_success(response: Response) -> AppResult<Response> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Err(AppError::ExternalApi(format!(
            "TMDB returned status {}: {}",
            status, body
        )))
    }
}

/// TMDB orders search results by relevance; the first one is the match
fn best_match(page: TmdbPage<MovieSummary>) -> Option<MovieSummary> {
    page.results.into_iter().next()
}

#[async_trait::async_trait]
impl MetadataProvider for TmdbProvider {
    async fn fetch_by_title(&self, title: &str) -> AppResult<Option<MovieSummary>> {
        if title.trim().is_empty() {
            return Ok(None);
        }

        cached!(
            self.cache,
            CacheKey::MovieSearch(title.to_string()),
            TMDB_CACHE_TTL,
            async move {
                let response = self
                    .http_client
                    .get(self.endpoint("search/movie"))
                    .query(&[
                        ("api_key", self.api_key.as_str()),
                        ("query", title),
                        ("language", LANGUAGE),
                    ])
                    .send()
                    .await?;

                let page: TmdbPage<MovieSummary> =
                    Self::ensure_success(response).await?.json().await?;
                let summary = best_match(page);

                tracing::debug!(
                    title = %title,
                    found = summary.is_some(),
                    provider = "tmdb",
                    "Movie search completed"
                );

                Ok::<_, AppError>(summary)
            }
        )
    }

    async fn fetch_by_id(&self, id: i64) -> AppResult<Option<MovieDetails>> {
        cached!(
            self.cache,
            CacheKey::MovieDetails(id),
            TMDB_CACHE_TTL,
            async move {
                let response = self
                    .http_client
                    .get(self.endpoint(&format!("movie/{}", id)))
                    .query(&[
                        ("api_key", self.api_key.as_str()),
                        ("language", LANGUAGE),
                        ("append_to_response", "credits,videos"),
                    ])
                    .send()
                    .await?;

                if response.status() == StatusCode::NOT_FOUND {
                    return Ok(None);
                }

                let details: MovieDetails = Self::ensure_success(response).await?.json().await?;

                tracing::info!(movie_id = id, provider = "tmdb", "Movie details fetched");

                Ok::<_, AppError>(Some(details))
            }
        )
    }

    async fn trending(&self, window: TimeWindow) -> AppResult<Vec<MovieSummary>> {
        cached!(
            self.cache,
            CacheKey::Trending(window),
            TMDB_CACHE_TTL,
            async move {
                let response = self
                    .http_client
                    .get(self.endpoint(&format!("trending/movie/{}", window)))
                    .query(&[("api_key", self.api_key.as_str())])
                    .send()
                    .await?;

                let page: TmdbPage<MovieSummary> =
                    Self::ensure_success(response).await?.json().await?;

                tracing::info!(
                    window = %window,
                    results = page.results.len(),
                    provider = "tmdb",
                    "Trending movies fetched"
                );

                Ok::<_, AppError>(page.results)
            }
        )
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn create_test_provider(api_url: &str) -> TmdbProvider {
        let client = redis::Client::open("redis://localhost:6379").unwrap();
        let (cache, _handle) = Cache::new(client).await;
        TmdbProvider::new(cache, "test_key".to_string(), api_url.to_string())
    }

    #[tokio::test]
    async fn test_endpoint_joins_without_double_slash() {
        let provider = create_test_provider("https://api.themoviedb.org/3/").await;
        assert_eq!(
            provider.endpoint("/search/movie"),
            "https://api.themoviedb.org/3/search/movie"
        );
        assert_eq!(
            provider.endpoint(&format!("trending/movie/{}", TimeWindow::Week)),
            "https://api.themoviedb.org/3/trending/movie/week"
        );
        assert_eq!(provider.name(), "tmdb");
    }

    #[tokio::test]
    async fn test_blank_title_skips_lookup() {
        let provider = create_test_provider("http://test.local").await;
        assert_eq!(provider.fetch_by_title("   ").await.unwrap(), None);
    }

    #[test]
    fn test_best_match_takes_first_result() {
        let page: TmdbPage<MovieSummary> = serde_json::from_str(
            r#"{"page": 1, "results": [
                {"id": 27205, "title": "Inception", "poster_path": "/inception.jpg", "vote_average": 8.4},
                {"id": 64956, "title": "Inception: The Cobol Job"}
            ]}"#,
        )
        .unwrap();

        let summary = best_match(page).unwrap();
        assert_eq!(summary.id, 27205);
        assert_eq!(summary.poster_path.as_deref(), Some("/inception.jpg"));
    }

    #[test]
    fn test_best_match_empty_page() {
        let page: TmdbPage<MovieSummary> = serde_json::from_str(r#"{"results": []}"#).unwrap();
        assert!(best_match(page).is_none());
    }
}
