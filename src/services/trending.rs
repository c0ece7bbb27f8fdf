use std::cmp::Ordering;

use crate::{
    error::AppResult,
    models::{MovieSummary, TimeWindow},
    services::providers::MetadataProvider,
};

/// Genre names accepted by the trending filter, with their TMDB ids
pub const GENRES: &[(&str, i64)] = &[
    ("Action", 28),
    ("Adventure", 12),
    ("Animation", 16),
    ("Comedy", 35),
    ("Crime", 80),
    ("Documentary", 99),
    ("Drama", 18),
    ("Family", 10751),
    ("Fantasy", 14),
    ("Horror", 27),
    ("Mystery", 9648),
    ("Romance", 10749),
    ("Sci-Fi", 878),
    ("Thriller", 53),
    ("War", 10752),
];

/// Pseudo-genre that disables genre filtering
pub const ALL_GENRES: &str = "All";

pub fn genre_id(name: &str) -> Option<i64> {
    GENRES
        .iter()
        .find(|(genre, _)| *genre == name)
        .map(|(_, id)| *id)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortBy {
    /// Provider order
    Popularity,
    Rating,
    Recent,
    Title,
}

impl SortBy {
    /// Unknown values fall back to provider order
    pub fn parse(value: &str) -> Self {
        match value {
            "rating" => SortBy::Rating,
            "recent" => SortBy::Recent,
            "title" => SortBy::Title,
            _ => SortBy::Popularity,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TrendingFilter {
    pub genre: Option<String>,
    pub min_rating: Option<f64>,
    pub sort_by: Option<SortBy>,
}

/// Applies genre and rating filters, then sorts
pub fn apply_filter(mut movies: Vec<MovieSummary>, filter: &TrendingFilter) -> Vec<MovieSummary> {
    if let Some(genre) = filter.genre.as_deref().filter(|g| *g != ALL_GENRES) {
        // An unknown genre name matches nothing
        match genre_id(genre) {
            Some(id) => movies.retain(|m| m.genre_ids.contains(&id)),
            None => movies.clear(),
        }
    }

    if let Some(min_rating) = filter.min_rating {
        movies.retain(|m| m.vote_average.is_some_and(|rating| rating >= min_rating));
    }

    match filter.sort_by.unwrap_or(SortBy::Popularity) {
        SortBy::Popularity => {}
        SortBy::Rating => movies.sort_by(|a, b| {
            b.vote_average
                .unwrap_or(f64::MIN)
                .total_cmp(&a.vote_average.unwrap_or(f64::MIN))
        }),
        SortBy::Recent => movies.sort_by(|a, b| compare_release(b, a)),
        SortBy::Title => movies.sort_by_key(|m| m.title.to_lowercase()),
    }

    movies
}

/// ISO dates order lexicographically; undated movies sort as oldest
fn compare_release(a: &MovieSummary, b: &MovieSummary) -> Ordering {
    let a = a.release_date.as_deref().filter(|d| !d.is_empty());
    let b = b.release_date.as_deref().filter(|d| !d.is_empty());
    a.cmp(&b)
}

/// Trending movies from the metadata provider, filtered and sorted
pub async fn trending(
    provider: &dyn MetadataProvider,
    window: TimeWindow,
    filter: &TrendingFilter,
) -> AppResult<Vec<MovieSummary>> {
    let movies = provider.trending(window).await?;
    let fetched = movies.len();
    let movies = apply_filter(movies, filter);

    tracing::info!(
        window = %window,
        fetched,
        returned = movies.len(),
        genre = filter.genre.as_deref().unwrap_or(ALL_GENRES),
        "Trending movies filtered"
    );

    Ok(movies)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::providers::MockMetadataProvider;

    fn movie(id: i64, title: &str, rating: Option<f64>, date: Option<&str>, genres: &[i64]) -> MovieSummary {
        MovieSummary {
            id,
            title: title.to_string(),
            overview: None,
            poster_path: None,
            backdrop_path: None,
            release_date: date.map(str::to_string),
            vote_average: rating,
            genre_ids: genres.to_vec(),
            popularity: None,
        }
    }

    fn sample() -> Vec<MovieSummary> {
        vec![
            movie(1, "dune", Some(7.9), Some("2021-09-15"), &[878, 12]),
            movie(2, "Barbie", Some(7.0), Some("2023-07-19"), &[35]),
            movie(3, "Alien", None, None, &[27, 878]),
            movie(4, "Casablanca", Some(8.5), Some("1942-11-26"), &[18, 10749]),
        ]
    }

    fn ids(movies: &[MovieSummary]) -> Vec<i64> {
        movies.iter().map(|m| m.id).collect()
    }

    #[test]
    fn test_genre_lookup() {
        assert_eq!(genre_id("Sci-Fi"), Some(878));
        assert_eq!(genre_id("War"), Some(10752));
        assert_eq!(genre_id("Western"), None);
    }

    #[test]
    fn test_no_filter_keeps_provider_order() {
        let movies = apply_filter(sample(), &TrendingFilter::default());
        assert_eq!(ids(&movies), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_genre_filter() {
        let filter = TrendingFilter {
            genre: Some("Sci-Fi".to_string()),
            ..Default::default()
        };
        assert_eq!(ids(&apply_filter(sample(), &filter)), vec![1, 3]);

        let all = TrendingFilter {
            genre: Some("All".to_string()),
            ..Default::default()
        };
        assert_eq!(apply_filter(sample(), &all).len(), 4);

        let unknown = TrendingFilter {
            genre: Some("Western".to_string()),
            ..Default::default()
        };
        assert!(apply_filter(sample(), &unknown).is_empty());
    }

    #[test]
    fn test_min_rating_drops_unrated() {
        let filter = TrendingFilter {
            min_rating: Some(7.5),
            ..Default::default()
        };
        assert_eq!(ids(&apply_filter(sample(), &filter)), vec![1, 4]);
    }

    #[test]
    fn test_sorting() {
        let by = |sort: &str| {
            let filter = TrendingFilter {
                sort_by: Some(SortBy::parse(sort)),
                ..Default::default()
            };
            ids(&apply_filter(sample(), &filter))
        };
        assert_eq!(by("rating"), vec![4, 1, 2, 3]);
        assert_eq!(by("recent"), vec![2, 1, 4, 3]);
        assert_eq!(by("title"), vec![3, 2, 4, 1]);
        assert_eq!(by("popularity"), vec![1, 2, 3, 4]);
        assert_eq!(by("bogus"), vec![1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn test_trending_uses_provider_window() {
        let mut provider = MockMetadataProvider::new();
        provider
            .expect_trending()
            .withf(|window| *window == TimeWindow::Week)
            .times(1)
            .returning(|_| Ok(sample()));

        let filter = TrendingFilter {
            sort_by: Some(SortBy::Rating),
            ..Default::default()
        };
        let movies = trending(&provider, TimeWindow::Week, &filter).await.unwrap();
        assert_eq!(movies[0].title, "Casablanca");
    }
}
