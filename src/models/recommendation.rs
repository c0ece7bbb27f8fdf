use serde::Serialize;

use super::MovieId;

/// A neighbor joined with its title, id and structural metadata
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecommendedMovie {
    pub title: String,
    pub id: MovieId,
    pub score: f64,
    pub year: Option<i32>,
    pub rating: Option<f64>,
    pub vote_count: Option<u64>,
    pub genres: Option<Vec<String>>,
    pub primary_genre: Option<String>,
    pub runtime: Option<u32>,
    pub language: Option<String>,
    pub popularity: Option<f64>,
}

/// Outcome of resolving a title and reading its neighbors
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendations {
    /// Canonical artifact title the query resolved to
    pub resolved_title: String,
    pub items: Vec<RecommendedMovie>,
}

/// Display record: structural fields plus best-effort external fields.
/// The external fields always hold a value, falling back to placeholders.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedMovie {
    #[serde(flatten)]
    pub movie: RecommendedMovie,
    pub poster: String,
    pub overview: String,
    pub display_rating: String,
    pub display_year: String,
    pub tmdb_id: Option<i64>,
}
