//! Precomputed similarity artifact.
//!
//! The artifact is produced offline and shipped as a single JSON document.
//! [`SimilarityArtifact::from_json_slice`] checks its shape once, so lookup
//! code can index the parallel arrays without re-validating.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ArtifactError;
use crate::models::MovieId;

/// Descriptive build information shipped with the artifact
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BuildInfo {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub trained_at: Option<String>,
    #[serde(default)]
    pub total_movies: Option<u64>,
    #[serde(default)]
    pub tfidf_features: Option<u64>,
    /// Any other keys the offline pipeline wrote
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Structural metadata for a single movie; absent values stay `None`
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct MovieMetadata {
    pub year: Option<i32>,
    pub rating: Option<f64>,
    pub vote_count: Option<u64>,
    pub genres: Option<Vec<String>>,
    pub primary_genre: Option<String>,
    pub runtime_minutes: Option<u32>,
    pub language: Option<String>,
    pub popularity: Option<f64>,
}

/// A precomputed neighbor of a movie
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub index: usize,
    pub score: f64,
}

#[derive(Debug, Deserialize)]
struct RawArtifact {
    titles: Vec<String>,
    ids: Vec<MovieId>,
    #[serde(default)]
    indices: Option<HashMap<String, i64>>,
    top_indices: Vec<Vec<i64>>,
    top_scores: Vec<Vec<f64>>,
    #[serde(default)]
    metadata_movies: Option<RawMovieMetadata>,
    #[serde(default)]
    metadata: BuildInfo,
}

/// Column-oriented metadata as written by the offline pipeline.
/// Numbers may arrive as floats (`2010.0`), so every numeric column is read as `f64`.
#[derive(Debug, Default, Deserialize)]
struct RawMovieMetadata {
    #[serde(default)]
    years: Option<Vec<Option<f64>>>,
    #[serde(default)]
    ratings: Option<Vec<Option<f64>>>,
    #[serde(default)]
    vote_counts: Option<Vec<Option<f64>>>,
    #[serde(default)]
    genres: Option<Vec<Option<Vec<String>>>>,
    #[serde(default)]
    primary_genres: Option<Vec<Option<String>>>,
    #[serde(default)]
    runtimes: Option<Vec<Option<f64>>>,
    #[serde(default)]
    languages: Option<Vec<Option<String>>>,
    #[serde(default)]
    popularity: Option<Vec<Option<f64>>>,
}

/// Immutable, validated similarity artifact
#[derive(Debug)]
pub struct SimilarityArtifact {
    titles: Vec<String>,
    ids: Vec<MovieId>,
    title_index: HashMap<String, usize>,
    neighbors: Vec<Vec<Neighbor>>,
    metadata: Vec<MovieMetadata>,
    build_info: BuildInfo,
    lowercase_titles: Vec<String>,
    /// Lowercased title -> first index carrying it
    lowercase_index: HashMap<String, usize>,
}

fn malformed(msg: impl Into<String>) -> ArtifactError {
    ArtifactError::Malformed(msg.into())
}

fn column<T>(
    name: &str,
    values: Option<Vec<Option<T>>>,
    expected: usize,
) -> Result<std::vec::IntoIter<Option<T>>, ArtifactError> {
    match values {
        None => Ok(std::iter::repeat_with(|| None)
            .take(expected)
            .collect::<Vec<_>>()
            .into_iter()),
        Some(values) if values.len() == expected => Ok(values.into_iter()),
        Some(values) => Err(malformed(format!(
            "metadata_movies.{} has {} entries, expected {}",
            name,
            values.len(),
            expected
        ))),
    }
}

fn whole_number<T: TryFrom<i64>>(value: f64) -> Option<T> {
    if value.is_finite() {
        T::try_from(value.round() as i64).ok()
    } else {
        None
    }
}

impl SimilarityArtifact {
    /// Parses and validates an artifact from its JSON encoding
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, ArtifactError> {
        let raw: RawArtifact = serde_json::from_slice(bytes)?;
        Self::from_raw(raw)
    }

    pub fn from_json_str(json: &str) -> Result<Self, ArtifactError> {
        Self::from_json_slice(json.as_bytes())
    }

    fn from_raw(raw: RawArtifact) -> Result<Self, ArtifactError> {
        let n = raw.titles.len();

        for (name, len) in [
            ("ids", raw.ids.len()),
            ("top_indices", raw.top_indices.len()),
            ("top_scores", raw.top_scores.len()),
        ] {
            if len != n {
                return Err(malformed(format!(
                    "{} has {} entries, expected {}",
                    name, len, n
                )));
            }
        }

        let neighbors = Self::validate_neighbors(raw.top_indices, raw.top_scores, n)?;
        let metadata = Self::validate_metadata(raw.metadata_movies.unwrap_or_default(), n)?;
        let title_index = Self::build_title_index(&raw.titles, raw.indices)?;

        let lowercase_titles: Vec<String> = raw.titles.iter().map(|t| t.to_lowercase()).collect();
        let mut lowercase_index = HashMap::with_capacity(n);
        for (i, lower) in lowercase_titles.iter().enumerate() {
            lowercase_index.entry(lower.clone()).or_insert(i);
        }

        Ok(Self {
            titles: raw.titles,
            ids: raw.ids,
            title_index,
            neighbors,
            metadata,
            build_info: raw.metadata,
            lowercase_titles,
            lowercase_index,
        })
    }

    fn validate_neighbors(
        top_indices: Vec<Vec<i64>>,
        top_scores: Vec<Vec<f64>>,
        n: usize,
    ) -> Result<Vec<Vec<Neighbor>>, ArtifactError> {
        let mut self_references = 0usize;
        let mut neighbors = Vec::with_capacity(n);

        for (i, (indices, scores)) in top_indices.into_iter().zip(top_scores).enumerate() {
            if indices.len() != scores.len() {
                return Err(malformed(format!(
                    "row {}: {} neighbor indices but {} scores",
                    i,
                    indices.len(),
                    scores.len()
                )));
            }

            let mut row = Vec::with_capacity(indices.len());
            for (index, score) in indices.into_iter().zip(scores) {
                let index = usize::try_from(index)
                    .ok()
                    .filter(|&idx| idx < n)
                    .ok_or_else(|| {
                        malformed(format!("row {}: neighbor index {} out of range", i, index))
                    })?;
                if index == i {
                    self_references += 1;
                    continue;
                }
                row.push(Neighbor { index, score });
            }
            neighbors.push(row);
        }

        if self_references > 0 {
            tracing::warn!(
                self_references,
                "Dropped self-referencing neighbors from artifact"
            );
        }

        Ok(neighbors)
    }

    fn validate_metadata(
        raw: RawMovieMetadata,
        n: usize,
    ) -> Result<Vec<MovieMetadata>, ArtifactError> {
        let mut years = column("years", raw.years, n)?;
        let mut ratings = column("ratings", raw.ratings, n)?;
        let mut vote_counts = column("vote_counts", raw.vote_counts, n)?;
        let mut genres = column("genres", raw.genres, n)?;
        let mut primary_genres = column("primary_genres", raw.primary_genres, n)?;
        let mut runtimes = column("runtimes", raw.runtimes, n)?;
        let mut languages = column("languages", raw.languages, n)?;
        let mut popularity = column("popularity", raw.popularity, n)?;

        Ok((0..n)
            .map(|_| MovieMetadata {
                year: years.next().flatten().and_then(whole_number),
                rating: ratings.next().flatten().filter(|v| v.is_finite()),
                vote_count: vote_counts.next().flatten().and_then(whole_number),
                genres: genres.next().flatten(),
                primary_genre: primary_genres.next().flatten(),
                runtime_minutes: runtimes.next().flatten().and_then(whole_number),
                language: languages.next().flatten(),
                popularity: popularity.next().flatten().filter(|v| v.is_finite()),
            })
            .collect())
    }

    /// Builds the exact-title index.
    ///
    /// Entries shipped in `indices` win, but must point at their own title.
    /// Titles the map does not cover are added first-seen.
    fn build_title_index(
        titles: &[String],
        indices: Option<HashMap<String, i64>>,
    ) -> Result<HashMap<String, usize>, ArtifactError> {
        let mut title_index = HashMap::with_capacity(titles.len());

        for (title, index) in indices.unwrap_or_default() {
            let position = usize::try_from(index)
                .ok()
                .filter(|&idx| titles.get(idx) == Some(&title))
                .ok_or_else(|| {
                    malformed(format!(
                        "indices[{:?}] = {} does not point at that title",
                        title, index
                    ))
                })?;
            title_index.insert(title, position);
        }

        let mut duplicates = 0usize;
        for (i, title) in titles.iter().enumerate() {
            match title_index.get(title) {
                Some(&existing) if existing != i => duplicates += 1,
                Some(_) => {}
                None => {
                    title_index.insert(title.clone(), i);
                }
            }
        }

        if duplicates > 0 {
            tracing::warn!(duplicates, "Artifact contains duplicate titles");
        }

        Ok(title_index)
    }

    pub fn len(&self) -> usize {
        self.titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }

    pub fn titles(&self) -> &[String] {
        &self.titles
    }

    pub fn title(&self, index: usize) -> &str {
        &self.titles[index]
    }

    pub fn lowercase_titles(&self) -> &[String] {
        &self.lowercase_titles
    }

    pub fn id(&self, index: usize) -> &MovieId {
        &self.ids[index]
    }

    pub fn metadata(&self, index: usize) -> &MovieMetadata {
        &self.metadata[index]
    }

    pub fn neighbors(&self, index: usize) -> &[Neighbor] {
        &self.neighbors[index]
    }

    pub fn build_info(&self) -> &BuildInfo {
        &self.build_info
    }

    /// Exact title lookup
    pub fn find_exact(&self, title: &str) -> Option<usize> {
        self.title_index.get(title).copied()
    }

    /// Case-insensitive lookup, resolved back through the exact index
    /// using the first title whose lowercase form matches.
    pub fn find_ignore_case(&self, title: &str) -> Option<usize> {
        let first = *self.lowercase_index.get(&title.to_lowercase())?;
        self.find_exact(&self.titles[first])
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::SimilarityArtifact;

    /// Three-movie artifact used across service tests
    pub(crate) const ABC_JSON: &str = r#"{
        "titles": ["A", "B", "C"],
        "ids": [1, 2, "c-3"],
        "indices": {"A": 0, "B": 1, "C": 2},
        "top_indices": [[1, 2], [0, 2], [0, 1]],
        "top_scores": [[0.9, 0.5], [0.9, 0.4], [0.5, 0.4]],
        "metadata_movies": {
            "years": [2001, 2002.0, null],
            "ratings": [7.5, 6.0, null],
            "genres": [["Drama"], ["Comedy", "Drama"], null]
        },
        "metadata": {"version": "1.0", "trained_at": "2024-05-01T12:00:00", "total_movies": 3, "tfidf_features": 5000}
    }"#;

    /// Small catalogue for search and case-insensitive resolution
    pub(crate) const CATALOGUE_JSON: &str = r#"{
        "titles": ["The Incredibles", "Inception", "Inception", "Interstellar", "Incendies", "The Dark Knight"],
        "ids": [9806, 27205, 27205, 157336, 46738, 155],
        "top_indices": [[4, 1], [3, 5], [3, 5], [1, 5], [0, 3], [1, 3]],
        "top_scores": [[0.4, 0.3], [0.8, 0.7], [0.8, 0.7], [0.8, 0.6], [0.4, 0.2], [0.7, 0.6]]
    }"#;

    pub(crate) fn abc() -> SimilarityArtifact {
        SimilarityArtifact::from_json_str(ABC_JSON).unwrap()
    }

    pub(crate) fn catalogue() -> SimilarityArtifact {
        SimilarityArtifact::from_json_str(CATALOGUE_JSON).unwrap()
    }
}
