use crate::{
    error::{AppError, AppResult},
    models::{RecommendedMovie, Recommendations, SimilarityArtifact},
    services::title_search,
};

/// Number of "did you mean" titles returned when a movie is not found
pub const SUGGESTION_LIMIT: usize = 5;

/// Resolves a free-text title to an artifact index.
///
/// Exact match first, then the first title equal ignoring case. Anything
/// else is `MovieNotFound` with substring suggestions.
pub fn resolve_title(artifact: &SimilarityArtifact, movie_title: &str) -> AppResult<usize> {
    if movie_title.is_empty() {
        return Err(AppError::InvalidInput("Movie title is required".to_string()));
    }

    if let Some(index) = artifact.find_exact(movie_title) {
        return Ok(index);
    }

    if let Some(index) = artifact.find_ignore_case(movie_title) {
        tracing::debug!(
            query = %movie_title,
            resolved = %artifact.title(index),
            "Resolved title ignoring case"
        );
        return Ok(index);
    }

    Err(AppError::MovieNotFound {
        query: movie_title.to_string(),
        suggestions: title_search::substring_matches(artifact, movie_title, SUGGESTION_LIMIT),
        total_movies: artifact.len(),
    })
}

/// Precomputed neighbors of a movie, best first, joined with their metadata.
///
/// The artifact's neighbor order is the rank order. `top_n <= 0` yields no
/// neighbors.
pub fn recommend(
    artifact: &SimilarityArtifact,
    movie_title: &str,
    top_n: i64,
) -> AppResult<Recommendations> {
    let index = resolve_title(artifact, movie_title)?;
    let take = usize::try_from(top_n).unwrap_or(0);

    let items = artifact
        .neighbors(index)
        .iter()
        .take(take)
        .map(|neighbor| {
            let metadata = artifact.metadata(neighbor.index);
            RecommendedMovie {
                title: artifact.title(neighbor.index).to_string(),
                id: artifact.id(neighbor.index).clone(),
                score: neighbor.score,
                year: metadata.year,
                rating: metadata.rating,
                vote_count: metadata.vote_count,
                genres: metadata.genres.clone(),
                primary_genre: metadata.primary_genre.clone(),
                runtime: metadata.runtime_minutes,
                language: metadata.language.clone(),
                popularity: metadata.popularity,
            }
        })
        .collect();

    Ok(Recommendations {
        resolved_title: artifact.title(index).to_string(),
        items,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::artifact::fixtures::{abc, catalogue};
    use crate::models::MovieId;

    fn titles_and_scores(recs: &Recommendations) -> Vec<(&str, f64)> {
        recs.items
            .iter()
            .map(|m| (m.title.as_str(), m.score))
            .collect()
    }

    #[test]
    fn test_truncates_to_top_n() {
        let artifact = abc();
        let recs = recommend(&artifact, "A", 1).unwrap();
        assert_eq!(recs.resolved_title, "A");
        assert_eq!(titles_and_scores(&recs), vec![("B", 0.9)]);
    }

    #[test]
    fn test_returns_only_available_neighbors() {
        let artifact = abc();
        let recs = recommend(&artifact, "A", 5).unwrap();
        assert_eq!(titles_and_scores(&recs), vec![("B", 0.9), ("C", 0.5)]);
    }

    #[test]
    fn test_joins_ids_and_metadata() {
        let artifact = abc();
        let recs = recommend(&artifact, "B", 2).unwrap();
        assert_eq!(recs.items[0].id, MovieId::Numeric(1));
        assert_eq!(recs.items[0].year, Some(2001));
        assert_eq!(recs.items[0].rating, Some(7.5));
        assert_eq!(recs.items[1].id, MovieId::Text("c-3".to_string()));
        assert_eq!(recs.items[1].year, None);
        assert_eq!(recs.items[1].genres, None);
    }

    #[test]
    fn test_non_positive_top_n_is_empty() {
        let artifact = abc();
        assert!(recommend(&artifact, "A", 0).unwrap().items.is_empty());
        assert!(recommend(&artifact, "A", -3).unwrap().items.is_empty());
    }

    #[test]
    fn test_never_recommends_itself() {
        let artifact = catalogue();
        for title in artifact.titles() {
            let own = resolve_title(&artifact, title).unwrap();
            assert!(artifact.neighbors(own).iter().all(|n| n.index != own));

            let recs = recommend(&artifact, title, 50).unwrap();
            assert!(recs.items.len() <= 50);
            assert!(recs.items.iter().all(|m| &m.title != title));
        }
    }

    #[test]
    fn test_is_deterministic() {
        let artifact = catalogue();
        let first = recommend(&artifact, "Inception", 12).unwrap();
        let second = recommend(&artifact, "Inception", 12).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_case_insensitive_fallback() {
        let artifact = catalogue();
        let recs = recommend(&artifact, "inCEPtion", 1).unwrap();
        assert_eq!(recs.resolved_title, "Inception");
        assert_eq!(titles_and_scores(&recs), vec![("Interstellar", 0.8)]);
    }

    #[test]
    fn test_not_found_carries_suggestions() {
        let artifact = catalogue();
        match recommend(&artifact, "ince", 5) {
            Err(AppError::MovieNotFound {
                query,
                suggestions,
                total_movies,
            }) => {
                assert_eq!(query, "ince");
                assert_eq!(suggestions, vec!["Inception", "Inception", "Incendies"]);
                assert_eq!(total_movies, 6);
            }
            other => panic!("expected MovieNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_not_found_without_suggestions() {
        let artifact = abc();
        match recommend(&artifact, "Zzzznotfound", 5) {
            Err(AppError::MovieNotFound {
                suggestions,
                total_movies,
                ..
            }) => {
                assert!(suggestions.is_empty());
                assert_eq!(total_movies, 3);
            }
            other => panic!("expected MovieNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_title_is_invalid() {
        let artifact = abc();
        assert!(matches!(
            recommend(&artifact, "", 5),
            Err(AppError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_blank_title_is_a_query() {
        let artifact = catalogue();
        match recommend(&artifact, " ", 5) {
            Err(AppError::MovieNotFound { suggestions, .. }) => {
                assert_eq!(suggestions, vec!["The Incredibles", "The Dark Knight"]);
            }
            other => panic!("expected MovieNotFound, got {:?}", other),
        }
    }
}
