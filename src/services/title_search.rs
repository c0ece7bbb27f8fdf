use crate::{
    error::{AppError, AppResult},
    models::SimilarityArtifact,
};

/// Shortest query accepted for autocomplete
pub const MIN_QUERY_CHARS: usize = 2;

/// Result count when the caller does not pass a limit
pub const DEFAULT_LIMIT: usize = 10;

/// Rejects queries too short to search with
pub fn validate_query(query: &str) -> AppResult<()> {
    if query.chars().count() < MIN_QUERY_CHARS {
        return Err(AppError::InvalidInput(format!(
            "Query must be at least {} characters",
            MIN_QUERY_CHARS
        )));
    }
    Ok(())
}

/// Autocomplete over the artifact's titles
///
/// Titles starting with the query come first, then titles merely containing
/// it. Both groups keep artifact order; matching ignores case.
pub fn search_titles(
    artifact: &SimilarityArtifact,
    query: &str,
    limit: usize,
) -> AppResult<Vec<String>> {
    validate_query(query)?;

    if limit == 0 {
        return Ok(Vec::new());
    }

    let needle = query.to_lowercase();
    let mut starts_with = Vec::new();
    let mut contains = Vec::new();

    for (index, title) in artifact.lowercase_titles().iter().enumerate() {
        if title.starts_with(&needle) {
            starts_with.push(index);
            if starts_with.len() == limit {
                break;
            }
        } else if contains.len() < limit && title.contains(&needle) {
            contains.push(index);
        }
    }

    Ok(starts_with
        .into_iter()
        .chain(contains)
        .take(limit)
        .map(|index| artifact.title(index).to_string())
        .collect())
}

/// Titles containing the query anywhere, in artifact order
pub fn substring_matches(artifact: &SimilarityArtifact, query: &str, limit: usize) -> Vec<String> {
    let needle = query.to_lowercase();
    artifact
        .lowercase_titles()
        .iter()
        .enumerate()
        .filter(|(_, title)| title.contains(&needle))
        .take(limit)
        .map(|(index, _)| artifact.title(index).to_string())
        .collect()
}
