use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::Display;

pub mod artifact;
pub mod recommendation;
pub mod review;
pub mod tmdb;
pub mod watchlist;

pub use artifact::{BuildInfo, MovieMetadata, Neighbor, SimilarityArtifact};
pub use recommendation::{EnrichedMovie, RecommendedMovie, Recommendations};
pub use review::{NewReview, Review};
pub use tmdb::{MovieDetails, MovieSummary, TimeWindow};
pub use watchlist::{NewWatchlistEntry, WatchlistEntry};

/// External identifier of a movie as shipped in the artifact.
///
/// The offline pipeline emits either numeric TMDB ids or opaque strings, so
/// both are accepted and written back unchanged. Dataframe exports write
/// numeric ids as floats (`27205.0`); whole floats read as numeric ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum MovieId {
    Numeric(i64),
    Text(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawMovieId {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl<'de> Deserialize<'de> for MovieId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match RawMovieId::deserialize(deserializer)? {
            RawMovieId::Integer(id) => MovieId::Numeric(id),
            RawMovieId::Float(id) if id.fract() == 0.0 && id.abs() < i64::MAX as f64 => {
                MovieId::Numeric(id as i64)
            }
            // Fractional ids carry no meaning as numbers; keep their text
            RawMovieId::Float(id) => MovieId::Text(id.to_string()),
            RawMovieId::Text(id) => MovieId::Text(id),
        })
    }
}

impl Display for MovieId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MovieId::Numeric(id) => write!(f, "{}", id),
            MovieId::Text(id) => write!(f, "{}", id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movie_id_display() {
        assert_eq!(MovieId::Numeric(27205).to_string(), "27205");
        assert_eq!(MovieId::Text("tt1375666".to_string()).to_string(), "tt1375666");
    }

    #[test]
    fn test_movie_id_serde_untagged() {
        let ids: Vec<MovieId> = serde_json::from_str(r#"[27205, "tt1375666"]"#).unwrap();
        assert_eq!(ids[0], MovieId::Numeric(27205));
        assert_eq!(ids[1], MovieId::Text("tt1375666".to_string()));
        assert_eq!(serde_json::to_string(&ids).unwrap(), r#"[27205,"tt1375666"]"#);
    }

    #[test]
    fn test_movie_id_accepts_float_encoded_numbers() {
        let ids: Vec<MovieId> = serde_json::from_str(r#"[27205.0, 155, 1.5]"#).unwrap();
        assert_eq!(ids[0], MovieId::Numeric(27205));
        assert_eq!(ids[1], MovieId::Numeric(155));
        assert_eq!(ids[2], MovieId::Text("1.5".to_string()));
        assert_eq!(serde_json::to_string(&ids[0]).unwrap(), "27205");
    }
}
