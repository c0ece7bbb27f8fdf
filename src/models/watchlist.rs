use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A movie saved to a user's watchlist
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct WatchlistEntry {
    pub id: Uuid,
    pub user_id: String,
    pub movie_id: String,
    pub movie_title: String,
    pub poster: Option<String>,
    pub rating: Option<String>,
    pub year: Option<String>,
    pub added_at: DateTime<Utc>,
}

/// Request body for adding to the watchlist
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWatchlistEntry {
    pub movie_id: String,
    pub movie_title: String,
    #[serde(default)]
    pub poster: Option<String>,
    #[serde(default)]
    pub rating: Option<String>,
    #[serde(default)]
    pub year: Option<String>,
}

impl WatchlistEntry {
    pub fn new(user_id: &str, entry: NewWatchlistEntry) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            movie_id: entry.movie_id,
            movie_title: entry.movie_title,
            poster: entry.poster,
            rating: entry.rating,
            year: entry.year,
            added_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_entry_request_accepts_camel_case() {
        let entry: NewWatchlistEntry = serde_json::from_str(
            r#"{"movieId": "27205", "movieTitle": "Inception", "rating": "8.4"}"#,
        )
        .unwrap();
        assert_eq!(entry.movie_id, "27205");
        assert_eq!(entry.rating.as_deref(), Some("8.4"));
        assert_eq!(entry.poster, None);

        let saved = WatchlistEntry::new("user-1", entry);
        assert_eq!(saved.user_id, "user-1");
        assert_eq!(saved.movie_title, "Inception");
    }
}
