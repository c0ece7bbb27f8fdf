use std::{path::PathBuf, time::Duration};

use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Path to the precomputed similarity artifact (JSON)
    #[serde(default = "default_artifact_path")]
    pub artifact_path: PathBuf,

    /// Load the artifact at startup instead of on the first lookup
    #[serde(default)]
    pub preload_artifact: bool,

    /// PostgreSQL connection URL for watchlist and reviews.
    /// When unset, an in-memory store is used.
    #[serde(default)]
    pub database_url: Option<String>,

    /// Redis connection URL
    #[serde(default = "default_redis_url")]
    pub redis_url: String,

    /// TMDB API key. When unset, external metadata is disabled.
    #[serde(default)]
    pub tmdb_api_key: Option<String>,

    /// TMDB API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// TMDB image CDN base URL
    #[serde(default = "default_tmdb_image_url")]
    pub tmdb_image_url: String,

    /// Per-item budget for enrichment lookups, in milliseconds
    #[serde(default = "default_enrichment_timeout_ms")]
    pub enrichment_timeout_ms: u64,

    /// Number of recommendations returned when the request omits `topN`
    #[serde(default = "default_top_n")]
    pub default_top_n: i64,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_artifact_path() -> PathBuf {
    PathBuf::from("public/models/recommendation_model.json")
}

fn default_redis_url() -> String {
    "redis://localhost:6379".to_string()
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_tmdb_image_url() -> String {
    "https://image.tmdb.org/t/p".to_string()
}

fn default_enrichment_timeout_ms() -> u64 {
    3000
}

fn default_top_n() -> i64 {
    10
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            artifact_path: default_artifact_path(),
            preload_artifact: false,
            database_url: None,
            redis_url: default_redis_url(),
            tmdb_api_key: None,
            tmdb_api_url: default_tmdb_api_url(),
            tmdb_image_url: default_tmdb_image_url(),
            enrichment_timeout_ms: default_enrichment_timeout_ms(),
            default_top_n: default_top_n(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    pub fn enrichment_timeout(&self) -> Duration {
        Duration::from_millis(self.enrichment_timeout_ms)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
