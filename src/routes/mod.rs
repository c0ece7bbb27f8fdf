use std::{sync::Arc, time::Duration};

use axum::{
    http::StatusCode,
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    config::Config,
    db::{ReviewStore, WatchlistStore},
    middleware::{make_span_with_request_id, request_id_middleware},
    services::{ArtifactStore, ImageUrls, MetadataProvider},
};

pub mod model_info;
pub mod movies;
pub mod recommendations;
pub mod reviews;
pub mod titles;
pub mod trending;
pub mod watchlist;

/// Shared application state handed to every handler
pub struct AppState {
    pub artifacts: ArtifactStore,
    pub metadata_provider: Arc<dyn MetadataProvider>,
    pub watchlist: Arc<dyn WatchlistStore>,
    pub reviews: Arc<dyn ReviewStore>,
    pub images: ImageUrls,
    pub enrichment_timeout: Duration,
    pub default_top_n: i64,
}

impl AppState {
    pub fn new(
        config: &Config,
        artifacts: ArtifactStore,
        metadata_provider: Arc<dyn MetadataProvider>,
        watchlist: Arc<dyn WatchlistStore>,
        reviews: Arc<dyn ReviewStore>,
    ) -> Self {
        Self {
            artifacts,
            metadata_provider,
            watchlist,
            reviews,
            images: ImageUrls::new(config.tmdb_image_url.clone()),
            enrichment_timeout: config.enrichment_timeout(),
            default_top_n: config.default_top_n,
        }
    }
}

/// Creates the application router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_routes())
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// API routes under /api
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/search", get(titles::search))
        .route(
            "/recommend",
            post(recommendations::recommend).fallback(recommendations::method_not_allowed),
        )
        .route("/model-info", get(model_info::model_info))
        .route("/trending", get(trending::trending))
        .route("/movies/:id", get(movies::details))
        .route(
            "/movies/:id/reviews",
            get(reviews::list_for_movie).post(reviews::create),
        )
        .route("/movies/:id/reviews/mine", get(reviews::mine))
        .route("/reviews/:review_id/like", post(reviews::like))
        .route("/watchlist", get(watchlist::list).post(watchlist::add))
        .route(
            "/watchlist/:movie_id",
            get(watchlist::status).delete(watchlist::remove),
        )
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
