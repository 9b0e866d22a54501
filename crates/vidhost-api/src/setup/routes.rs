//! Route configuration and setup

use crate::constants::{API_PREFIX, DEFAULT_HTTP_CONCURRENCY_LIMIT, MAX_BODY_BYTES};
use crate::handlers::{health, playlists, videos};
use crate::state::AppState;
use axum::{
    http::Method,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use vidhost_infra::request_id_middleware;

/// Setup all application routes
pub fn setup_routes(state: Arc<AppState>) -> Router {
    let video_routes = Router::new()
        .route("/videos", post(videos::create_video))
        .route(
            "/videos/{id}",
            get(videos::get_video)
                .put(videos::update_video)
                .delete(videos::delete_video),
        )
        .route(
            "/videos/{id}/thumbnail/{*thumbnail_key}",
            post(videos::set_video_thumbnail),
        );

    let playlist_routes = Router::new()
        .route("/playlists", post(playlists::create_playlist))
        .route(
            "/playlists/{id}",
            get(playlists::get_playlist)
                .put(playlists::update_playlist)
                .delete(playlists::delete_playlist),
        )
        .route(
            "/playlists/{id}/videos/{video_id}",
            put(playlists::add_video_to_playlist),
        );

    let http_concurrency_limit = std::env::var("HTTP_CONCURRENCY_LIMIT")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(DEFAULT_HTTP_CONCURRENCY_LIMIT)
        .max(1);

    Router::new()
        .route("/health", get(health::health_check))
        .nest(API_PREFIX, video_routes.merge(playlist_routes))
        .layer(ConcurrencyLimitLayer::new(http_concurrency_limit))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(setup_cors())
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(request_id_middleware))
        .with_state(state)
}

fn setup_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any)
}
