use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{get, post};
use tower_http::limit::RequestBodyLimitLayer;
use crate::state::AppState;

pub mod aspect;
pub mod dto;
pub mod handler;
pub mod keys;
pub mod locator;
pub mod model;
pub mod pipeline;
pub mod repository;
pub mod resolver;
pub mod service;

pub fn router(state: AppState) -> Router<AppState> {
    let upload = post(handler::upload_video)
        .layer::<_, std::convert::Infallible>(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(upload_body_limit()));

    Router::new()
        .route("/videos", post(handler::create_video).get(handler::list_videos))
        .route("/videos/{id}", get(handler::get_video).delete(handler::delete_video))
        .route("/videos/{id}/upload", upload)
        .route_layer(middleware::from_fn_with_state(
            state,
            crate::middleware::auth::auth_middleware,
        ))
}

/// `MAX_UPLOAD_BYTES` as a body limit, saturating where `usize` is narrower.
fn upload_body_limit() -> usize {
    usize::try_from(service::MAX_UPLOAD_BYTES).unwrap_or(usize::MAX)
}
