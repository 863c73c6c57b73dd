use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{get, post};
use crate::state::AppState;

pub mod handler;
pub mod service;

pub fn router(state: AppState) -> Router<AppState> {
    let public_routes = Router::new()
        .route("/thumbnails/{id}", get(handler::get_thumbnail));

    let protected_routes = Router::new()
        .route(
            "/videos/{id}/thumbnail",
            post(handler::upload_thumbnail)
                .layer(DefaultBodyLimit::max(service::MAX_THUMBNAIL_BODY)),
        )
        .route_layer(middleware::from_fn_with_state(
            state,
            crate::middleware::auth::auth_middleware,
        ));

    public_routes.merge(protected_routes)
}
