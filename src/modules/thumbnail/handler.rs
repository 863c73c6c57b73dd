use crate::common::error::AppError;
use crate::common::response::{ApiResponse, ApiSuccess};
use crate::middleware::auth::TokenClaims;
use crate::modules::thumbnail::service::ThumbnailService;
use crate::modules::video::dto::VideoResponse;
use crate::state::AppState;
use axum::{
    extract::{Extension, Multipart, Path, State},
    http::header,
    response::IntoResponse,
};
use uuid::Uuid;

/// Upload Video Thumbnail
/// Multipart field `thumbnail`, `image/jpeg` or `image/png`, at most 10 MiB.
#[utoipa::path(
    post,
    path = "/api/v1/videos/{id}/thumbnail",
    params(
        ("id" = Uuid, Path, description = "Video ID")
    ),
    request_body(content = String, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Upload successful", body = ApiResponse<VideoResponse>),
        (status = 400, description = "Bad Request"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Video not found"),
        (status = 500, description = "Internal Server Error")
    ),
    tag = "Thumbnails",
    security(("bearer_auth" = []))
)]
pub async fn upload_thumbnail(
    State(state): State<AppState>,
    Extension(claims): Extension<TokenClaims>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let res = ThumbnailService::upload(state, claims.sub, id, multipart).await?;
    Ok(ApiSuccess::ok(res, "Thumbnail uploaded successfully"))
}

#[utoipa::path(
    get,
    path = "/api/v1/thumbnails/{id}",
    params(
        ("id" = Uuid, Path, description = "Video ID")
    ),
    responses(
        (status = 200, description = "Thumbnail image"),
        (status = 404, description = "Thumbnail Not Found")
    ),
    tag = "Thumbnails"
)]
pub async fn get_thumbnail(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let thumbnail = ThumbnailService::get(&state, id)?;
    Ok((
        [
            (header::CONTENT_TYPE, thumbnail.media_type),
            (header::CACHE_CONTROL, "no-store".to_string()),
        ],
        thumbnail.data,
    ))
}
