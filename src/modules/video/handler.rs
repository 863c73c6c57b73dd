use crate::common::error::AppError;
use crate::common::response::{ApiResponse, ApiSuccess};
use crate::middleware::auth::TokenClaims;
use crate::modules::video::dto::*;
use crate::modules::video::service::VideoService;
use crate::state::AppState;
use axum::{
    extract::{Extension, Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

#[utoipa::path(
    post,
    path = "/api/v1/videos",
    request_body = CreateVideoRequest,
    responses(
        (status = 201, description = "Video Created", body = ApiResponse<VideoResponse>),
        (status = 400, description = "Bad Request"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal Server Error")
    ),
    tag = "Videos",
    security(("bearer_auth" = []))
)]
pub async fn create_video(
    State(state): State<AppState>,
    Extension(claims): Extension<TokenClaims>,
    Json(req): Json<CreateVideoRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()?;
    let res = VideoService::create_video(state, claims.sub, req).await?;
    Ok(ApiSuccess::created(res, "Video created successfully"))
}

#[utoipa::path(
    get,
    path = "/api/v1/videos",
    responses(
        (status = 200, description = "List the caller's videos", body = ApiResponse<Vec<VideoResponse>>),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal Server Error")
    ),
    tag = "Videos",
    security(("bearer_auth" = []))
)]
pub async fn list_videos(
    State(state): State<AppState>,
    Extension(claims): Extension<TokenClaims>,
) -> Result<impl IntoResponse, AppError> {
    let res = VideoService::list_videos(state, claims.sub).await?;
    Ok(ApiSuccess::ok(res, "Videos retrieved successfully"))
}

#[utoipa::path(
    get,
    path = "/api/v1/videos/{id}",
    params(
        ("id" = Uuid, Path, description = "Video ID")
    ),
    responses(
        (status = 200, description = "Get Video", body = ApiResponse<VideoResponse>),
        (status = 404, description = "Video Not Found"),
        (status = 500, description = "Internal Server Error")
    ),
    tag = "Videos",
    security(("bearer_auth" = []))
)]
pub async fn get_video(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let res = VideoService::get_video(state, id).await?;
    Ok(ApiSuccess::ok(res, "Video retrieved successfully"))
}

#[utoipa::path(
    delete,
    path = "/api/v1/videos/{id}",
    params(
        ("id" = Uuid, Path, description = "Video ID")
    ),
    responses(
        (status = 204, description = "Video Deleted"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Video Not Found"),
        (status = 500, description = "Internal Server Error")
    ),
    tag = "Videos",
    security(("bearer_auth" = []))
)]
pub async fn delete_video(
    State(state): State<AppState>,
    Extension(claims): Extension<TokenClaims>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    VideoService::delete_video(state, claims.sub, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Upload Video
/// Multipart field `video`, `video/mp4` only, at most 1 GiB. The file is
/// remuxed for fast start, classified by aspect ratio and stored in S3.
#[utoipa::path(
    post,
    path = "/api/v1/videos/{id}/upload",
    params(
        ("id" = Uuid, Path, description = "Video ID")
    ),
    request_body(content = String, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Upload successful", body = ApiResponse<VideoResponse>),
        (status = 400, description = "Bad Request"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Video not found"),
        (status = 413, description = "Payload Too Large"),
        (status = 500, description = "Internal Server Error")
    ),
    tag = "Videos",
    security(("bearer_auth" = []))
)]
pub async fn upload_video(
    State(state): State<AppState>,
    Extension(claims): Extension<TokenClaims>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let res = VideoService::upload_video(state, claims.sub, id, multipart).await?;
    Ok(ApiSuccess::ok(res, "Video uploaded successfully"))
}
