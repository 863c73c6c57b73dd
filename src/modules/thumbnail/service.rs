use axum::extract::Multipart;
use tracing::info;
use uuid::Uuid;

use crate::common::error::{AppError, AppResult};
use crate::common::upload::{FieldSpec, read_file_field};
use crate::infrastructure::cache::Thumbnail;
use crate::modules::video::dto::VideoResponse;
use crate::modules::video::service::VideoService;
use crate::state::AppState;

const MAX_THUMBNAIL_BYTES: u64 = 10 << 20;

/// Room for the multipart framing around the image.
pub const MAX_THUMBNAIL_BODY: usize = (MAX_THUMBNAIL_BYTES as usize) + (64 << 10);

const THUMBNAIL_FIELD: FieldSpec = FieldSpec {
    name: "thumbnail",
    allowed_types: &["image/jpeg", "image/png"],
    max_bytes: MAX_THUMBNAIL_BYTES,
    suffix: "",
};

pub struct ThumbnailService;

impl ThumbnailService {
    pub fn thumbnail_path(video_id: Uuid) -> String {
        format!("/api/v1/thumbnails/{video_id}")
    }

    /// Store the image and point the video's `thumbnail_url` at it.
    ///
    /// The bytes only live in the process cache, so the stored link stops
    /// resolving (404) once the entry is evicted, expires or the server restarts.
    pub async fn upload(
        state: AppState,
        user_id: Uuid,
        id: Uuid,
        mut multipart: Multipart,
    ) -> AppResult<VideoResponse> {
        VideoService::owned_video(&state, user_id, id).await?;

        let (data, media_type) = read_file_field(&mut multipart, &THUMBNAIL_FIELD).await?;
        let size = data.len();

        let video = state
            .videos
            .set_thumbnail_url(id, user_id, &Self::thumbnail_path(id))
            .await?
            .ok_or_else(|| AppError::NotFound("Video not found".to_string()))?;

        state.thumbnails.insert(
            id,
            Thumbnail {
                data,
                media_type: media_type.essence_str().to_string(),
            },
        );

        info!(video_id = %id, bytes = size, "🖼️ Thumbnail stored");
        state.resolver.resolve(video).await
    }

    pub fn get(state: &AppState, id: Uuid) -> AppResult<Thumbnail> {
        state
            .thumbnails
            .get(&id)
            .ok_or_else(|| AppError::NotFound("Thumbnail not found".to_string()))
    }
}
