use axum::extract::Multipart;
use tracing::{info, instrument};
use uuid::Uuid;

use super::dto::{CreateVideoRequest, VideoResponse};
use super::model::Video;
use super::pipeline::{Stage, gate};
use crate::common::error::{AppError, AppResult};
use crate::common::upload::{FieldSpec, stage_file_field};
use crate::state::AppState;

/// Upper bound on the whole upload request body.
pub const MAX_UPLOAD_BYTES: u64 = 1 << 30;

pub const VIDEO_FIELD: FieldSpec = FieldSpec {
    name: "video",
    allowed_types: &["video/mp4"],
    max_bytes: MAX_UPLOAD_BYTES,
    suffix: ".mp4",
};

pub struct VideoService;

impl VideoService {
    pub async fn create_video(
        state: AppState,
        user_id: Uuid,
        req: CreateVideoRequest,
    ) -> AppResult<VideoResponse> {
        let video = Video::new(user_id, req.title, req.description);
        let video = state.videos.create(&video).await?;

        info!(video_id = %video.id, %user_id, "Video record created");
        state.resolver.resolve(video).await
    }

    pub async fn list_videos(state: AppState, user_id: Uuid) -> AppResult<Vec<VideoResponse>> {
        let videos = state.videos.list_by_owner(user_id).await?;
        state.resolver.resolve_all(videos).await
    }

    pub async fn get_video(state: AppState, id: Uuid) -> AppResult<VideoResponse> {
        let video = state
            .videos
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Video not found".to_string()))?;

        state.resolver.resolve(video).await
    }

    pub async fn delete_video(state: AppState, user_id: Uuid, id: Uuid) -> AppResult<()> {
        Self::owned_video(&state, user_id, id).await?;

        if !state.videos.delete(id, user_id).await? {
            return Err(AppError::NotFound("Video not found".to_string()));
        }
        state.thumbnails.remove(&id);

        info!(video_id = %id, %user_id, "Video deleted");
        Ok(())
    }

    /// Intake → Transcode → Classify → Upload → Persist.
    ///
    /// The staged upload outlives every later stage's artifacts, and is itself
    /// removed when this returns.
    #[instrument(skip_all, fields(video_id = %id, user_id = %user_id))]
    pub async fn upload_video(
        state: AppState,
        user_id: Uuid,
        id: Uuid,
        mut multipart: Multipart,
    ) -> AppResult<VideoResponse> {
        gate(Stage::Intake, Self::owned_video(&state, user_id, id).await)?;

        let staged = gate(
            Stage::Intake,
            stage_file_field(&mut multipart, &VIDEO_FIELD, state.pipeline.work_dir()).await,
        )?;

        let stored = state.pipeline.process(&staged).await?;

        let video = gate(
            Stage::Persist,
            state
                .videos
                .set_video_url(id, user_id, &stored.locator.encode())
                .await,
        )?
        .ok_or_else(|| AppError::NotFound("Video not found".to_string()))?;

        info!(
            bytes = staged.size,
            aspect = %stored.aspect,
            key = stored.locator.key(),
            "✅ Video stored"
        );

        state.resolver.resolve(video).await
    }

    /// The video if it exists and belongs to `user_id`.
    pub async fn owned_video(state: &AppState, user_id: Uuid, id: Uuid) -> AppResult<Video> {
        let video = state
            .videos
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Video not found".to_string()))?;

        if !video.is_owned_by(user_id) {
            return Err(AppError::Forbidden(
                "You can't modify this video".to_string(),
            ));
        }
        Ok(video)
    }
}
