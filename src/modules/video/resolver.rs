use std::sync::Arc;
use std::time::Duration;
use tracing::error;

use super::dto::VideoResponse;
use super::locator::StorageLocator;
use super::model::Video;
use crate::common::error::AppResult;
use crate::infrastructure::storage::ObjectStore;

pub const SIGNED_URL_TTL: Duration = Duration::from_secs(60 * 60);

/// Turns stored locators into freshly signed URLs. Nothing is cached: each
/// call asks the object store for a new capability.
#[derive(Clone)]
pub struct LocatorResolver {
    store: Arc<dyn ObjectStore>,
    ttl: Duration,
}

impl LocatorResolver {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self {
            store,
            ttl: SIGNED_URL_TTL,
        }
    }

    pub async fn sign(&self, locator: &StorageLocator) -> AppResult<String> {
        Ok(self
            .store
            .presign_get(locator.bucket(), locator.key(), self.ttl)
            .await?)
    }

    /// A video without a locator passes through with no URL.
    pub async fn resolve(&self, video: Video) -> AppResult<VideoResponse> {
        let Some(raw) = video.video_url.as_deref() else {
            return Ok(VideoResponse::with_signed_url(video, None));
        };

        let locator = StorageLocator::parse(raw).inspect_err(|e| {
            error!(video_id = %video.id, error = %e, "Stored locator is unreadable");
        })?;
        let signed = self.sign(&locator).await?;

        Ok(VideoResponse::with_signed_url(video, Some(signed)))
    }

    pub async fn resolve_all(&self, videos: Vec<Video>) -> AppResult<Vec<VideoResponse>> {
        let mut resolved = Vec::with_capacity(videos.len());
        for video in videos {
            resolved.push(self.resolve(video).await?);
        }
        Ok(resolved)
    }
}
