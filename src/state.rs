use std::sync::Arc;
use std::time::Duration;

use crate::config::settings::AppConfig;
use crate::infrastructure::cache::ThumbnailCache;
use crate::infrastructure::media::MediaToolkit;
use crate::infrastructure::storage::ObjectStore;
use crate::modules::video::pipeline::UploadPipeline;
use crate::modules::video::repository::VideoRepository;
use crate::modules::video::resolver::LocatorResolver;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub videos: Arc<dyn VideoRepository>,
    pub pipeline: Arc<UploadPipeline>,
    pub resolver: LocatorResolver,
    pub thumbnails: ThumbnailCache,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        videos: Arc<dyn VideoRepository>,
        store: Arc<dyn ObjectStore>,
        media: Arc<dyn MediaToolkit>,
    ) -> Self {
        let pipeline = UploadPipeline::new(
            media,
            store.clone(),
            config.s3_bucket.clone(),
            config.upload_tmp_dir.clone(),
        );
        let thumbnails = ThumbnailCache::new(
            config.thumbnail_cache_capacity,
            Duration::from_secs(config.thumbnail_cache_ttl_secs),
        );

        Self {
            config: Arc::new(config),
            videos,
            pipeline: Arc::new(pipeline),
            resolver: LocatorResolver::new(store),
            thumbnails,
        }
    }
}
